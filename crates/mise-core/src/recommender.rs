//! Recipe recommender
//!
//! Owns the recipe table, the fitted feature transform and a nearest-neighbor
//! index over the normalized rows. Queries are mapped through the stored
//! transform (never refitted), so query and index always share one scale.
//!
//! ```
//! use mise_core::{RecipeRecommender, RecipeTable};
//!
//! let table = RecipeTable::from_columns(&[10.0, 30.0, 60.0], &[20.0, 50.0, 90.0]).unwrap();
//! let recommender = RecipeRecommender::new(table, 2).unwrap();
//!
//! let results = recommender.recommend_recipes(30.0, 50.0).unwrap();
//! assert_eq!(results[0].record.minutes(), 30.0);
//! assert_eq!(results[0].similarity_distance, 0.0);
//! ```

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::config::RecommenderConfig;
use crate::error::{validation, MiseError, MiseResult};
use crate::index::{DistanceMetric, NeighborIndex};
use crate::matrix::FeatureMatrix;
use crate::normalize::{FeatureNormalizer, FittedTransform, ScaleMethod};
use crate::recipe::{RecipeRecord, RecipeTable};
use crate::schema::{COMPLEXITY_SCORE, MINUTES};

/// Desired feature values for one query
///
/// Columns that are not set do not contribute to the distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPoint {
    targets: Vec<(String, f64)>,
}

impl QueryPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query over preparation time and complexity
    pub fn time_and_complexity(desired_time: f64, desired_complexity: f64) -> Self {
        Self::new()
            .with(MINUTES, desired_time)
            .with(COMPLEXITY_SCORE, desired_complexity)
    }

    /// Set the desired value of a feature column
    pub fn with(mut self, column: impl Into<String>, value: f64) -> Self {
        self.targets.push((column.into(), value));
        self
    }

    pub fn targets(&self) -> &[(String, f64)] {
        &self.targets
    }
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub record: &'a RecipeRecord,
    /// Row of the record in the source table
    pub row: usize,
    pub similarity_distance: f64,
}

/// k-nearest-neighbor recipe recommender
#[derive(Debug, Clone)]
pub struct RecipeRecommender {
    table: RecipeTable,
    transform: FittedTransform,
    index: NeighborIndex,
    k: usize,
}

impl RecipeRecommender {
    /// Build with min-max scaling and Euclidean distance
    pub fn new(table: RecipeTable, k: usize) -> MiseResult<Self> {
        Self::with_options(table, k, ScaleMethod::MinMax, DistanceMetric::Euclidean)
    }

    /// Build using `k`, scaling and metric from a configuration
    pub fn with_config(table: RecipeTable, config: &RecommenderConfig) -> MiseResult<Self> {
        Self::with_options(table, config.k, config.scale, config.metric)
    }

    /// Build with explicit scaling and metric
    ///
    /// `k` must be positive and no larger than the number of recipes. An
    /// empty table is accepted here and reported as `EmptyIndex` on query.
    pub fn with_options(
        table: RecipeTable,
        k: usize,
        scale: ScaleMethod,
        metric: DistanceMetric,
    ) -> MiseResult<Self> {
        validation::validate_k(k, table.len())?;

        let features = table.feature_matrix();
        let (normalized, transform) = FeatureNormalizer::new(scale).fit_transform(&features)?;
        let index = NeighborIndex::build(normalized, metric);

        debug!(
            recipes = table.len(),
            features = table.schema().len(),
            k,
            ?scale,
            ?metric,
            "built recipe index"
        );

        Ok(Self {
            table,
            transform,
            index,
            k,
        })
    }

    /// Recommend the `k` recipes closest to a desired time and complexity
    ///
    /// `desired_time` must be non-negative and `desired_complexity` must lie
    /// in the table's complexity range (default [0, 100]).
    pub fn recommend_recipes(
        &self,
        desired_time: f64,
        desired_complexity: f64,
    ) -> MiseResult<Vec<Recommendation<'_>>> {
        self.recommend_top(desired_time, desired_complexity, self.k)
    }

    /// Like `recommend_recipes` with a per-call `k`
    pub fn recommend_top(
        &self,
        desired_time: f64,
        desired_complexity: f64,
        k: usize,
    ) -> MiseResult<Vec<Recommendation<'_>>> {
        let schema = self.table.schema();
        validation::validate_query_value("desired_time", desired_time, schema.columns()[0].bounds)?;
        validation::validate_query_value(
            "desired_complexity",
            desired_complexity,
            schema.complexity_range(),
        )?;

        self.search(
            &QueryPoint::time_and_complexity(desired_time, desired_complexity),
            k,
        )
    }

    /// Recommend the `k` recipes closest to an arbitrary query point
    pub fn recommend(&self, query: &QueryPoint) -> MiseResult<Vec<Recommendation<'_>>> {
        self.search(query, self.k)
    }

    fn search(&self, query: &QueryPoint, k: usize) -> MiseResult<Vec<Recommendation<'_>>> {
        if self.index.is_empty() {
            return Err(MiseError::EmptyIndex);
        }
        validation::validate_k(k, self.index.len())?;

        let target = self.normalize_query(query)?;
        let neighbors = self.index.nearest(&target, k);

        debug!(k, hits = neighbors.len(), "answered recipe query");

        Ok(neighbors
            .into_iter()
            .map(|n| Recommendation {
                record: &self.table.records()[n.row],
                row: n.row,
                similarity_distance: n.distance,
            })
            .collect())
    }

    /// Resolve query columns and map them through the fitted transform
    fn normalize_query(&self, query: &QueryPoint) -> MiseResult<Vec<Option<f64>>> {
        let schema = self.table.schema();
        if query.targets().is_empty() {
            return Err(MiseError::invalid_parameter(
                "query",
                "at least one feature must be set",
            ));
        }

        let mut target = vec![None; schema.len()];
        let mut seen = HashSet::new();
        for (name, value) in query.targets() {
            let column = schema.index_of(name).ok_or_else(|| {
                MiseError::invalid_parameter(name.as_str(), "not a feature column")
            })?;
            if !seen.insert(column) {
                return Err(MiseError::invalid_parameter(name.as_str(), "set more than once"));
            }
            validation::validate_query_value(name, *value, schema.columns()[column].bounds)?;
            let normalized = self.transform.transform_value(column, *value).ok_or_else(|| {
                MiseError::data_validation(format!("no fitted scale for column '{}'", name))
            })?;
            // Squared distances must stay finite
            if !(normalized * normalized).is_finite() {
                return Err(MiseError::invalid_parameter(
                    name.as_str(),
                    format!("{} is too far outside the indexed recipes to rank them", value),
                ));
            }
            target[column] = Some(normalized);
        }
        Ok(target)
    }

    /// The fitted transform shared by index and queries
    pub fn transform(&self) -> &FittedTransform {
        &self.transform
    }

    pub fn table(&self) -> &RecipeTable {
        &self.table
    }

    /// Normalized feature matrix behind the index
    pub fn normalized(&self) -> &FeatureMatrix {
        self.index.points()
    }

    pub fn metric(&self) -> DistanceMetric {
        self.index.metric()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeRecord;
    use crate::schema::{Bounds, FeatureSchema};

    fn three_recipes() -> RecipeTable {
        RecipeTable::from_columns(&[10.0, 30.0, 60.0], &[20.0, 50.0, 90.0]).unwrap()
    }

    #[test]
    fn test_exact_match_ranked_first() {
        let recommender = RecipeRecommender::new(three_recipes(), 2).unwrap();
        let results = recommender.recommend_recipes(30.0, 50.0).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].row, 1);
        assert_eq!(results[0].similarity_distance, 0.0);
        assert_eq!(results[1].row, 0);
    }

    #[test]
    fn test_zero_k_rejected() {
        let err = RecipeRecommender::new(three_recipes(), 0).unwrap_err();
        assert!(matches!(err, MiseError::InvalidParameter { ref name, .. } if name == "k"));
    }

    #[test]
    fn test_k_above_len_rejected() {
        assert!(matches!(
            RecipeRecommender::new(three_recipes(), 4),
            Err(MiseError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_empty_table_fails_on_query() {
        let table = RecipeTable::from_columns(&[], &[]).unwrap();
        let recommender = RecipeRecommender::new(table, 5).unwrap();
        assert!(recommender.is_empty());
        assert!(matches!(
            recommender.recommend_recipes(30.0, 50.0),
            Err(MiseError::EmptyIndex)
        ));
    }

    #[test]
    fn test_query_bounds() {
        let recommender = RecipeRecommender::new(three_recipes(), 2).unwrap();
        for (time, complexity) in [(-1.0, 50.0), (30.0, -0.1), (30.0, 100.1), (f64::NAN, 50.0)] {
            assert!(matches!(
                recommender.recommend_recipes(time, complexity),
                Err(MiseError::InvalidParameter { .. })
            ));
        }
        // Boundaries themselves are valid, even outside the fitted data range
        assert!(recommender.recommend_recipes(0.0, 0.0).is_ok());
        assert!(recommender.recommend_recipes(500.0, 100.0).is_ok());
    }

    #[test]
    fn test_overflowing_query_rejected() {
        let table = RecipeTable::from_columns(&[0.0, 1.0, 2.0], &[50.0, 50.0, 50.0]).unwrap();
        let recommender = RecipeRecommender::new(table, 1).unwrap();

        let err = recommender.recommend_recipes(1e200, 50.0).unwrap_err();
        assert!(matches!(err, MiseError::InvalidParameter { ref name, .. } if name == MINUTES));

        // Far but representable queries still pick the longest recipe
        let results = recommender.recommend_recipes(1e6, 50.0).unwrap();
        assert_eq!(results[0].row, 2);
        assert!(results[0].similarity_distance.is_finite());
    }

    #[test]
    fn test_query_uses_fitted_scale() {
        let recommender = RecipeRecommender::new(three_recipes(), 1).unwrap();
        // 35 minutes is 0.5 on the [10, 60] scale; complexity 55 is 0.5 on [20, 90]
        let results = recommender.recommend_recipes(35.0, 55.0).unwrap();
        let expected = ((0.5f64 - 0.4).powi(2) + (0.5f64 - 30.0 / 70.0).powi(2)).sqrt();
        assert_eq!(results[0].row, 1);
        assert!((results[0].similarity_distance - expected).abs() < 1e-12);
    }

    #[test]
    fn test_recommend_top_override() {
        let recommender = RecipeRecommender::new(three_recipes(), 1).unwrap();
        assert_eq!(recommender.recommend_top(30.0, 50.0, 3).unwrap().len(), 3);
        assert!(recommender.recommend_top(30.0, 50.0, 4).is_err());
    }

    #[test]
    fn test_general_query_on_extra_feature() {
        let schema = FeatureSchema::default()
            .with_feature("n_steps", Bounds::NON_NEGATIVE)
            .unwrap();
        let records = vec![
            RecipeRecord::new(1, 10.0, 20.0).with_feature(2.0),
            RecipeRecord::new(2, 30.0, 50.0).with_feature(12.0),
            RecipeRecord::new(3, 60.0, 90.0).with_feature(6.0),
        ];
        let table = RecipeTable::new(schema, records).unwrap();
        let recommender = RecipeRecommender::new(table, 1).unwrap();

        let results = recommender
            .recommend(&QueryPoint::new().with("n_steps", 6.0))
            .unwrap();
        assert_eq!(results[0].record.id.0, 3);
        assert_eq!(results[0].similarity_distance, 0.0);
    }

    #[test]
    fn test_malformed_general_queries() {
        let recommender = RecipeRecommender::new(three_recipes(), 1).unwrap();
        assert!(recommender.recommend(&QueryPoint::new()).is_err());
        assert!(recommender
            .recommend(&QueryPoint::new().with("calories", 100.0))
            .is_err());
        assert!(recommender
            .recommend(&QueryPoint::new().with(MINUTES, 10.0).with(MINUTES, 20.0))
            .is_err());
    }

    #[test]
    fn test_manhattan_metric() {
        let recommender = RecipeRecommender::with_options(
            three_recipes(),
            3,
            ScaleMethod::MinMax,
            DistanceMetric::Manhattan,
        )
        .unwrap();
        let results = recommender.recommend_recipes(10.0, 20.0).unwrap();
        assert_eq!(results[0].similarity_distance, 0.0);
        assert_eq!(results[2].similarity_distance, 2.0);
    }
}
