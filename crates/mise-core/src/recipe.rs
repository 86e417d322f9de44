//! Recipe records and the feature-selected recipe table

use mise_stats::ColumnSummary;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{MiseError, MiseResult};
use crate::matrix::FeatureMatrix;
use crate::schema::FeatureSchema;

/// Recipe identifier from the source dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recipe with its feature values in schema order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub name: Option<String>,
    pub values: Vec<f64>,
}

impl RecipeRecord {
    /// Create a record with the two required features
    pub fn new(id: u64, minutes: f64, complexity_score: f64) -> Self {
        Self {
            id: RecipeId(id),
            name: None,
            values: vec![minutes, complexity_score],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append the value of the next extra feature column
    pub fn with_feature(mut self, value: f64) -> Self {
        self.values.push(value);
        self
    }

    /// Preparation time in minutes
    pub fn minutes(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    pub fn complexity_score(&self) -> f64 {
        self.values.get(1).copied().unwrap_or(f64::NAN)
    }

    /// Label for display: the name if present, otherwise the id
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("recipe {}", self.id),
        }
    }
}

/// A validated, feature-selected recipe table
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeTable {
    schema: FeatureSchema,
    records: Vec<RecipeRecord>,
}

impl RecipeTable {
    /// Validate records against the schema
    ///
    /// Every record needs one finite, in-bounds value per schema column and
    /// a unique id.
    pub fn new(schema: FeatureSchema, records: Vec<RecipeRecord>) -> MiseResult<Self> {
        let mut ids = HashSet::with_capacity(records.len());

        for record in &records {
            if !ids.insert(record.id) {
                return Err(MiseError::data_validation(format!(
                    "duplicate recipe id {}",
                    record.id
                )));
            }
            if record.values.len() != schema.len() {
                return Err(MiseError::data_validation(format!(
                    "recipe {} has {} feature values, schema has {} columns",
                    record.id,
                    record.values.len(),
                    schema.len()
                )));
            }
            for (value, column) in record.values.iter().zip(schema.columns()) {
                if !value.is_finite() {
                    return Err(MiseError::data_validation(format!(
                        "recipe {} is missing a value for '{}'",
                        record.id, column.name
                    )));
                }
                if !column.bounds.contains(*value) {
                    return Err(MiseError::data_validation(format!(
                        "recipe {} has {} = {}, outside {}",
                        record.id, column.name, value, column.bounds
                    )));
                }
            }
        }

        Ok(Self { schema, records })
    }

    /// Build a two-feature table from parallel columns; ids are row numbers
    pub fn from_columns(minutes: &[f64], complexity_scores: &[f64]) -> MiseResult<Self> {
        if minutes.len() != complexity_scores.len() {
            return Err(MiseError::data_validation(format!(
                "column lengths differ: {} minutes, {} complexity scores",
                minutes.len(),
                complexity_scores.len()
            )));
        }
        let records = minutes
            .iter()
            .zip(complexity_scores)
            .enumerate()
            .map(|(i, (&m, &c))| RecipeRecord::new(i as u64, m, c))
            .collect();
        Self::new(FeatureSchema::default(), records)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn records(&self) -> &[RecipeRecord] {
        &self.records
    }

    pub fn get(&self, row: usize) -> Option<&RecipeRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one feature column across all recipes
    pub fn column_values(&self, index: usize) -> Vec<f64> {
        self.records.iter().map(|r| r.values[index]).collect()
    }

    /// Dense feature matrix in schema column order
    pub fn feature_matrix(&self) -> FeatureMatrix {
        // Widths were checked in `new`
        let data = Array2::from_shape_fn((self.records.len(), self.schema.len()), |(i, j)| {
            self.records[i].values[j]
        });
        FeatureMatrix::from_validated(self.schema.names(), data)
    }

    /// Summary statistics for each feature column
    pub fn describe(&self) -> Vec<(String, ColumnSummary)> {
        self.schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                (
                    column.name.clone(),
                    ColumnSummary::from_values(&self.column_values(i)),
                )
            })
            .collect()
    }
}
