//! Feature normalization
//!
//! A `FeatureNormalizer` fits one affine transform per column and returns it
//! as a `FittedTransform` value. The same fitted transform must be applied to
//! both the indexed recipes and every incoming query; refitting on a query
//! would put the two on different scales.
//!
//! Supported methods:
//! - **Min-max**: `(x - min) / (max - min)`, training values land in [0, 1]
//! - **Z-score**: `(x - mean) / std_dev` with the population standard deviation

use mise_stats::ColumnSummary;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MiseError, MiseResult};
use crate::matrix::FeatureMatrix;

/// How columns are rescaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMethod {
    #[default]
    MinMax,
    ZScore,
}

/// Fitted parameters for one column: `normalized = (x - offset) / scale`
///
/// A zero `scale` marks a constant column, which normalizes to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub column: String,
    pub offset: f64,
    pub scale: f64,
}

impl ColumnScale {
    fn identity(column: &str) -> Self {
        Self {
            column: column.to_string(),
            offset: 0.0,
            scale: 1.0,
        }
    }

    fn apply(&self, value: f64) -> f64 {
        if self.scale == 0.0 {
            0.0
        } else {
            (value - self.offset) / self.scale
        }
    }

    fn invert(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

/// A reusable per-column transform produced by `FeatureNormalizer::fit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    method: ScaleMethod,
    columns: Vec<ColumnScale>,
}

impl FittedTransform {
    pub fn method(&self) -> ScaleMethod {
        self.method
    }

    /// Per-column parameters in column order
    pub fn columns(&self) -> &[ColumnScale] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column == name)
    }

    /// Apply the transform to a matrix with the same columns in the same order
    pub fn transform(&self, matrix: &FeatureMatrix) -> MiseResult<FeatureMatrix> {
        self.check_columns(matrix)?;
        check_finite(matrix)?;

        let mut data = matrix.data().clone();
        for (mut column, scale) in data.columns_mut().into_iter().zip(&self.columns) {
            column.mapv_inplace(|v| scale.apply(v));
        }
        Ok(matrix.with_data(data))
    }

    /// Normalize a single value of the given column
    ///
    /// Values outside the fitted range are not clamped. `None` if the column
    /// index is out of range.
    pub fn transform_value(&self, column: usize, value: f64) -> Option<f64> {
        self.columns.get(column).map(|c| c.apply(value))
    }

    /// Map a normalized value back onto the original scale
    pub fn inverse_value(&self, column: usize, value: f64) -> Option<f64> {
        self.columns.get(column).map(|c| c.invert(value))
    }

    fn check_columns(&self, matrix: &FeatureMatrix) -> MiseResult<()> {
        let fitted = self.columns.iter().map(|c| c.column.as_str());
        let given = matrix.columns().iter().map(|c| c.as_str());
        if matrix.ncols() != self.columns.len() || !fitted.eq(given) {
            return Err(MiseError::data_validation(format!(
                "transform was fitted on columns {:?} but got {:?}",
                self.columns.iter().map(|c| &c.column).collect::<Vec<_>>(),
                matrix.columns()
            )));
        }
        Ok(())
    }
}

/// Fits a `FittedTransform` over the columns of a feature matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureNormalizer {
    method: ScaleMethod,
}

impl FeatureNormalizer {
    pub fn new(method: ScaleMethod) -> Self {
        Self { method }
    }

    pub fn min_max() -> Self {
        Self::new(ScaleMethod::MinMax)
    }

    pub fn z_score() -> Self {
        Self::new(ScaleMethod::ZScore)
    }

    pub fn method(&self) -> ScaleMethod {
        self.method
    }

    /// Fit per-column parameters
    ///
    /// Missing (non-finite) values are rejected, as are columns whose spread
    /// overflows `f64`. Zero rows fit the identity.
    pub fn fit(&self, matrix: &FeatureMatrix) -> MiseResult<FittedTransform> {
        check_finite(matrix)?;

        let mut columns = Vec::with_capacity(matrix.ncols());
        for (j, name) in matrix.columns().iter().enumerate() {
            if matrix.nrows() == 0 {
                columns.push(ColumnScale::identity(name));
                continue;
            }
            let summary = ColumnSummary::from_values(&matrix.column(j).to_vec());
            let (offset, scale) = match self.method {
                ScaleMethod::MinMax => (summary.min, summary.range()),
                ScaleMethod::ZScore => (summary.mean, summary.std_dev),
            };
            if !offset.is_finite() || !scale.is_finite() {
                return Err(MiseError::data_validation(format!(
                    "column '{}' spans more than the floating-point range and cannot be scaled",
                    name
                )));
            }
            columns.push(ColumnScale {
                column: name.clone(),
                offset,
                scale,
            });
        }

        debug!(
            method = ?self.method,
            rows = matrix.nrows(),
            columns = columns.len(),
            "fitted feature transform"
        );

        Ok(FittedTransform {
            method: self.method,
            columns,
        })
    }

    /// Fit and apply in one step
    pub fn fit_transform(
        &self,
        matrix: &FeatureMatrix,
    ) -> MiseResult<(FeatureMatrix, FittedTransform)> {
        let transform = self.fit(matrix)?;
        let normalized = transform.transform(matrix)?;
        Ok((normalized, transform))
    }
}

fn check_finite(matrix: &FeatureMatrix) -> MiseResult<()> {
    if let Some((row, col)) = matrix.first_non_finite() {
        return Err(MiseError::data_validation(format!(
            "column '{}' has a missing or non-finite value at row {}",
            matrix.columns()[col],
            row
        )));
    }
    Ok(())
}
