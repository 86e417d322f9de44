//! Named numeric feature matrix

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{MiseError, MiseResult};

/// A dense row-per-recipe matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    data: Array2<f64>,
}

impl FeatureMatrix {
    /// Wrap an existing array; the column count must match
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> MiseResult<Self> {
        if data.ncols() != columns.len() {
            return Err(MiseError::data_validation(format!(
                "matrix has {} columns but {} names were given",
                data.ncols(),
                columns.len()
            )));
        }
        Ok(Self { columns, data })
    }

    /// Build from row vectors
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f64>]) -> MiseResult<Self> {
        let width = columns.len();
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MiseError::data_validation(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| MiseError::data_validation(e.to_string()))?;
        Ok(Self { columns, data })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.column(index)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.data.get((row, column)).copied()
    }

    /// First non-finite cell as `(row, column)`, if any
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .axis_iter(Axis(0))
            .enumerate()
            .find_map(|(i, row)| row.iter().position(|v| !v.is_finite()).map(|j| (i, j)))
    }

    pub(crate) fn from_validated(columns: Vec<String>, data: Array2<f64>) -> Self {
        debug_assert_eq!(columns.len(), data.ncols());
        Self { columns, data }
    }

    pub(crate) fn with_data(&self, data: Array2<f64>) -> Self {
        Self {
            columns: self.columns.clone(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["minutes".to_string(), "complexity_score".to_string()]
    }

    #[test]
    fn test_from_rows() {
        let m = FeatureMatrix::from_rows(names(), &[vec![10.0, 20.0], vec![30.0, 50.0]]).unwrap();
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.get(1, 1), Some(50.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.column(0).to_vec(), vec![10.0, 30.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = FeatureMatrix::from_rows(names(), &[vec![10.0, 20.0], vec![30.0]]);
        assert!(matches!(result, Err(MiseError::DataValidation { .. })));
    }

    #[test]
    fn test_empty_matrix() {
        let m = FeatureMatrix::from_rows(names(), &[]).unwrap();
        assert_eq!(m.nrows(), 0);
        assert_eq!(m.ncols(), 2);
        assert!(m.first_non_finite().is_none());
    }

    #[test]
    fn test_first_non_finite() {
        let m = FeatureMatrix::from_rows(names(), &[vec![10.0, 20.0], vec![f64::NAN, 50.0]])
            .unwrap();
        assert_eq!(m.first_non_finite(), Some((1, 0)));
    }

    #[test]
    fn test_column_count_mismatch() {
        let result = FeatureMatrix::new(vec!["minutes".to_string()], Array2::zeros((2, 2)));
        assert!(result.is_err());
    }
}
