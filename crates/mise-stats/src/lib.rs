//! mise-stats - Descriptive statistics for recipe datasets
//!
//! - **ColumnSummary**: count, missing, mean, standard deviation, min,
//!   quartiles and max of one numeric column
//! - **quantile**: linear-interpolation quantiles over sorted data

pub mod summary;

pub use summary::*;
