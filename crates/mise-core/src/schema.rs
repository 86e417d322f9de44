//! Feature schema for the recommendation table
//!
//! The schema is the named, ordered list of numeric columns that make up a
//! recipe's feature vector. It always starts with `minutes` and
//! `complexity_score`; any further columns follow in a fixed order that is
//! shared by index construction and queries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{MiseError, MiseResult};

/// Preparation time column
pub const MINUTES: &str = "minutes";

/// Engineered complexity column
pub const COMPLEXITY_SCORE: &str = "complexity_score";

/// Inclusive value range of a feature column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// `[0, +inf)`, used for durations and counts
    pub const NON_NEGATIVE: Bounds = Bounds {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// No restriction
    pub const UNBOUNDED: Bounds = Bounds {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if a value lies within the bounds (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = if self.min.is_finite() { "[" } else { "(" };
        let upper = if self.max.is_finite() { "]" } else { ")" };
        write!(f, "{}{}, {}{}", lower, self.min, self.max, upper)
    }
}

/// A named numeric feature column
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: String,
    pub bounds: Bounds,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Ordered feature columns, validated on construction
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Schema with just `minutes` and `complexity_score`
    pub fn new(complexity_range: Bounds) -> Self {
        Self {
            columns: vec![
                FeatureColumn::new(MINUTES, Bounds::NON_NEGATIVE),
                FeatureColumn::new(COMPLEXITY_SCORE, complexity_range),
            ],
        }
    }

    /// Build a schema from explicit columns
    ///
    /// The first two columns must be `minutes` and `complexity_score`.
    pub fn from_columns(columns: Vec<FeatureColumn>) -> MiseResult<Self> {
        match columns.as_slice() {
            [first, second, ..] if first.name == MINUTES && second.name == COMPLEXITY_SCORE => {}
            _ => {
                return Err(MiseError::data_validation(format!(
                    "schema must begin with '{}' and '{}'",
                    MINUTES, COMPLEXITY_SCORE
                )))
            }
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(MiseError::data_validation("feature column names must be non-empty"));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(MiseError::data_validation(format!(
                    "duplicate feature column '{}'",
                    column.name
                )));
            }
            if column.bounds.min.is_nan()
                || column.bounds.max.is_nan()
                || column.bounds.min > column.bounds.max
            {
                return Err(MiseError::data_validation(format!(
                    "column '{}' has an empty range {}",
                    column.name, column.bounds
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Append an extra feature column
    pub fn with_feature(self, name: impl Into<String>, bounds: Bounds) -> MiseResult<Self> {
        let mut columns = self.columns;
        columns.push(FeatureColumn::new(name, bounds));
        Self::from_columns(columns)
    }

    /// Number of feature columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; a schema has at least the two leading columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&FeatureColumn> {
        self.columns.get(index)
    }

    /// Column names in order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get column index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Valid range of `complexity_score`
    pub fn complexity_range(&self) -> Bounds {
        self.columns[1].bounds
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(Bounds::new(0.0, 100.0))
    }
}
