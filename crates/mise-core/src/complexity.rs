//! Engineered complexity score
//!
//! `score = clamp(ingredient_weight * n_ingredients + step_weight * n_steps)`
//! into the configured range. With the default weights a recipe with ten
//! ingredients and ten steps scores 50, the middle of the default [0, 100]
//! range. The same range bounds the `desired_complexity` a user may ask for.

use serde::{Deserialize, Serialize};

use crate::error::{MiseError, MiseResult};
use crate::schema::Bounds;

/// Weights and output range of the complexity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityConfig {
    /// Points per ingredient
    pub ingredient_weight: f64,
    /// Points per preparation step
    pub step_weight: f64,
    /// Valid score range (inclusive)
    pub range: Bounds,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            ingredient_weight: 2.5,
            step_weight: 2.5,
            range: Bounds::new(0.0, 100.0),
        }
    }
}

impl ComplexityConfig {
    /// Score a single recipe
    pub fn score(&self, n_ingredients: f64, n_steps: f64) -> f64 {
        self.range
            .clamp(self.ingredient_weight * n_ingredients + self.step_weight * n_steps)
    }

    /// Score parallel ingredient and step count columns
    ///
    /// Counts must be finite and non-negative.
    pub fn score_all(&self, n_ingredients: &[f64], n_steps: &[f64]) -> MiseResult<Vec<f64>> {
        if n_ingredients.len() != n_steps.len() {
            return Err(MiseError::data_validation(format!(
                "ingredient counts ({}) and step counts ({}) differ in length",
                n_ingredients.len(),
                n_steps.len()
            )));
        }

        n_ingredients
            .iter()
            .zip(n_steps)
            .enumerate()
            .map(|(row, (&ingredients, &steps))| {
                for (name, value) in [("n_ingredients", ingredients), ("n_steps", steps)] {
                    if !value.is_finite() || value < 0.0 {
                        return Err(MiseError::data_validation(format!(
                            "'{}' at row {} must be a non-negative count, got {}",
                            name, row, value
                        )));
                    }
                }
                Ok(self.score(ingredients, steps))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, 10.0, 50.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(4.0, 2.0, 15.0)]
    #[case(40.0, 40.0, 100.0)] // clamped
    fn test_default_score(#[case] ingredients: f64, #[case] steps: f64, #[case] expected: f64) {
        let config = ComplexityConfig::default();
        assert_eq!(config.score(ingredients, steps), expected);
    }

    #[test]
    fn test_score_all() {
        let config = ComplexityConfig::default();
        let scores = config.score_all(&[4.0, 10.0], &[2.0, 10.0]).unwrap();
        assert_eq!(scores, vec![15.0, 50.0]);
    }

    #[test]
    fn test_score_all_rejects_missing_counts() {
        let config = ComplexityConfig::default();
        let err = config.score_all(&[4.0, f64::NAN], &[2.0, 3.0]).unwrap_err();
        assert!(err.to_string().contains("n_ingredients"));
        assert!(config.score_all(&[4.0], &[-1.0]).is_err());
        assert!(config.score_all(&[4.0], &[]).is_err());
    }
}
