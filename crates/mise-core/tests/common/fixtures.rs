//! Test fixture helpers

use mise_core::{RecipeRecord, RecipeTable};
use std::path::PathBuf;

/// Get the path to a fixture file
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// The three-recipe table used throughout: (10, 20), (30, 50), (60, 90)
#[allow(dead_code)]
pub fn three_recipes() -> RecipeTable {
    RecipeTable::from_columns(&[10.0, 30.0, 60.0], &[20.0, 50.0, 90.0])
        .expect("valid fixture table")
}

/// A table built from `(minutes, complexity)` pairs with ids 1..=n
#[allow(dead_code)]
pub fn table_from_pairs(pairs: &[(f64, f64)]) -> RecipeTable {
    let records = pairs
        .iter()
        .enumerate()
        .map(|(i, &(m, c))| RecipeRecord::new(i as u64 + 1, m, c))
        .collect();
    RecipeTable::new(Default::default(), records).expect("valid fixture table")
}
