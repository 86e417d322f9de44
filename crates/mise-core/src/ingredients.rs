//! Ingredient list encoding
//!
//! Turns each recipe's ingredient list into a multi-hot vector over a
//! vocabulary fitted on the dataset. The encoding is produced for callers
//! that want it; the recommendation distance does not use it.

use ndarray::Array2;
use std::collections::BTreeMap;

use crate::error::{MiseError, MiseResult};
use crate::recipe::RecipeTable;

/// Parse an ingredient list cell
///
/// Accepts the bracketed, quoted list format of the raw dataset
/// (`['salt', "chef's blend"]`) as well as a bare comma-separated list.
/// Commas inside quotes are kept.
pub fn parse_ingredient_list(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        match (quote, ch) {
            (None, '\'' | '"') if current.trim().is_empty() => {
                current.clear();
                quote = Some(ch);
            }
            (Some(q), c) if c == q => quote = None,
            (None, ',') => {
                push_item(&mut items, &current);
                current.clear();
            }
            (_, c) => current.push(c),
        }
    }
    push_item(&mut items, &current);

    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let item = normalize_ingredient(raw);
    if !item.is_empty() {
        items.push(item);
    }
}

/// Trim, lowercase and collapse inner whitespace
pub fn normalize_ingredient(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Multi-hot ingredient encoder with a sorted vocabulary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientEncoder {
    /// Ingredient -> (column, number of recipes using it)
    vocabulary: BTreeMap<String, (usize, usize)>,
}

impl IngredientEncoder {
    /// Fit a vocabulary over every recipe's ingredient list
    pub fn fit(recipes: &[Vec<String>]) -> Self {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for ingredients in recipes {
            let mut unique: Vec<String> =
                ingredients.iter().map(|i| normalize_ingredient(i)).collect();
            unique.sort();
            unique.dedup();
            for ingredient in unique.into_iter().filter(|i| !i.is_empty()) {
                *counts.entry(ingredient).or_default() += 1;
            }
        }

        let vocabulary = counts
            .into_iter()
            .enumerate()
            .map(|(column, (name, count))| (name, (column, count)))
            .collect();
        Self { vocabulary }
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Column of an ingredient in encoded vectors
    pub fn column_of(&self, ingredient: &str) -> Option<usize> {
        self.vocabulary
            .get(&normalize_ingredient(ingredient))
            .map(|&(column, _)| column)
    }

    /// Vocabulary in column order
    pub fn terms(&self) -> Vec<&str> {
        self.vocabulary.keys().map(|k| k.as_str()).collect()
    }

    /// Encode one recipe; unknown ingredients are ignored
    pub fn encode(&self, ingredients: &[String]) -> Vec<f32> {
        let mut row = vec![0.0; self.len()];
        for ingredient in ingredients {
            if let Some(column) = self.column_of(ingredient) {
                row[column] = 1.0;
            }
        }
        row
    }

    /// Encode many recipes into a `(recipes, vocabulary)` matrix
    pub fn encode_all(&self, recipes: &[Vec<String>]) -> Array2<f32> {
        let mut matrix = Array2::zeros((recipes.len(), self.len()));
        for (i, ingredients) in recipes.iter().enumerate() {
            for ingredient in ingredients {
                if let Some(column) = self.column_of(ingredient) {
                    matrix[[i, column]] = 1.0;
                }
            }
        }
        matrix
    }

    /// Encode ingredient lists that belong row for row to `table`
    ///
    /// Fails with `DataValidation` when the number of lists differs from the
    /// number of recipes, so encoded rows always line up with table rows.
    pub fn encode_table(
        &self,
        table: &RecipeTable,
        recipes: &[Vec<String>],
    ) -> MiseResult<Array2<f32>> {
        if recipes.len() != table.len() {
            return Err(MiseError::data_validation(format!(
                "{} ingredient lists for {} recipes",
                recipes.len(),
                table.len()
            )));
        }
        Ok(self.encode_all(recipes))
    }

    /// The `n` ingredients used by the most recipes, ties by name
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .vocabulary
            .iter()
            .map(|(name, &(_, count))| (name.as_str(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}
