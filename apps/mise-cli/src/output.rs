//! Terminal tables and JSON output

use comfy_table::{presets, CellAlignment, Table};

use mise_core::Recommendation;
use mise_stats::ColumnSummary;

fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(header);
    table
}

/// Right-align every column except the last
fn align_numeric(table: &mut Table, columns: usize) {
    for column in table.column_iter_mut().take(columns) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

pub fn recommendation_table(time: f64, complexity: f64, results: &[Recommendation<'_>]) -> String {
    let mut table = table_with_header(vec!["#", "id", "minutes", "complexity", "distance", "name"]);
    for (rank, r) in results.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            r.record.id.to_string(),
            r.record.minutes().to_string(),
            format!("{:.1}", r.record.complexity_score()),
            format!("{:.4}", r.similarity_distance),
            r.record.name.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    align_numeric(&mut table, 5);

    format!(
        "Recipes closest to {} min, complexity {}:\n{}\n",
        time, complexity, table
    )
}

pub fn recommendation_json(results: &[Recommendation<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

pub fn summary_table(columns: &[(String, ColumnSummary)]) -> String {
    let mut table = table_with_header(vec![
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ]);
    for (name, s) in columns {
        let mut row = vec![name.clone(), s.count.to_string()];
        row.extend(
            [s.mean, s.sample_std_dev, s.min, s.q1, s.median, s.q3, s.max]
                .iter()
                .map(|v| format!("{:.2}", v)),
        );
        table.add_row(row);
    }
    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    format!("{}\n", table)
}

pub fn ingredient_table(vocabulary: usize, top: &[(&str, usize)]) -> String {
    let mut table = table_with_header(vec!["recipes", "ingredient"]);
    for (name, count) in top {
        table.add_row(vec![count.to_string(), name.to_string()]);
    }
    align_numeric(&mut table, 1);
    format!("{} distinct ingredients\n{}\n", vocabulary, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_core::{RecipeRecommender, RecipeTable};

    fn two_recipes() -> RecipeRecommender {
        let table = RecipeTable::from_columns(&[10.0, 30.0], &[20.0, 50.0]).unwrap();
        RecipeRecommender::new(table, 1).unwrap()
    }

    #[test]
    fn test_recommendation_table() {
        let recommender = two_recipes();
        let results = recommender.recommend_recipes(30.0, 50.0).unwrap();

        let text = recommendation_table(30.0, 50.0, &results);
        assert!(text.starts_with("Recipes closest to 30 min, complexity 50:"));
        assert!(text.contains("distance"));
        assert!(text.contains("0.0000"));
        assert!(text.contains("50.0"));
    }

    #[test]
    fn test_recommendation_json() {
        let recommender = two_recipes();
        let results = recommender.recommend_recipes(30.0, 50.0).unwrap();

        let json = recommendation_json(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value.as_array().unwrap()[0];

        assert_eq!(first["row"], 1);
        assert_eq!(first["similarity_distance"], 0.0);
        assert_eq!(first["record"]["id"], 1);
        assert_eq!(first["record"]["values"], serde_json::json!([30.0, 50.0]));
        assert!(first["record"]["name"].is_null());
    }

    #[test]
    fn test_summary_table() {
        let columns = vec![(
            "minutes".to_string(),
            ColumnSummary::from_values(&[10.0, 20.0, 30.0]),
        )];
        let text = summary_table(&columns);
        assert!(text.contains("minutes"));
        assert!(text.contains("20.00"));
        assert!(text.contains("75%"));
    }

    #[test]
    fn test_ingredient_table() {
        let text = ingredient_table(3, &[("salt", 4), ("eggs", 2)]);
        assert!(text.starts_with("3 distinct ingredients\n"));
        let salt = text.find("salt").unwrap();
        let eggs = text.find("eggs").unwrap();
        assert!(salt < eggs);
    }
}
