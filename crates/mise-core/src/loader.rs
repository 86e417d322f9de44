//! Build a `RecipeTable` from a tabular data source
//!
//! Column mapping comes from `DataConfig`. When the source has no
//! `complexity_score` column it is derived from `n_ingredients` and
//! `n_steps` using the configured complexity weights.
//!
//! With `drop_invalid` set, rows with missing or out-of-range features are
//! dropped (and counted in a warning) instead of failing the load.

use mise_io::{DataColumn, DataReader, DataSchema};
use std::path::Path;
use tracing::{info, warn};

use crate::complexity::ComplexityConfig;
use crate::config::{DataConfig, RecommenderConfig};
use crate::error::{MiseError, MiseResult};
use crate::ingredients::parse_ingredient_list;
use crate::recipe::{RecipeId, RecipeRecord, RecipeTable};
use crate::schema::{Bounds, FeatureSchema, COMPLEXITY_SCORE, MINUTES};

/// Ingredient count column used to derive complexity
pub const N_INGREDIENTS: &str = "n_ingredients";

/// Step count column used to derive complexity
pub const N_STEPS: &str = "n_steps";

/// Loads feature-selected recipe tables
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    data: DataConfig,
    complexity: ComplexityConfig,
}

impl TableLoader {
    pub fn new(config: &RecommenderConfig) -> Self {
        Self {
            data: config.data.clone(),
            complexity: config.complexity.clone(),
        }
    }

    /// Open a file by extension and load it
    pub fn load_path(&self, path: impl AsRef<Path>) -> MiseResult<RecipeTable> {
        let reader = mise_io::open_file(path)?;
        self.load(reader.as_ref())
    }

    /// Load every row of the reader into a validated table
    pub fn load(&self, reader: &dyn DataReader) -> MiseResult<RecipeTable> {
        self.load_rows(reader).map(|(table, _)| table)
    }

    /// Load the table together with each kept recipe's ingredient list
    ///
    /// The lists are aligned row for row with the returned table, including
    /// when invalid rows are dropped.
    pub fn load_with_ingredients(
        &self,
        reader: &dyn DataReader,
    ) -> MiseResult<(RecipeTable, Vec<Vec<String>>)> {
        let (table, kept) = self.load_rows(reader)?;
        let column = self.data.ingredients_column.as_str();
        let cells = reader.read_column(column)?.to_strings();

        let lists = kept
            .iter()
            .map(|&row| {
                cells.get(row).map(|cell| parse_ingredient_list(cell)).ok_or_else(|| {
                    MiseError::data_validation(format!(
                        "column '{}' has no value for row {}",
                        column, row
                    ))
                })
            })
            .collect::<MiseResult<Vec<_>>>()?;
        Ok((table, lists))
    }

    /// Build the table and report which source rows it kept
    fn load_rows(&self, reader: &dyn DataReader) -> MiseResult<(RecipeTable, Vec<usize>)> {
        let source = reader.read_schema()?;

        let mut schema = FeatureSchema::new(self.complexity.range);
        for name in &self.data.extra_features {
            schema = schema.with_feature(name.clone(), Bounds::UNBOUNDED)?;
        }

        let mut columns = vec![numeric_column(reader, &source, MINUTES)?];
        columns.push(self.complexity_column(reader, &source)?);
        for name in &self.data.extra_features {
            columns.push(numeric_column(reader, &source, name)?);
        }

        let ids = self.ids(reader, &source)?;
        let names = self.names(reader, &source)?;
        let name_count = names.as_ref().map_or(source.num_records, Vec::len);
        if ids.len() != source.num_records || name_count != source.num_records {
            return Err(MiseError::data_validation(format!(
                "id and name columns must have {} rows",
                source.num_records
            )));
        }

        let mut rows: Vec<(usize, RecipeRecord)> = (0..source.num_records)
            .map(|row| {
                let record = RecipeRecord {
                    id: ids[row],
                    name: names.as_ref().and_then(|n| n[row].clone()),
                    values: columns.iter().map(|c| c[row]).collect(),
                };
                (row, record)
            })
            .collect();

        if self.data.drop_invalid {
            let before = rows.len();
            rows.retain(|(_, record)| is_valid(record, &schema));
            let dropped = before - rows.len();
            if dropped > 0 {
                warn!(
                    dropped,
                    kept = rows.len(),
                    "dropped recipes with missing or out-of-range features"
                );
            }
        }

        let (kept, records): (Vec<usize>, Vec<RecipeRecord>) = rows.into_iter().unzip();
        let table = RecipeTable::new(schema, records)?;
        info!(
            recipes = table.len(),
            source = reader.path().unwrap_or("<memory>"),
            format = reader.format_name(),
            "loaded recipe table"
        );
        Ok((table, kept))
    }

    fn complexity_column(
        &self,
        reader: &dyn DataReader,
        source: &DataSchema,
    ) -> MiseResult<Vec<f64>> {
        if source.column_index(COMPLEXITY_SCORE).is_some() {
            return numeric_column(reader, source, COMPLEXITY_SCORE);
        }

        warn!(
            "no '{}' column; deriving it from '{}' and '{}'",
            COMPLEXITY_SCORE, N_INGREDIENTS, N_STEPS
        );
        let ingredients = numeric_column(reader, source, N_INGREDIENTS)?;
        let steps = numeric_column(reader, source, N_STEPS)?;
        if !self.data.drop_invalid {
            return self.complexity.score_all(&ingredients, &steps);
        }

        // Bad counts become missing scores so the row is dropped later
        Ok(ingredients
            .iter()
            .zip(&steps)
            .map(|(&i, &s)| {
                if i.is_finite() && s.is_finite() && i >= 0.0 && s >= 0.0 {
                    self.complexity.score(i, s)
                } else {
                    f64::NAN
                }
            })
            .collect())
    }

    fn ids(&self, reader: &dyn DataReader, source: &DataSchema) -> MiseResult<Vec<RecipeId>> {
        let name = self.data.id_column.as_str();
        if source.column_index(name).is_none() {
            warn!("no '{}' column; using row numbers as recipe ids", name);
            return Ok((0..source.num_records as u64).map(RecipeId).collect());
        }

        match reader.read_column(name)? {
            DataColumn::Int64(values) => values
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    u64::try_from(v).map(RecipeId).map_err(|_| {
                        MiseError::data_validation(format!(
                            "'{}' at row {} must be a non-negative integer, got {}",
                            name, row, v
                        ))
                    })
                })
                .collect(),
            other => Err(MiseError::data_validation(format!(
                "id column '{}' must be integer, found {}",
                name,
                other.dtype().name()
            ))),
        }
    }

    fn names(
        &self,
        reader: &dyn DataReader,
        source: &DataSchema,
    ) -> MiseResult<Option<Vec<Option<String>>>> {
        let name = self.data.name_column.as_str();
        if source.column_index(name).is_none() {
            return Ok(None);
        }
        let names = reader
            .read_column(name)?
            .to_strings()
            .into_iter()
            .map(|s| if s.is_empty() { None } else { Some(s) })
            .collect();
        Ok(Some(names))
    }
}

/// Every feature present, finite and inside its column bounds
fn is_valid(record: &RecipeRecord, schema: &FeatureSchema) -> bool {
    record
        .values
        .iter()
        .zip(schema.columns())
        .all(|(value, column)| value.is_finite() && column.bounds.contains(*value))
}

/// Read a numeric column, mapping absence and type problems to validation errors
fn numeric_column(
    reader: &dyn DataReader,
    source: &DataSchema,
    name: &str,
) -> MiseResult<Vec<f64>> {
    let descriptor = source.column(name).ok_or_else(|| {
        MiseError::data_validation(format!("required column '{}' is missing", name))
    })?;
    if !descriptor.dtype.is_numeric() {
        return Err(MiseError::data_validation(format!(
            "column '{}' must be numeric, found {}",
            name,
            descriptor.dtype.name()
        )));
    }

    let values = reader
        .read_column(name)?
        .to_f64()
        .ok_or_else(|| MiseError::data_validation(format!("column '{}' is not numeric", name)))?;
    if values.len() != source.num_records {
        return Err(MiseError::data_validation(format!(
            "column '{}' has {} values, expected {}",
            name,
            values.len(),
            source.num_records
        )));
    }
    Ok(values)
}
