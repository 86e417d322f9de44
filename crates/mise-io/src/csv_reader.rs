//! CSV file reader with type inference

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// CSV file reader
///
/// The whole file is scanned once on open to infer column types and count
/// records; columns are then re-read on demand.
pub struct CsvReader {
    path: PathBuf,
    path_str: String,
    schema: DataSchema,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file with a header row
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file with a header row
    pub fn open_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let mut reader = Self::csv_reader(path, delimiter)?;
        let schema = Self::infer_schema(&mut reader)?;

        Ok(Self {
            path: path.to_path_buf(),
            path_str: path.display().to_string(),
            schema,
            delimiter,
        })
    }

    fn csv_reader(path: &Path, delimiter: u8) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }

    fn infer_schema(reader: &mut csv::Reader<BufReader<File>>) -> IoResult<DataSchema> {
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut inference: Vec<TypeInference> = vec![TypeInference::default(); headers.len()];
        let mut num_records = 0;

        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            for (value, state) in record.iter().zip(inference.iter_mut()) {
                state.observe(value);
            }
            num_records += 1;
        }

        let columns = headers
            .into_iter()
            .zip(inference)
            .map(|(name, state)| {
                ColumnDescriptor::new(name, state.resolve()).with_nullable(state.saw_empty)
            })
            .collect();

        Ok(DataSchema::new(columns, num_records))
    }
}

impl DataReader for CsvReader {
    fn read_schema(&self) -> IoResult<DataSchema> {
        Ok(self.schema.clone())
    }

    fn read_column(&self, name: &str) -> IoResult<DataColumn> {
        let col_index = self
            .schema
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;
        let dtype = self.schema.columns[col_index].dtype;

        let mut reader = Self::csv_reader(&self.path, self.delimiter)?;
        let mut values = Vec::with_capacity(self.schema.num_records);
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let value = record.get(col_index).ok_or_else(|| IoError::MalformedRecord {
                line,
                message: format!("missing field '{}'", name),
            })?;
            values.push((line, value.to_string()));
        }

        parse_column(&values, dtype)
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path_str)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Running type inference for one column
#[derive(Debug, Clone)]
struct TypeInference {
    all_int: bool,
    all_float: bool,
    all_bool: bool,
    saw_value: bool,
    saw_empty: bool,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self {
            all_int: true,
            all_float: true,
            all_bool: true,
            saw_value: false,
            saw_empty: false,
        }
    }
}

impl TypeInference {
    fn observe(&mut self, value: &str) {
        if value.is_empty() {
            self.saw_empty = true;
            return;
        }
        self.saw_value = true;
        self.all_int &= value.parse::<i64>().is_ok();
        self.all_float &= value.parse::<f64>().is_ok();
        self.all_bool &= parse_bool(value).is_some();
    }

    fn resolve(&self) -> ColumnType {
        if !self.saw_value {
            return ColumnType::String;
        }
        // Integers with gaps widen to floats so the gaps can be NaN
        if self.all_int && !self.saw_empty {
            ColumnType::Int64
        } else if self.all_float {
            ColumnType::Float64
        } else if self.all_bool && !self.saw_empty {
            ColumnType::Bool
        } else {
            ColumnType::String
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse column values into a DataColumn
fn parse_column(values: &[(u64, String)], dtype: ColumnType) -> IoResult<DataColumn> {
    let mismatch = |line: u64, value: &str| IoError::MalformedRecord {
        line,
        message: format!("'{}' is not a valid {}", value, dtype.name()),
    };

    let column = match dtype {
        ColumnType::Float64 => DataColumn::Float64(
            values
                .iter()
                .map(|(line, s)| {
                    if s.is_empty() {
                        Ok(f64::NAN)
                    } else {
                        s.parse().map_err(|_| mismatch(*line, s))
                    }
                })
                .collect::<IoResult<_>>()?,
        ),
        ColumnType::Int64 => DataColumn::Int64(
            values
                .iter()
                .map(|(line, s)| s.parse().map_err(|_| mismatch(*line, s)))
                .collect::<IoResult<_>>()?,
        ),
        ColumnType::Bool => DataColumn::Bool(
            values
                .iter()
                .map(|(line, s)| parse_bool(s).ok_or_else(|| mismatch(*line, s)))
                .collect::<IoResult<_>>()?,
        ),
        ColumnType::String => DataColumn::String(values.iter().map(|(_, s)| s.clone()).collect()),
    };

    Ok(column)
}
