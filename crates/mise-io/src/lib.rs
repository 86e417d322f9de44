//! mise-io - Tabular data I/O for recipe datasets
//!
//! Readers hand the rest of mise typed columns plus a schema:
//!
//! - **CSV**: comma- or tab-separated values with per-column type inference
//!
//! # Design
//!
//! All readers implement the `DataReader` trait so the table loader in
//! `mise-core` never depends on a concrete file format.

pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use reader::*;
pub use schema::*;

#[cfg(feature = "csv")]
pub use csv_reader::CsvReader;
