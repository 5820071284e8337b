//! # bandwork-csv
//!
//! Read detail rows from CSV and write evaluated rows back out.
//!
//! ```rust
//! use bandwork_core::Scalar;
//! use bandwork_csv::{CsvReadOptions, CsvReader};
//!
//! let rows = CsvReader::read("name,amount\nPen,2.5\n".as_bytes(), &CsvReadOptions::default()).unwrap();
//! assert_eq!(rows[0]["amount"], Scalar::Number(2.5));
//! ```

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
