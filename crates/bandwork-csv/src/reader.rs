//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use bandwork_core::{Record, Scalar};
use log::debug;

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into data rows
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Vec<Record>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into data rows
    ///
    /// Short rows leave the missing fields null; a row longer than the
    /// header is an error.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Vec<Record>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut columns: Vec<String> = if options.has_header {
            csv_reader
                .headers()?
                .iter()
                .map(|h| h.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for (row_idx, result) in csv_reader.records().enumerate() {
            let fields = result?;

            if !options.has_header {
                while columns.len() < fields.len() {
                    columns.push(format!("column{}", columns.len() + 1));
                }
            } else if fields.len() > columns.len() {
                return Err(CsvError::Parse {
                    row: row_idx + 1,
                    column: columns.len() + 1,
                    message: format!(
                        "{} fields but the header has {}",
                        fields.len(),
                        columns.len()
                    ),
                });
            }

            let mut record = Record::new();
            for (col, name) in columns.iter().enumerate() {
                let value = match fields.get(col) {
                    Some(field) if options.auto_detect_types => Self::detect_type(field),
                    Some(field) => Scalar::string(field),
                    None => Scalar::Null,
                };
                record.insert(name.clone(), value);
            }
            rows.push(record);
        }

        debug!("read {} csv rows with {} columns", rows.len(), columns.len());
        Ok(rows)
    }

    /// Detect the type of a field value
    ///
    /// Dates stay strings; the date functions parse them on use.
    fn detect_type(field: &str) -> Scalar {
        let field = field.trim();

        if field.is_empty() {
            return Scalar::Null;
        }

        // Try boolean
        if field.eq_ignore_ascii_case("true") {
            return Scalar::Boolean(true);
        }
        if field.eq_ignore_ascii_case("false") {
            return Scalar::Boolean(false);
        }

        // Try number
        if let Ok(n) = field.parse::<f64>() {
            if n.is_finite() {
                return Scalar::Number(n);
            }
        }

        // Default to string
        Scalar::string(field)
    }
}
