//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use bandwork_core::Record;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write rows to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        rows: &[Record],
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(rows, file, options)
    }

    /// Write rows to a writer; values are printed as displayed
    pub fn write<W: Write>(rows: &[Record], writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        let columns = match &options.columns {
            Some(columns) => columns.clone(),
            None => Self::collect_columns(rows),
        };

        if options.write_header && !columns.is_empty() {
            csv_writer.write_record(&columns)?;
        }

        for row in rows {
            let record: Vec<String> = columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn collect_columns(rows: &[Record]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for key in rows.iter().flat_map(|r| r.keys()) {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvReadOptions, CsvReader};
    use bandwork_core::{record, Scalar};
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<Record> {
        vec![
            record([("name", Scalar::from("Pen, blue")), ("amount", Scalar::from(2.5))]),
            record([("name", Scalar::from("Ink")), ("qty", Scalar::from(3))]),
        ]
    }

    #[test]
    fn test_write_collects_columns() {
        let mut out = Vec::new();
        let options = CsvWriteOptions {
            line_terminator: LineTerminator::LF,
            ..Default::default()
        };
        CsvWriter::write(&rows(), &mut out, &options).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "amount,name,qty\n2.5,\"Pen, blue\",\n,Ink,3\n"
        );
    }

    #[test]
    fn test_write_explicit_columns_without_header() {
        let mut out = Vec::new();
        let options = CsvWriteOptions {
            write_header: false,
            columns: Some(vec!["qty".into(), "name".into()]),
            line_terminator: LineTerminator::LF,
            ..Default::default()
        };
        CsvWriter::write(&rows(), &mut out, &options).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ",\"Pen, blue\"\n3,Ink\n");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        CsvWriter::write_file(&rows(), &path, &CsvWriteOptions::default()).unwrap();
        let back = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();
        assert_eq!(back[0]["name"], Scalar::string("Pen, blue"));
        assert_eq!(back[1]["qty"], Scalar::Number(3.0));
        assert_eq!(back[0]["qty"], Scalar::Null);
    }
}
