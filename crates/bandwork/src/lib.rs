//! # bandwork
//!
//! The core of a banded report and label designer.
//!
//! ## Features
//!
//! - Formula language with validation, system variables and aggregates
//! - Band and object geometry: boundary drag, align, distribute, z-order, marquee
//! - Print pass with pagination, value formats and per-object fallbacks
//! - Design documents as JSON, detail rows from JSON or CSV
//!
//! ## Example
//!
//! ```rust
//! use bandwork::prelude::*;
//!
//! let engine = FormulaEngine::new();
//! let fields = [DataField::detail("price"), DataField::detail("qty")];
//!
//! // Design-time check
//! let outcome = engine.validate_formula("ROUND({price} * {qty}, 2)", &fields);
//! assert!(outcome.valid);
//!
//! // Evaluate against one row
//! let row = record([("price", Scalar::from(2.345)), ("qty", Scalar::from(1))]);
//! let ctx = EvaluationContext::simple().with_detail_row(&row);
//! let value = engine.evaluate_str("ROUND({price} * {qty}, 2)", &ctx).unwrap();
//! assert_eq!(value, Scalar::Number(2.35));
//! ```

pub mod prelude;
pub mod print;

// Re-export print pass types
pub use print::{
    DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES,
    format_value, Degradation, RenderOptions, RenderStats, RenderedBand, RenderedObject,
    RenderedPage, RenderedReport, ReportRenderer,
};

// Re-export core types
pub use bandwork_core::{
    format_number, record, Band, BandKind, BarcodeBox, Border, CalculatedBox, Color, ControlKind,
    ControlObject, DataField, Design, DesignSettings, Error, FieldBox, FieldSource, FormatType,
    Frame, ImageBox, Line, LineOrientation, LineStyle, Record, Result, Scalar, ShapeBox,
    ShapeKind, SummaryDisplayMode, TextBox, ValueFormat, BOX_PADDING, DESIGN_VERSION,
    MIN_OBJECT_SIZE, MIN_Z_INDEX,
};

// Re-export formula types
pub use bandwork_formula::{
    parse_formula, references, Arity, Clock, EvaluationContext, EvaluationOutcome, Expr, FixedClock,
    FormulaEngine, FormulaError, FormulaResult, FunctionCategory, FunctionDef, FunctionInfo,
    FunctionRegistry, SystemClock, ValidationOutcome,
};
pub use bandwork_formula::functions::date::parse_date;

// Re-export geometry types
pub use bandwork_geometry::{
    align, bring_to_front, display_box, distribute, hit_test, marquee_select, move_selection,
    move_to_band, normalize, paste_objects, reorder, resize_band, resize_object, restack_bands,
    same_size, send_to_back, Alignment, BoundaryDrag, DistributeAxis, DragState, ObjectRef, Rect,
    ResizeHandle, SelectionMode, SequentialIds, SizeDimension,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use bandwork_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};

use std::path::Path;

/// Read detail or master rows from a `.json` array or a `.csv` file
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("json") => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        #[cfg(feature = "csv")]
        Some("csv") => CsvReader::read_file(path, &CsvReadOptions::default())
            .map_err(|e| Error::other(e.to_string())),
        _ => Err(Error::other(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}

/// Read a single master record from a `.json` object
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<Record> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_rows_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("rows.json");
        std::fs::write(&json, r#"[{"amount": 1}, {"amount": "x"}]"#).unwrap();
        let rows = read_rows(&json).unwrap();
        assert_eq!(rows[1]["amount"], Scalar::string("x"));

        let csv = dir.path().join("rows.csv");
        std::fs::write(&csv, "amount\n7\n").unwrap();
        assert_eq!(read_rows(&csv).unwrap()[0]["amount"], Scalar::Number(7.0));

        let other = dir.path().join("rows.txt");
        std::fs::write(&other, "").unwrap();
        assert!(read_rows(&other).is_err());
    }

    #[test]
    fn test_read_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.json");
        std::fs::write(&path, r#"{"customer": "ACME"}"#).unwrap();
        assert_eq!(read_record(&path).unwrap()["customer"], Scalar::string("ACME"));
    }
}
