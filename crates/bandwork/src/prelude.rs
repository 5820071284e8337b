//! Prelude module - common imports for bandwork users
//!
//! ```rust
//! use bandwork::prelude::*;
//! ```

pub use crate::{
    // Print pass
    read_rows,
    record,
    Alignment,
    // Design model
    Band,
    BandKind,
    Border,
    Color,
    ControlKind,
    ControlObject,
    DataField,
    Design,
    DistributeAxis,
    DragState,
    // Error types
    Error,
    // Formula types
    EvaluationContext,
    FixedClock,
    FormatType,
    FormulaEngine,
    FormulaError,
    Frame,
    Line,
    // Geometry
    ObjectRef,
    Rect,
    Record,
    RenderOptions,
    RenderedReport,
    ReportRenderer,
    Result,
    Scalar,
    SelectionMode,
    SizeDimension,
    SummaryDisplayMode,
    ValueFormat,
};
