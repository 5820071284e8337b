//! # bandwork-core
//!
//! Core data structures for the bandwork report designer.
//!
//! This crate provides the fundamental types used throughout bandwork:
//! - [`Scalar`] and [`Record`] - data values and rows
//! - [`DataField`] - fields declared by the host application
//! - [`Band`] and [`ControlObject`] - the design surface
//! - [`Design`] - the persisted document
//!
//! ## Example
//!
//! ```rust
//! use bandwork_core::{Band, BandKind, ControlObject, Design, Frame};
//!
//! let detail = Band::new("detail", "Detail", BandKind::Detail, 0.0, 30.0)
//!     .with_object(ControlObject::field("f1", Frame::new(0.0, 5.0, 80.0, 20.0), "amount"));
//!
//! let design = Design::new(vec![detail]);
//! let json = design.to_json().unwrap();
//! assert_eq!(Design::from_json(&json).unwrap(), design);
//! ```

pub mod band;
pub mod color;
pub mod design;
pub mod error;
pub mod field;
pub mod object;
pub mod value;

// Re-exports for convenience
pub use band::{Band, BandKind, SummaryDisplayMode};
pub use color::Color;
pub use design::{Design, DesignSettings, DESIGN_VERSION};
pub use error::{Error, Result};
pub use field::{DataField, FieldSource};
pub use object::{
    BarcodeBox, Border, CalculatedBox, ControlKind, ControlObject, FieldBox, FormatType, Frame,
    ImageBox, Line, LineOrientation, LineStyle, ShapeBox, ShapeKind, TextBox, ValueFormat,
    BOX_PADDING, MIN_OBJECT_SIZE, MIN_Z_INDEX,
};
pub use value::{format_number, record, Record, Scalar};
