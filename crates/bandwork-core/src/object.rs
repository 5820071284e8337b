//! Control objects placed inside bands
//!
//! Every control shares an id, a z-order and a print flag. The payload is a
//! tagged [`ControlKind`]: boxed controls carry a [`Frame`] and a [`Border`],
//! while [`Line`] is positioned by its two endpoints.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Padding between a boxed control's border and its content, in pixels
pub const BOX_PADDING: f64 = 2.0;

/// Smallest width/height a boxed control may have
pub const MIN_OBJECT_SIZE: f64 = 20.0;

/// Lowest z-index a control may have
pub const MIN_Z_INDEX: i32 = 1;

/// Raw position and size of a boxed control
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Stroke pattern for lines and borders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Border drawn around a boxed control
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    /// Border width in pixels (0 = no border)
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub style: LineStyle,
}

impl Border {
    /// A solid border of the given width
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            color: Some(Color::BLACK),
            style: LineStyle::Solid,
        }
    }
}

/// How a field or calculated value is formatted for print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatType {
    /// Print the value as-is
    #[default]
    General,
    /// Fixed decimals
    Number,
    /// Thousands separator, currency symbol and fixed decimals
    Currency,
    /// Multiply by 100 and append `%`
    Percent,
    /// `YYYY-MM-DD`
    Date,
    /// RMB-style capitalized amount
    ChineseUpper,
}

/// Value formatting settings of field and calculated controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFormat {
    #[serde(default)]
    pub format_type: FormatType,
    #[serde(default)]
    pub decimal_places: Option<u32>,
}

/// Static text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    pub text: String,
}

/// A data-bound field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    pub field_name: String,
    #[serde(default)]
    pub format: ValueFormat,
    /// Printed when the field is absent from the data
    #[serde(default)]
    pub text: String,
}

/// A computed field driven by a formula
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    pub formula: String,
    #[serde(default)]
    pub format: ValueFormat,
    /// Printed when the formula references a field the data lacks
    #[serde(default)]
    pub text: String,
}

/// An image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    /// Image location or data URL
    pub source: String,
}

/// A barcode or QR code
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    /// Symbology name, e.g. "CODE128" or "QR"
    pub symbology: String,
    /// Encoded content
    pub data: String,
}

/// Geometric shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Ellipse,
}

/// A filled shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBox {
    pub frame: Frame,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

/// A straight line between two endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    #[serde(default)]
    pub line_style: LineStyle,
    pub color: Color,
}

impl Line {
    /// A solid black line of width 1
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width: 1.0,
            line_style: LineStyle::Solid,
            color: Color::BLACK,
        }
    }

    /// Euclidean length of the segment
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Orientation of the segment
    pub fn orientation(&self) -> LineOrientation {
        if self.y1 == self.y2 {
            LineOrientation::Horizontal
        } else if self.x1 == self.x2 {
            LineOrientation::Vertical
        } else {
            LineOrientation::Diagonal
        }
    }
}

/// Orientation of a [`Line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
    Diagonal,
}

/// Variant payload of a control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlKind {
    Text(TextBox),
    Field(FieldBox),
    Calculated(CalculatedBox),
    Image(ImageBox),
    Barcode(BarcodeBox),
    Shape(ShapeBox),
    Line(Line),
}

/// A control placed in a band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlObject {
    pub id: String,
    /// Paint and selection order, higher is on top
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub print_visible: bool,
    pub kind: ControlKind,
}

fn default_true() -> bool {
    true
}

impl ControlObject {
    /// Create a control with z-index 1 that prints
    pub fn new<S: Into<String>>(id: S, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            z_index: MIN_Z_INDEX,
            print_visible: true,
            kind,
        }
    }

    /// Static text control
    pub fn text<S: Into<String>, T: Into<String>>(id: S, frame: Frame, text: T) -> Self {
        Self::new(
            id,
            ControlKind::Text(TextBox {
                frame,
                border: Border::default(),
                text: text.into(),
            }),
        )
    }

    /// Data-bound field control
    pub fn field<S: Into<String>, F: Into<String>>(id: S, frame: Frame, field_name: F) -> Self {
        Self::new(
            id,
            ControlKind::Field(FieldBox {
                frame,
                field_name: field_name.into(),
                ..Default::default()
            }),
        )
    }

    /// Calculated control
    pub fn calculated<S: Into<String>, F: Into<String>>(id: S, frame: Frame, formula: F) -> Self {
        Self::new(
            id,
            ControlKind::Calculated(CalculatedBox {
                frame,
                formula: formula.into(),
                ..Default::default()
            }),
        )
    }

    /// Rectangle shape control
    pub fn shape<S: Into<String>>(id: S, frame: Frame) -> Self {
        Self::new(
            id,
            ControlKind::Shape(ShapeBox {
                frame,
                ..Default::default()
            }),
        )
    }

    /// Line control
    pub fn line<S: Into<String>>(id: S, line: Line) -> Self {
        Self::new(id, ControlKind::Line(line))
    }

    /// Set the z-index
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the border
    ///
    /// Lines have no border; the call leaves them unchanged.
    pub fn with_border(mut self, border: Border) -> Self {
        if let Some(b) = self.border_mut() {
            *b = border;
        }
        self
    }

    /// The frame of a boxed control, `None` for lines
    pub fn frame(&self) -> Option<&Frame> {
        match &self.kind {
            ControlKind::Text(c) => Some(&c.frame),
            ControlKind::Field(c) => Some(&c.frame),
            ControlKind::Calculated(c) => Some(&c.frame),
            ControlKind::Image(c) => Some(&c.frame),
            ControlKind::Barcode(c) => Some(&c.frame),
            ControlKind::Shape(c) => Some(&c.frame),
            ControlKind::Line(_) => None,
        }
    }

    /// Mutable frame of a boxed control, `None` for lines
    pub fn frame_mut(&mut self) -> Option<&mut Frame> {
        match &mut self.kind {
            ControlKind::Text(c) => Some(&mut c.frame),
            ControlKind::Field(c) => Some(&mut c.frame),
            ControlKind::Calculated(c) => Some(&mut c.frame),
            ControlKind::Image(c) => Some(&mut c.frame),
            ControlKind::Barcode(c) => Some(&mut c.frame),
            ControlKind::Shape(c) => Some(&mut c.frame),
            ControlKind::Line(_) => None,
        }
    }

    /// The border of a boxed control, `None` for lines
    pub fn border(&self) -> Option<&Border> {
        match &self.kind {
            ControlKind::Text(c) => Some(&c.border),
            ControlKind::Field(c) => Some(&c.border),
            ControlKind::Calculated(c) => Some(&c.border),
            ControlKind::Image(c) => Some(&c.border),
            ControlKind::Barcode(c) => Some(&c.border),
            ControlKind::Shape(c) => Some(&c.border),
            ControlKind::Line(_) => None,
        }
    }

    /// Mutable border of a boxed control, `None` for lines
    pub fn border_mut(&mut self) -> Option<&mut Border> {
        match &mut self.kind {
            ControlKind::Text(c) => Some(&mut c.border),
            ControlKind::Field(c) => Some(&mut c.border),
            ControlKind::Calculated(c) => Some(&mut c.border),
            ControlKind::Image(c) => Some(&mut c.border),
            ControlKind::Barcode(c) => Some(&mut c.border),
            ControlKind::Shape(c) => Some(&mut c.border),
            ControlKind::Line(_) => None,
        }
    }

    /// Border width, 0 for lines and borderless controls
    pub fn border_width(&self) -> f64 {
        self.border().map_or(0.0, |b| b.width)
    }

    /// The line payload, if this is a line
    pub fn as_line(&self) -> Option<&Line> {
        match &self.kind {
            ControlKind::Line(line) => Some(line),
            _ => None,
        }
    }

    /// Mutable line payload, if this is a line
    pub fn as_line_mut(&mut self) -> Option<&mut Line> {
        match &mut self.kind {
            ControlKind::Line(line) => Some(line),
            _ => None,
        }
    }

    /// Whether this control is a line
    pub fn is_line(&self) -> bool {
        matches!(self.kind, ControlKind::Line(_))
    }

    /// Type tag as persisted
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ControlKind::Text(_) => "text",
            ControlKind::Field(_) => "field",
            ControlKind::Calculated(_) => "calculated",
            ControlKind::Image(_) => "image",
            ControlKind::Barcode(_) => "barcode",
            ControlKind::Shape(_) => "shape",
            ControlKind::Line(_) => "line",
        }
    }

    /// Vertical extent `(top, bottom)` in canvas coordinates
    pub fn vertical_span(&self) -> (f64, f64) {
        match &self.kind {
            ControlKind::Line(l) => (l.y1.min(l.y2), l.y1.max(l.y2)),
            _ => {
                let f = self.frame().copied().unwrap_or_default();
                (f.y, f.y + f.height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_orientation() {
        assert_eq!(
            Line::new(0.0, 5.0, 10.0, 5.0).orientation(),
            LineOrientation::Horizontal
        );
        assert_eq!(
            Line::new(3.0, 0.0, 3.0, 9.0).orientation(),
            LineOrientation::Vertical
        );
        assert_eq!(
            Line::new(0.0, 0.0, 3.0, 4.0).orientation(),
            LineOrientation::Diagonal
        );
        assert_eq!(Line::new(0.0, 0.0, 3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_json_shape() {
        let obj = ControlObject::calculated("c1", Frame::new(1.0, 2.0, 30.0, 20.0), "{a}+1");
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["kind"]["type"], "calculated");
        assert_eq!(json["kind"]["formula"], "{a}+1");
        assert_eq!(json["zIndex"], 1);

        let back: ControlObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_line_has_no_frame() {
        let obj = ControlObject::line("l1", Line::new(0.0, 0.0, 10.0, 0.0));
        assert!(obj.frame().is_none());
        assert_eq!(obj.border_width(), 0.0);
        assert_eq!(obj.vertical_span(), (0.0, 0.0));
    }
}
