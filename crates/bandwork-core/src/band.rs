//! Horizontal report bands

use crate::object::ControlObject;
use serde::{Deserialize, Serialize};

/// Role of a band in the printed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandKind {
    /// Printed at the top of every page
    Header,
    /// Repeated once per detail row
    Detail,
    /// Totals; see [`SummaryDisplayMode`]
    Summary,
    /// Printed at the bottom of every page
    Footer,
}

/// When a summary band is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryDisplayMode {
    /// Once, after the last detail row
    #[default]
    LastPage,
    /// On every page, with page aggregates
    EveryPage,
}

/// A band of the design surface
///
/// Bands are stacked vertically in array order. `actual_bottom` is the
/// draggable boundary; `bottom` mirrors it for older documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BandKind,
    pub top: f64,
    pub bottom: f64,
    pub actual_bottom: f64,
    #[serde(default)]
    pub objects: Vec<ControlObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_height_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_display_mode: Option<SummaryDisplayMode>,
}

impl Band {
    /// Create an empty band spanning `top..top + height`
    pub fn new<I: Into<String>, N: Into<String>>(
        id: I,
        name: N,
        kind: BandKind,
        top: f64,
        height: f64,
    ) -> Self {
        let bottom = top + height.max(0.0);
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            top,
            bottom,
            actual_bottom: bottom,
            objects: Vec::new(),
            row_height_formula: None,
            background_color_formula: None,
            summary_display_mode: None,
        }
    }

    /// Add an object (builder style)
    pub fn with_object(mut self, object: ControlObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Set the row height formula (builder style)
    pub fn with_row_height_formula<S: Into<String>>(mut self, formula: S) -> Self {
        self.row_height_formula = Some(formula.into());
        self
    }

    /// Set the background color formula (builder style)
    pub fn with_background_color_formula<S: Into<String>>(mut self, formula: S) -> Self {
        self.background_color_formula = Some(formula.into());
        self
    }

    /// Set the summary display mode (builder style)
    pub fn with_summary_display_mode(mut self, mode: SummaryDisplayMode) -> Self {
        self.summary_display_mode = Some(mode);
        self
    }

    /// Designed height of the band
    pub fn height(&self) -> f64 {
        (self.actual_bottom - self.top).max(0.0)
    }

    /// Find an object by id
    pub fn object(&self, id: &str) -> Option<&ControlObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Position of an object by id
    pub fn object_index(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Summary display mode with its default applied
    pub fn summary_mode(&self) -> SummaryDisplayMode {
        self.summary_display_mode.unwrap_or_default()
    }
}
