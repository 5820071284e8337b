//! The persisted design document

use crate::band::{Band, BandKind};
use crate::error::{Error, Result};
use crate::object::ControlObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current document format version
pub const DESIGN_VERSION: &str = "1.0";

/// Layout settings stored with the design
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    /// Vertical gap kept between consecutive bands
    #[serde(default)]
    pub band_spacing: f64,
    /// Height available to detail rows on one printed page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_body_height: Option<f64>,
    /// Fixed number of detail rows per printed page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<usize>,
}

/// A report design: its bands plus document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub bands: Vec<Band>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: DesignSettings,
}

impl Design {
    /// Create a design stamped with the current time
    pub fn new(bands: Vec<Band>) -> Self {
        Self::with_created_at(bands, Utc::now())
    }

    /// Create a design with an explicit creation time
    pub fn with_created_at(bands: Vec<Band>, created_at: DateTime<Utc>) -> Self {
        Self {
            bands,
            version: DESIGN_VERSION.to_string(),
            created_at,
            settings: DesignSettings::default(),
        }
    }

    /// Parse a design from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the design as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a design from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Save the design to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Get a band by index
    pub fn band(&self, index: usize) -> Result<&Band> {
        self.bands
            .get(index)
            .ok_or(Error::BandOutOfBounds(index, self.bands.len()))
    }

    /// Bands of one kind, in stacking order
    pub fn bands_of_kind(&self, kind: BandKind) -> impl Iterator<Item = &Band> + '_ {
        self.bands.iter().filter(move |b| b.kind == kind)
    }

    /// Find an object anywhere in the design, with its band index
    pub fn find_object(&self, id: &str) -> Result<(usize, &ControlObject)> {
        self.bands
            .iter()
            .enumerate()
            .find_map(|(i, band)| band.object(id).map(|o| (i, o)))
            .ok_or_else(|| Error::ObjectNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Frame, Line};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample() -> Design {
        let header = Band::new("h", "Header", BandKind::Header, 0.0, 40.0).with_object(
            ControlObject::text("t1", Frame::new(10.0, 5.0, 100.0, 20.0), "Invoice"),
        );
        let detail = Band::new("d", "Detail", BandKind::Detail, 40.0, 30.0)
            .with_object(ControlObject::field(
                "f1",
                Frame::new(10.0, 45.0, 80.0, 20.0),
                "amount",
            ))
            .with_object(ControlObject::line("l1", Line::new(0.0, 69.0, 500.0, 69.0)))
            .with_background_color_formula("IF({flag}, \"#EEEEEE\", \"#FFFFFF\")");
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Design::with_created_at(vec![header, detail], created)
    }

    #[test]
    fn test_json_roundtrip() {
        let design = sample();
        let json = design.to_json().unwrap();
        assert!(json.contains("\"createdAt\": \"2024-05-01T12:00:00Z\""));
        assert!(json.contains("\"actualBottom\""));
        let back = Design::from_json(&json).unwrap();
        assert_eq!(back, design);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.json");
        let design = sample();
        design.save(&path).unwrap();
        assert_eq!(Design::load(&path).unwrap(), design);
    }

    #[test]
    fn test_find_object() {
        let design = sample();
        let (band, obj) = design.find_object("l1").unwrap();
        assert_eq!(band, 1);
        assert!(obj.is_line());
        assert!(design.find_object("missing").is_err());
        assert!(design.band(7).is_err());
    }

    #[test]
    fn test_settings_default_when_absent() {
        let json = r#"{"bands": [], "version": "1.0", "createdAt": "2024-01-01T00:00:00Z"}"#;
        let design = Design::from_json(json).unwrap();
        assert_eq!(design.settings, DesignSettings::default());
    }
}
