//! Declared data fields

use serde::{Deserialize, Serialize};

/// Where a data field comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldSource {
    /// Field of the master record (one per report)
    #[default]
    Master,
    /// Field of the repeating detail rows
    Detail,
}

/// A data field declared by the host application
///
/// Fields are immutable for the duration of a design session; the formula
/// validator uses their names as the set of known variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    /// Field name as referenced by `{name}`
    pub name: String,
    /// Human readable label
    pub label: String,
    /// Master or detail
    #[serde(default)]
    pub source: FieldSource,
}

impl DataField {
    /// Declare a master-record field
    pub fn master<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            source: FieldSource::Master,
        }
    }

    /// Declare a detail-row field
    pub fn detail<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            source: FieldSource::Detail,
        }
    }

    /// Set the display label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }
}
