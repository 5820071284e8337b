//! Object references and copy-on-write replacement of objects

use bandwork_core::{Band, ControlObject};
use serde::{Deserialize, Serialize};

/// Points at one object in one band
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub band_id: String,
    pub object_id: String,
}

impl ObjectRef {
    pub fn new<B: Into<String>, O: Into<String>>(band_id: B, object_id: O) -> Self {
        Self {
            band_id: band_id.into(),
            object_id: object_id.into(),
        }
    }
}

/// A resolved selection entry
#[derive(Debug, Clone, Copy)]
pub struct Selected<'b> {
    pub band_index: usize,
    pub object_index: usize,
    pub object: &'b ControlObject,
}

/// Locate a referenced object as `(band index, object index)`
pub fn locate(bands: &[Band], target: &ObjectRef) -> Option<(usize, usize)> {
    let band_index = bands.iter().position(|b| b.id == target.band_id)?;
    let object_index = bands[band_index].object_index(&target.object_id)?;
    Some((band_index, object_index))
}

/// Resolve a selection in selection order
///
/// Stale references are skipped and repeated ones kept only once, so the
/// first entry is always the reference object for align and same-size.
pub fn resolve<'b>(bands: &'b [Band], selection: &[ObjectRef]) -> Vec<Selected<'b>> {
    let mut out: Vec<Selected<'b>> = Vec::with_capacity(selection.len());
    for target in selection {
        let Some((band_index, object_index)) = locate(bands, target) else {
            continue;
        };
        let seen = out
            .iter()
            .any(|s| s.band_index == band_index && s.object_index == object_index);
        if !seen {
            out.push(Selected {
                band_index,
                object_index,
                object: &bands[band_index].objects[object_index],
            });
        }
    }
    out
}

/// New band list with the given objects replaced; the input is untouched
pub fn replace_objects<I>(bands: &[Band], updates: I) -> Vec<Band>
where
    I: IntoIterator<Item = (usize, usize, ControlObject)>,
{
    let mut out = bands.to_vec();
    for (band_index, object_index, object) in updates {
        if let Some(slot) = out
            .get_mut(band_index)
            .and_then(|b| b.objects.get_mut(object_index))
        {
            *slot = object;
        }
    }
    out
}
