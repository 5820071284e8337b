//! Pasting, moving and removing objects across bands

use crate::selection::{locate, ObjectRef};
use crate::transform::{normalize, translate};
use bandwork_core::{Band, ControlObject, MIN_Z_INDEX};
use log::debug;

/// Source of fresh object ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// `prefix1`, `prefix2`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continue after the highest `prefixN` id already used in `bands`
    pub fn after_existing<S: Into<String>>(prefix: S, bands: &[Band]) -> Self {
        let prefix = prefix.into();
        let highest = bands
            .iter()
            .flat_map(|b| b.objects.iter())
            .filter_map(|o| o.id.strip_prefix(prefix.as_str())?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            prefix,
            next: highest + 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

fn max_z(band: &Band) -> i32 {
    band.objects
        .iter()
        .map(|o| o.z_index)
        .max()
        .unwrap_or(MIN_Z_INDEX - 1)
}

/// Paste copies of `objects` into `band`, offset by `(dx, dy)`
///
/// Every copy gets a fresh id. The copies are stacked above the band's
/// existing objects and keep their relative z-order.
pub fn paste_objects(
    band: &Band,
    objects: &[ControlObject],
    ids: &mut dyn IdGenerator,
    offset: (f64, f64),
) -> Band {
    let base = max_z(band);
    let lowest = objects.iter().map(|o| o.z_index).min().unwrap_or(MIN_Z_INDEX);
    let mut out = band.clone();
    for obj in objects {
        let mut copy = translate(obj, offset.0, offset.1);
        copy.id = ids.next_id();
        copy.z_index = base + 1 + (obj.z_index - lowest);
        out.objects.push(normalize(&copy));
    }
    debug!("pasted {} objects into band {}", objects.len(), band.id);
    out
}

/// Move an object into another band, keeping its id and position
///
/// The object lands on top of the target band. Stale references or an
/// unknown target band leave the bands unchanged.
pub fn move_to_band(bands: &[Band], object: &ObjectRef, target_band_id: &str) -> Vec<Band> {
    let Some((from, index)) = locate(bands, object) else {
        return bands.to_vec();
    };
    let Some(to) = bands.iter().position(|b| b.id == target_band_id) else {
        return bands.to_vec();
    };
    if from == to {
        return bands.to_vec();
    }
    let mut out = bands.to_vec();
    let mut moved = out[from].objects.remove(index);
    moved.z_index = max_z(&out[to]) + 1;
    out[to].objects.push(normalize(&moved));
    out
}

/// Delete the referenced objects
pub fn remove_objects(bands: &[Band], selection: &[ObjectRef]) -> Vec<Band> {
    bands
        .iter()
        .map(|band| {
            let mut out = band.clone();
            out.objects.retain(|o| {
                !selection
                    .iter()
                    .any(|r| r.band_id == band.id && r.object_id == o.id)
            });
            out
        })
        .collect()
}
