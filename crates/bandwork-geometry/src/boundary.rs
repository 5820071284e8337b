//! Band boundary drag and vertical stacking
//!
//! Moving the bottom boundary of one band cascades to every band below
//! it: their edges and all of their objects shift by the same amount so
//! the stack stays contiguous. Objects of the dragged band stay put.

use crate::transform::{normalize, translate};
use bandwork_core::{Band, ControlObject};
use log::{debug, trace};

/// Shift a band and all of its objects vertically
fn shift_band(band: &Band, dy: f64) -> Band {
    let mut out = band.clone();
    out.top += dy;
    out.actual_bottom += dy;
    out.bottom = out.actual_bottom;
    out.objects = band
        .objects
        .iter()
        .map(|o: &ControlObject| translate(o, 0.0, dy))
        .collect();
    out
}

/// Lowest allowed boundary of `bands[index]`
fn min_bottom(bands: &[Band], index: usize, spacing: f64) -> f64 {
    let own = bands[index].top;
    match index.checked_sub(1).and_then(|i| bands.get(i)) {
        Some(prev) => own.max(prev.actual_bottom + spacing),
        None => own,
    }
}

/// Move the bottom boundary of `bands[index]` to `new_bottom`
///
/// The value is clamped to the band's top and, when a band precedes it, to
/// the previous band's boundary plus `spacing`. An out-of-range index
/// returns the bands unchanged.
pub fn resize_band(bands: &[Band], index: usize, new_bottom: f64, spacing: f64) -> Vec<Band> {
    let Some(band) = bands.get(index) else {
        return bands.to_vec();
    };
    let target = if new_bottom.is_finite() {
        new_bottom
    } else {
        band.actual_bottom
    };
    let clamped = target.max(min_bottom(bands, index, spacing));
    let change = clamped - band.actual_bottom;
    trace!(
        "resize band {} to {} (requested {}, change {})",
        band.id,
        clamped,
        new_bottom,
        change
    );

    bands
        .iter()
        .enumerate()
        .map(|(i, b)| {
            if i == index {
                let mut out = b.clone();
                out.actual_bottom = clamped;
                out.bottom = clamped;
                out
            } else if i > index && change != 0.0 {
                shift_band(b, change)
            } else {
                b.clone()
            }
        })
        .collect()
}

/// Lay bands out top to bottom, `spacing` apart, keeping their heights
///
/// Objects move with their band. Used after inserting or removing a band.
pub fn restack_bands(bands: &[Band], spacing: f64) -> Vec<Band> {
    let mut out = Vec::with_capacity(bands.len());
    let mut cursor: Option<f64> = None;
    for band in bands {
        let top = match cursor {
            Some(prev_bottom) => prev_bottom + spacing,
            None => band.top,
        };
        let dy = top - band.top;
        let height = band.height();
        let mut moved = if dy != 0.0 {
            shift_band(band, dy)
        } else {
            band.clone()
        };
        moved.actual_bottom = moved.top + height;
        moved.bottom = moved.actual_bottom;
        moved.objects = moved.objects.iter().map(normalize).collect();
        cursor = Some(moved.actual_bottom);
        out.push(moved);
    }
    out
}

/// An in-progress boundary drag
///
/// Every step is computed from the snapshot taken when the drag began, so
/// pointer jitter never accumulates rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryDrag {
    pub band_index: usize,
    pub start_y: f64,
    snapshot: Vec<Band>,
}

impl BoundaryDrag {
    /// Start dragging the boundary of `bands[band_index]`
    pub fn begin(bands: &[Band], band_index: usize, start_y: f64) -> Option<Self> {
        if band_index >= bands.len() {
            return None;
        }
        debug!("begin boundary drag on band {} at y={}", band_index, start_y);
        Some(Self {
            band_index,
            start_y,
            snapshot: bands.to_vec(),
        })
    }

    /// Bands as they were when the drag began
    pub fn snapshot(&self) -> &[Band] {
        &self.snapshot
    }

    /// Bands for the pointer at `pointer_y`
    pub fn step(&self, pointer_y: f64, spacing: f64) -> Vec<Band> {
        let original = self.snapshot[self.band_index].actual_bottom;
        let delta = pointer_y - self.start_y;
        resize_band(&self.snapshot, self.band_index, original + delta, spacing)
    }
}

/// Boundary drag gesture state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(BoundaryDrag),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    /// Pointer down on a band boundary
    pub fn press(&mut self, bands: &[Band], band_index: usize, y: f64) {
        *self = match BoundaryDrag::begin(bands, band_index, y) {
            Some(drag) => DragState::Dragging(drag),
            None => DragState::Idle,
        };
    }

    /// Pointer move; `None` while idle
    pub fn pointer_move(&self, y: f64, spacing: f64) -> Option<Vec<Band>> {
        match self {
            DragState::Dragging(drag) => Some(drag.step(y, spacing)),
            DragState::Idle => None,
        }
    }

    /// Pointer up: commit the final position and return to idle
    pub fn release(&mut self, y: f64, spacing: f64) -> Option<Vec<Band>> {
        let result = self.pointer_move(y, spacing);
        *self = DragState::Idle;
        result
    }

    /// Abort the drag, returning the untouched snapshot
    pub fn cancel(&mut self) -> Option<Vec<Band>> {
        match std::mem::take(self) {
            DragState::Dragging(drag) => Some(drag.snapshot),
            DragState::Idle => None,
        }
    }
}
