//! Moving, resizing and normalizing single objects
//!
//! Every function returns a new object. [`normalize`] runs after each
//! mutation so the size and z-order floors live in one place.

use crate::selection::{replace_objects, resolve, ObjectRef};
use bandwork_core::{Band, ControlKind, ControlObject, MIN_OBJECT_SIZE, MIN_Z_INDEX};
use serde::{Deserialize, Serialize};

/// Drag handles of the resize gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// First endpoint of a line
    LineStart,
    /// Second endpoint of a line
    LineEnd,
}

impl ResizeHandle {
    fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamp an object to the geometry floors
///
/// Boxed controls are at least [`MIN_OBJECT_SIZE`] wide and high, the
/// z-index is at least [`MIN_Z_INDEX`], border and stroke widths are not
/// negative.
pub fn normalize(object: &ControlObject) -> ControlObject {
    let mut out = object.clone();
    out.z_index = out.z_index.max(MIN_Z_INDEX);

    if let Some(frame) = out.frame_mut() {
        frame.x = finite_or(frame.x, 0.0);
        frame.y = finite_or(frame.y, 0.0);
        frame.width = finite_or(frame.width, MIN_OBJECT_SIZE).max(MIN_OBJECT_SIZE);
        frame.height = finite_or(frame.height, MIN_OBJECT_SIZE).max(MIN_OBJECT_SIZE);
    }
    if let Some(border) = out.border_mut() {
        border.width = finite_or(border.width, 0.0).max(0.0);
    }
    if let Some(line) = out.as_line_mut() {
        line.stroke_width = finite_or(line.stroke_width, 0.0).max(0.0);
    }
    out
}

/// Shift an object by `(dx, dy)`; lines move both endpoints
pub fn translate(object: &ControlObject, dx: f64, dy: f64) -> ControlObject {
    let mut out = object.clone();
    match &mut out.kind {
        ControlKind::Line(line) => {
            line.x1 += dx;
            line.x2 += dx;
            line.y1 += dy;
            line.y2 += dy;
        }
        _ => {
            if let Some(frame) = out.frame_mut() {
                frame.x += dx;
                frame.y += dy;
            }
        }
    }
    normalize(&out)
}

/// Move every selected object by the same delta
pub fn move_selection(bands: &[Band], selection: &[ObjectRef], dx: f64, dy: f64) -> Vec<Band> {
    let updates: Vec<_> = resolve(bands, selection)
        .into_iter()
        .map(|s| (s.band_index, s.object_index, translate(s.object, dx, dy)))
        .collect();
    replace_objects(bands, updates)
}

/// Apply a resize-handle drag of `(dx, dy)`
///
/// Edges opposite the handle stay put, also when the size hits the floor.
/// Box handles leave lines alone and line handles leave boxes alone.
pub fn resize_object(object: &ControlObject, handle: ResizeHandle, dx: f64, dy: f64) -> ControlObject {
    let mut out = object.clone();
    match &mut out.kind {
        ControlKind::Line(line) => match handle {
            ResizeHandle::LineStart => {
                line.x1 += dx;
                line.y1 += dy;
            }
            ResizeHandle::LineEnd => {
                line.x2 += dx;
                line.y2 += dy;
            }
            _ => {}
        },
        _ => {
            if let Some(frame) = out.frame_mut() {
                let right = frame.x + frame.width;
                let bottom = frame.y + frame.height;

                if handle.moves_left() {
                    frame.width = (frame.width - dx).max(MIN_OBJECT_SIZE);
                    frame.x = right - frame.width;
                }
                if handle.moves_right() {
                    frame.width = (frame.width + dx).max(MIN_OBJECT_SIZE);
                }
                if handle.moves_top() {
                    frame.height = (frame.height - dy).max(MIN_OBJECT_SIZE);
                    frame.y = bottom - frame.height;
                }
                if handle.moves_bottom() {
                    frame.height = (frame.height + dy).max(MIN_OBJECT_SIZE);
                }
            }
        }
    }
    normalize(&out)
}
