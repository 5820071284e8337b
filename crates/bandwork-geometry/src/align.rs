//! Align, distribute and same-size over a selection
//!
//! All three work on display boxes, take the first resolved selection
//! entry as the reference, and return a new band list.

use crate::bounds::{chrome_size, display_box, Rect};
use crate::selection::{replace_objects, resolve, ObjectRef, Selected};
use crate::transform::{normalize, translate};
use bandwork_core::{Band, ControlKind, ControlObject, LineOrientation};
use log::debug;
use serde::{Deserialize, Serialize};

/// Edge or center to align on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Same horizontal center (center x)
    HorizontalCenter,
    /// Same vertical center (center y)
    VerticalCenter,
}

/// Axis for [`distribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

/// Dimension equalized by [`same_size`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeDimension {
    Width,
    Height,
    Both,
}

/// `(dx, dy)` moving `target` onto the reference edge
fn alignment_delta(alignment: Alignment, reference: &Rect, target: &Rect) -> (f64, f64) {
    match alignment {
        Alignment::Left => (reference.left() - target.left(), 0.0),
        Alignment::Right => (reference.right() - target.right(), 0.0),
        Alignment::Top => (0.0, reference.top() - target.top()),
        Alignment::Bottom => (0.0, reference.bottom() - target.bottom()),
        Alignment::HorizontalCenter => (reference.center_x() - target.center_x(), 0.0),
        Alignment::VerticalCenter => (0.0, reference.center_y() - target.center_y()),
    }
}

/// Per-object deltas for an alignment, reference excluded
pub fn alignment_deltas(
    bands: &[Band],
    selection: &[ObjectRef],
    alignment: Alignment,
) -> Vec<(usize, usize, f64, f64)> {
    let resolved = resolve(bands, selection);
    let Some((first, rest)) = resolved.split_first() else {
        return Vec::new();
    };
    let reference = display_box(first.object);

    rest.iter()
        .map(|s| {
            let (dx, dy) = alignment_delta(alignment, &reference, &display_box(s.object));
            (s.band_index, s.object_index, dx, dy)
        })
        .collect()
}

/// Shift every selected object onto the first one's edge or center
pub fn align(bands: &[Band], selection: &[ObjectRef], alignment: Alignment) -> Vec<Band> {
    let deltas = alignment_deltas(bands, selection, alignment);
    if deltas.is_empty() {
        return bands.to_vec();
    }
    debug!("align {:?} on {} objects", alignment, deltas.len() + 1);
    let updates: Vec<_> = deltas
        .into_iter()
        .map(|(b, o, dx, dy)| (b, o, translate(&bands[b].objects[o], dx, dy)))
        .collect();
    replace_objects(bands, updates)
}

fn leading(axis: DistributeAxis, rect: &Rect) -> f64 {
    match axis {
        DistributeAxis::Horizontal => rect.left(),
        DistributeAxis::Vertical => rect.top(),
    }
}

fn extent(axis: DistributeAxis, rect: &Rect) -> f64 {
    match axis {
        DistributeAxis::Horizontal => rect.width,
        DistributeAxis::Vertical => rect.height,
    }
}

/// Space selected objects evenly between the outermost two
///
/// Needs at least three objects; fewer leaves the bands unchanged. The
/// gap may come out negative when the objects overlap, which is kept.
pub fn distribute(bands: &[Band], selection: &[ObjectRef], axis: DistributeAxis) -> Vec<Band> {
    let mut items: Vec<(Selected<'_>, Rect)> = resolve(bands, selection)
        .into_iter()
        .map(|s| (s, display_box(s.object)))
        .collect();
    if items.len() < 3 {
        return bands.to_vec();
    }
    items.sort_by(|a, b| leading(axis, &a.1).total_cmp(&leading(axis, &b.1)));

    let first = &items[0].1;
    let last = &items[items.len() - 1].1;
    let span = leading(axis, last) + extent(axis, last) - leading(axis, first);
    let total: f64 = items.iter().map(|(_, r)| extent(axis, r)).sum();
    let gap = (span - total) / (items.len() - 1) as f64;
    debug!("distribute {:?}: {} objects, gap {}", axis, items.len(), gap);

    let mut edge = leading(axis, first) + extent(axis, first);
    let mut updates = Vec::with_capacity(items.len() - 2);
    for (selected, rect) in &items[1..items.len() - 1] {
        let target = edge + gap;
        let shift = target - leading(axis, rect);
        let (dx, dy) = match axis {
            DistributeAxis::Horizontal => (shift, 0.0),
            DistributeAxis::Vertical => (0.0, shift),
        };
        updates.push((
            selected.band_index,
            selected.object_index,
            translate(selected.object, dx, dy),
        ));
        edge = target + extent(axis, rect);
    }
    replace_objects(bands, updates)
}

/// Resize a line to `length`, keeping its start point and direction
fn set_line_length(object: &ControlObject, length: f64) -> ControlObject {
    let mut out = object.clone();
    if let Some(line) = out.as_line_mut() {
        let current = line.length();
        let (ux, uy) = if current > 0.0 {
            ((line.x2 - line.x1) / current, (line.y2 - line.y1) / current)
        } else {
            (1.0, 0.0)
        };
        line.x2 = line.x1 + ux * length;
        line.y2 = line.y1 + uy * length;
    }
    out
}

fn same_size_one(
    object: &ControlObject,
    reference: &ControlObject,
    dimension: SizeDimension,
) -> Option<ControlObject> {
    let target = display_box(reference);
    match &object.kind {
        ControlKind::Line(line) => {
            let length = match (line.orientation(), dimension) {
                (LineOrientation::Horizontal, SizeDimension::Width) => target.width,
                (LineOrientation::Vertical, SizeDimension::Height) => target.height,
                (LineOrientation::Diagonal, SizeDimension::Both) => match reference.as_line() {
                    Some(r) => r.length(),
                    None => target.width.hypot(target.height),
                },
                _ => return None,
            };
            Some(normalize(&set_line_length(object, length)))
        }
        _ => {
            let chrome = chrome_size(object);
            let mut out = object.clone();
            let frame = out.frame_mut()?;
            if matches!(dimension, SizeDimension::Width | SizeDimension::Both) {
                frame.width = target.width - chrome;
            }
            if matches!(dimension, SizeDimension::Height | SizeDimension::Both) {
                frame.height = target.height - chrome;
            }
            Some(normalize(&out))
        }
    }
}

/// Give every selected object the reference's display size
///
/// Boxes get a raw size that, with their own border and padding, matches
/// the reference display box. Lines only follow the dimension matching
/// their orientation; diagonal lines only change for
/// [`SizeDimension::Both`].
pub fn same_size(bands: &[Band], selection: &[ObjectRef], dimension: SizeDimension) -> Vec<Band> {
    let resolved = resolve(bands, selection);
    let Some((first, rest)) = resolved.split_first() else {
        return bands.to_vec();
    };
    let updates: Vec<_> = rest
        .iter()
        .filter_map(|s| {
            same_size_one(s.object, first.object, dimension)
                .map(|o| (s.band_index, s.object_index, o))
        })
        .collect();
    replace_objects(bands, updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandwork_core::{BandKind, Border, Frame, Line};
    use pretty_assertions::assert_eq;

    fn band(objects: Vec<ControlObject>) -> Vec<Band> {
        let mut band = Band::new("d", "Detail", BandKind::Detail, 0.0, 500.0);
        band.objects = objects;
        vec![band]
    }

    fn refs(ids: &[&str]) -> Vec<ObjectRef> {
        ids.iter().map(|id| ObjectRef::new("d", *id)).collect()
    }

    #[test]
    fn test_align_left_uses_display_boxes() {
        let bands = band(vec![
            ControlObject::text("a", Frame::new(100.0, 0.0, 50.0, 20.0), "A"),
            ControlObject::text("b", Frame::new(30.0, 40.0, 50.0, 20.0), "B")
                .with_border(Border::solid(3.0)),
            ControlObject::line("l", Line::new(300.0, 90.0, 200.0, 90.0)),
        ]);
        let out = align(&bands, &refs(&["a", "b", "l"]), Alignment::Left);
        for obj in &out[0].objects {
            assert_eq!(display_box(obj).left(), 100.0);
        }
        let line = out[0].objects[2].as_line().unwrap();
        assert_eq!((line.x1, line.x2), (200.0, 100.0));
    }

    #[test]
    fn test_align_right_and_centers() {
        let bands = band(vec![
            ControlObject::shape("a", Frame::new(0.0, 0.0, 96.0, 46.0)),
            ControlObject::shape("b", Frame::new(200.0, 200.0, 46.0, 96.0)),
        ]);
        let sel = refs(&["a", "b"]);

        let out = align(&bands, &sel, Alignment::Right);
        assert_eq!(display_box(&out[0].objects[1]).right(), 100.0);

        let out = align(&bands, &sel, Alignment::HorizontalCenter);
        assert_eq!(display_box(&out[0].objects[1]).center_x(), 50.0);
        assert_eq!(out[0].objects[1].frame().unwrap().y, 200.0);

        let out = align(&bands, &sel, Alignment::VerticalCenter);
        assert_eq!(display_box(&out[0].objects[1]).center_y(), 25.0);
    }

    #[test]
    fn test_align_single_or_empty_is_noop() {
        let bands = band(vec![ControlObject::shape("a", Frame::new(0.0, 0.0, 30.0, 30.0))]);
        assert_eq!(align(&bands, &refs(&["a"]), Alignment::Top), bands);
        assert_eq!(align(&bands, &[], Alignment::Top), bands);
    }

    #[test]
    fn test_distribute_horizontal() {
        // display widths are all 30 (26 + 4 padding)
        let bands = band(vec![
            ControlObject::shape("c", Frame::new(200.0, 0.0, 26.0, 26.0)),
            ControlObject::shape("a", Frame::new(0.0, 0.0, 26.0, 26.0)),
            ControlObject::shape("b", Frame::new(40.0, 0.0, 26.0, 26.0)),
            ControlObject::shape("d", Frame::new(50.0, 0.0, 26.0, 26.0)),
        ]);
        let out = distribute(&bands, &refs(&["c", "a", "b", "d"]), DistributeAxis::Horizontal);
        let xs: Vec<f64> = out[0]
            .objects
            .iter()
            .map(|o| o.frame().unwrap().x)
            .collect();
        // span 230, sizes 120, gap 110 / 3
        let gap = 110.0 / 3.0;
        assert_eq!(xs[0], 200.0);
        assert_eq!(xs[1], 0.0);
        assert!((xs[2] - (30.0 + gap)).abs() < 1e-9);
        assert!((xs[3] - (60.0 + 2.0 * gap)).abs() < 1e-9);
    }

    #[test]
    fn test_distribute_needs_three() {
        let bands = band(vec![
            ControlObject::shape("a", Frame::new(0.0, 0.0, 26.0, 26.0)),
            ControlObject::shape("b", Frame::new(90.0, 0.0, 26.0, 26.0)),
        ]);
        assert_eq!(distribute(&bands, &refs(&["a", "b"]), DistributeAxis::Vertical), bands);
    }

    #[test]
    fn test_same_size_compensates_border() {
        let bands = band(vec![
            ControlObject::text("a", Frame::new(0.0, 0.0, 100.0, 40.0), "A"),
            ControlObject::text("b", Frame::new(0.0, 50.0, 30.0, 30.0), "B")
                .with_border(Border::solid(2.0)),
        ]);
        let out = same_size(&bands, &refs(&["a", "b"]), SizeDimension::Both);
        let a = display_box(&out[0].objects[0]);
        let b = display_box(&out[0].objects[1]);
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert_eq!(out[0].objects[1].frame().unwrap().width, 96.0);

        let out = same_size(&bands, &refs(&["a", "b"]), SizeDimension::Width);
        assert_eq!(out[0].objects[1].frame().unwrap().height, 30.0);
    }

    #[test]
    fn test_same_size_lines_follow_orientation() {
        let bands = band(vec![
            ControlObject::shape("a", Frame::new(0.0, 0.0, 76.0, 36.0)),
            ControlObject::line("h", Line::new(50.0, 10.0, 0.0, 10.0)),
            ControlObject::line("v", Line::new(0.0, 0.0, 0.0, 10.0)),
            ControlObject::line("g", Line::new(0.0, 0.0, 3.0, 4.0)),
        ]);
        let sel = refs(&["a", "h", "v", "g"]);

        let out = same_size(&bands, &sel, SizeDimension::Width);
        let h = out[0].objects[1].as_line().unwrap();
        assert_eq!((h.x1, h.x2), (50.0, -30.0));
        assert_eq!(out[0].objects[2], bands[0].objects[2]);
        assert_eq!(out[0].objects[3], bands[0].objects[3]);

        let out = same_size(&bands, &sel, SizeDimension::Height);
        assert_eq!(out[0].objects[2].as_line().unwrap().y2, 40.0);

        let out = same_size(&bands, &sel, SizeDimension::Both);
        let g = out[0].objects[3].as_line().unwrap();
        assert!((g.length() - 80.0f64.hypot(40.0)).abs() < 1e-9);
    }
}
