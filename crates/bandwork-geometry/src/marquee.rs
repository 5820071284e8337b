//! Rubber-band selection

use crate::bounds::{display_box, Rect};
use crate::selection::ObjectRef;
use bandwork_core::Band;
use serde::{Deserialize, Serialize};

/// How a marquee combines with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Plain drag
    #[default]
    Replace,
    /// Shift or Ctrl held
    Add,
}

/// Objects whose display box touches `rect`, in band then array order
pub fn hit_test(bands: &[Band], rect: Rect) -> Vec<ObjectRef> {
    let area = rect.normalized();
    bands
        .iter()
        .flat_map(|band| {
            band.objects
                .iter()
                .filter(move |obj| display_box(obj).intersects(&area))
                .map(move |obj| ObjectRef::new(band.id.as_str(), obj.id.as_str()))
        })
        .collect()
}

/// Selection after dragging a marquee over `rect`
///
/// In [`SelectionMode::Add`] the current selection keeps its order and new
/// hits are appended once.
pub fn marquee_select(
    bands: &[Band],
    current: &[ObjectRef],
    rect: Rect,
    mode: SelectionMode,
) -> Vec<ObjectRef> {
    let hits = hit_test(bands, rect);
    match mode {
        SelectionMode::Replace => hits,
        SelectionMode::Add => {
            let mut out = current.to_vec();
            for hit in hits {
                if !out.contains(&hit) {
                    out.push(hit);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandwork_core::{BandKind, ControlObject, Frame, Line};
    use pretty_assertions::assert_eq;

    fn bands() -> Vec<Band> {
        vec![
            Band::new("h", "Header", BandKind::Header, 0.0, 100.0)
                .with_object(ControlObject::shape("far", Frame::new(400.0, 0.0, 30.0, 30.0)))
                .with_object(ControlObject::shape("near", Frame::new(10.0, 10.0, 30.0, 30.0))),
            Band::new("d", "Detail", BandKind::Detail, 100.0, 100.0)
                .with_object(ControlObject::line("l", Line::new(90.0, 150.0, 20.0, 150.0))),
        ]
    }

    #[test]
    fn test_hit_test_with_reversed_rect() {
        let hits = hit_test(&bands(), Rect::new(100.0, 160.0, -100.0, -160.0));
        assert_eq!(
            hits,
            vec![ObjectRef::new("h", "near"), ObjectRef::new("d", "l")]
        );
    }

    #[test]
    fn test_line_uses_endpoint_box() {
        let hits = hit_test(&bands(), Rect::new(50.0, 140.0, 5.0, 20.0));
        assert_eq!(hits, vec![ObjectRef::new("d", "l")]);
        assert!(hit_test(&bands(), Rect::new(95.0, 140.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_add_mode_keeps_existing_first() {
        let current = vec![ObjectRef::new("d", "l"), ObjectRef::new("h", "far")];
        let out = marquee_select(
            &bands(),
            &current,
            Rect::new(0.0, 0.0, 200.0, 200.0),
            SelectionMode::Add,
        );
        assert_eq!(
            out,
            vec![
                ObjectRef::new("d", "l"),
                ObjectRef::new("h", "far"),
                ObjectRef::new("h", "near"),
            ]
        );

        let out = marquee_select(
            &bands(),
            &current,
            Rect::new(0.0, 0.0, 50.0, 50.0),
            SelectionMode::Replace,
        );
        assert_eq!(out, vec![ObjectRef::new("h", "near")]);
    }
}
