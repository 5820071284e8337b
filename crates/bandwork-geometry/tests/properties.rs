//! Property tests for the geometry invariants

use bandwork_core::{Band, BandKind, ControlObject, Frame, Line};
use bandwork_geometry::{
    align, display_box, marquee_select, reorder, resize_band, Alignment, ObjectRef, Rect,
    SelectionMode,
};
use proptest::prelude::*;

/// Integral coordinates keep the float arithmetic exact
fn object(id: usize) -> impl Strategy<Value = ControlObject> {
    prop_oneof![
        (0i32..500, 0i32..60, 20i32..120, 20i32..60, 1i32..10).prop_map(
            move |(x, y, w, h, z)| {
                ControlObject::shape(
                    format!("o{}", id),
                    Frame::new(x as f64, y as f64, w as f64, h as f64),
                )
                .with_z_index(z)
            }
        ),
        (0i32..500, 0i32..60, 0i32..500, 0i32..60).prop_map(move |(x1, y1, x2, y2)| {
            ControlObject::line(
                format!("o{}", id),
                Line::new(x1 as f64, y1 as f64, x2 as f64, y2 as f64),
            )
        }),
    ]
}

fn objects(max: usize) -> impl Strategy<Value = Vec<ControlObject>> {
    (1..=max).prop_flat_map(|n| (0..n).map(object).collect::<Vec<_>>())
}

/// Contiguous stack of bands with objects placed relative to each top
fn stack() -> impl Strategy<Value = Vec<Band>> {
    prop::collection::vec((20i32..100, objects(4)), 1..5).prop_map(|specs| {
        let mut top = 0.0;
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (height, objs))| {
                let mut band = Band::new(
                    format!("b{}", i),
                    format!("Band {}", i),
                    BandKind::Detail,
                    top,
                    height as f64,
                );
                band.objects = objs
                    .into_iter()
                    .map(|o| bandwork_geometry::translate(&o, 0.0, top))
                    .collect();
                top += height as f64;
                band
            })
            .collect()
    })
}

fn object_ys(band: &Band) -> Vec<(f64, f64)> {
    band.objects
        .iter()
        .map(|o| match o.as_line() {
            Some(l) => (l.y1, l.y2),
            None => {
                let y = o.frame().map(|f| f.y).unwrap_or_default();
                (y, y)
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn reorder_leaves_dense_z(objs in objects(8), a in 0usize..8, b in 0usize..8) {
        let mut band = Band::new("d", "Detail", BandKind::Detail, 0.0, 100.0);
        band.objects = objs;
        let n = band.objects.len();
        let dragged = format!("o{}", a % n);
        let target = format!("o{}", b % n);

        let out = reorder(&band, &dragged, &target);
        if dragged != target {
            let mut zs: Vec<i32> = out.objects.iter().map(|o| o.z_index).collect();
            zs.sort();
            prop_assert_eq!(zs, (1..=n as i32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn boundary_drag_shifts_later_bands_exactly(
        bands in stack(),
        pick in 0usize..5,
        delta in 0i32..200,
    ) {
        let index = pick % bands.len();
        let delta = delta as f64;
        let out = resize_band(&bands, index, bands[index].actual_bottom + delta, 0.0);

        prop_assert_eq!(out[index].actual_bottom, bands[index].actual_bottom + delta);
        prop_assert_eq!(object_ys(&out[index]), object_ys(&bands[index]));
        for i in index + 1..bands.len() {
            prop_assert_eq!(out[i].top, bands[i].top + delta);
            prop_assert_eq!(out[i].actual_bottom, bands[i].actual_bottom + delta);
            let expected: Vec<(f64, f64)> = object_ys(&bands[i])
                .into_iter()
                .map(|(a, b)| (a + delta, b + delta))
                .collect();
            prop_assert_eq!(object_ys(&out[i]), expected);
        }
    }

    #[test]
    fn boundary_is_clamped(
        bands in stack(),
        pick in 0usize..5,
        target in -500.0f64..500.0,
        spacing in 0.0f64..10.0,
    ) {
        let index = pick % bands.len();
        let out = resize_band(&bands, index, target, spacing);
        prop_assert!(out[index].actual_bottom >= out[index].top);
        if index > 0 {
            prop_assert!(out[index].actual_bottom >= bands[index - 1].actual_bottom + spacing);
        }
    }

    #[test]
    fn marquee_is_deterministic(
        bands in stack(),
        x in -50.0f64..550.0,
        y in -50.0f64..400.0,
        w in -300.0f64..300.0,
        h in -300.0f64..300.0,
    ) {
        let rect = Rect::new(x, y, w, h);
        let first = marquee_select(&bands, &[], rect, SelectionMode::Replace);
        let second = marquee_select(&bands, &[], rect, SelectionMode::Replace);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn align_left_matches_reference(objs in objects(6)) {
        let mut band = Band::new("d", "Detail", BandKind::Detail, 0.0, 100.0);
        band.objects = objs;
        let selection: Vec<ObjectRef> = band
            .objects
            .iter()
            .map(|o| ObjectRef::new("d", o.id.as_str()))
            .collect();

        let out = align(&[band], &selection, Alignment::Left);
        let reference = display_box(&out[0].objects[0]).left();
        for obj in &out[0].objects {
            prop_assert!((display_box(obj).left() - reference).abs() < 1e-9);
        }
    }
}
