//! Z-order: paint order and drag reordering

use crate::transform::normalize;
use bandwork_core::{Band, ControlObject};
use log::debug;

/// Objects sorted top-most first; ties keep array order
pub fn paint_order(band: &Band) -> Vec<&ControlObject> {
    let mut sorted: Vec<&ControlObject> = band.objects.iter().collect();
    sorted.sort_by(|a, b| b.z_index.cmp(&a.z_index));
    sorted
}

/// Reassign z-indices from `count` down to 1 following `order`
fn assign_dense(band: &Band, order: &[&str]) -> Band {
    let count = order.len();
    let mut out = band.clone();
    for obj in &mut out.objects {
        if let Some(rank) = order.iter().position(|id| *id == obj.id) {
            obj.z_index = (count - rank) as i32;
            *obj = normalize(obj);
        }
    }
    out
}

fn move_in_paint_order(band: &Band, id: &str, to: impl FnOnce(usize) -> usize) -> Band {
    let mut order: Vec<&str> = paint_order(band).into_iter().map(|o| o.id.as_str()).collect();
    let Some(from) = order.iter().position(|o| *o == id) else {
        return band.clone();
    };
    let moved = order.remove(from);
    let index = to(order.len()).min(order.len());
    order.insert(index, moved);
    debug!("z-order of {} in band {}: {} -> {}", id, band.id, from, index);
    assign_dense(band, &order)
}

/// Drop `dragged` onto the paint-order slot of `target`
///
/// The band's z-indices become exactly `1..=N` afterwards. Unknown ids
/// leave the band unchanged.
pub fn reorder(band: &Band, dragged: &str, target: &str) -> Band {
    let Some(to) = paint_order(band).iter().position(|o| o.id == target) else {
        return band.clone();
    };
    move_in_paint_order(band, dragged, |_| to)
}

pub fn bring_to_front(band: &Band, id: &str) -> Band {
    move_in_paint_order(band, id, |_| 0)
}

pub fn send_to_back(band: &Band, id: &str) -> Band {
    move_in_paint_order(band, id, |len| len)
}
