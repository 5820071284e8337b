//! # bandwork-geometry
//!
//! Pure geometry operations for the band designer surface. Every function
//! takes the current bands (and selection) and returns new values; inputs
//! are never mutated and invalid geometry is clamped rather than rejected.
//!
//! ## Example
//!
//! ```rust
//! use bandwork_core::{Band, BandKind, ControlObject, Frame};
//! use bandwork_geometry::{align, Alignment, ObjectRef};
//!
//! let band = Band::new("d", "Detail", BandKind::Detail, 0.0, 100.0)
//!     .with_object(ControlObject::shape("a", Frame::new(40.0, 0.0, 30.0, 30.0)))
//!     .with_object(ControlObject::shape("b", Frame::new(90.0, 40.0, 30.0, 30.0)));
//! let selection = [ObjectRef::new("d", "a"), ObjectRef::new("d", "b")];
//!
//! let bands = align(&[band], &selection, Alignment::Left);
//! assert_eq!(bands[0].objects[1].frame().unwrap().x, 40.0);
//! ```

pub mod align;
pub mod boundary;
pub mod bounds;
pub mod marquee;
pub mod paste;
pub mod selection;
pub mod transform;
pub mod zorder;

pub use align::{align, alignment_deltas, distribute, same_size, Alignment, DistributeAxis, SizeDimension};
pub use boundary::{resize_band, restack_bands, BoundaryDrag, DragState};
pub use bounds::{chrome_size, display_box, Rect};
pub use marquee::{hit_test, marquee_select, SelectionMode};
pub use paste::{move_to_band, paste_objects, remove_objects, IdGenerator, SequentialIds};
pub use selection::{locate, replace_objects, resolve, ObjectRef, Selected};
pub use transform::{move_selection, normalize, resize_object, translate, ResizeHandle};
pub use zorder::{bring_to_front, paint_order, reorder, send_to_back};
