//! Axis-aligned rectangles and display boxes

use bandwork_core::{ControlKind, ControlObject, BOX_PADDING};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with non-negative size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners given in any order
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// The same rectangle with negative width/height flipped
    pub fn normalized(&self) -> Self {
        Self::from_corners(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Overlap test; touching edges count as intersecting
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

/// Extra width/height a boxed control occupies on screen: border plus
/// padding on both sides. Lines have none.
pub fn chrome_size(object: &ControlObject) -> f64 {
    match object.kind {
        ControlKind::Line(_) => 0.0,
        _ => 2.0 * (object.border_width() + BOX_PADDING),
    }
}

/// The box an object visibly occupies
///
/// Boxed controls start at their frame origin and grow by border and
/// padding; lines use the min/max of their endpoints.
pub fn display_box(object: &ControlObject) -> Rect {
    match &object.kind {
        ControlKind::Line(l) => Rect::from_corners(l.x1, l.y1, l.x2, l.y2),
        _ => {
            let frame = object.frame().copied().unwrap_or_default();
            let chrome = chrome_size(object);
            Rect::new(frame.x, frame.y, frame.width + chrome, frame.height + chrome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandwork_core::{Border, Frame, Line};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_corners_normalizes() {
        assert_eq!(
            Rect::from_corners(50.0, 40.0, 10.0, 0.0),
            Rect::new(10.0, 0.0, 40.0, 40.0)
        );
        assert_eq!(
            Rect::new(10.0, 10.0, -5.0, -5.0).normalized(),
            Rect::new(5.0, 5.0, 5.0, 5.0)
        );
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(11.0, 0.0, 5.0, 5.0)));
        assert!(a.contains_point(10.0, 10.0));
    }

    #[test]
    fn test_display_box_includes_border_and_padding() {
        let obj = ControlObject::text("t", Frame::new(10.0, 20.0, 100.0, 30.0), "x")
            .with_border(Border::solid(1.0));
        assert_eq!(display_box(&obj), Rect::new(10.0, 20.0, 106.0, 36.0));

        let plain = ControlObject::shape("s", Frame::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(display_box(&plain), Rect::new(0.0, 0.0, 54.0, 54.0));
    }

    #[test]
    fn test_display_box_of_line() {
        let obj = ControlObject::line("l", Line::new(80.0, 30.0, 20.0, 10.0));
        assert_eq!(display_box(&obj), Rect::new(20.0, 10.0, 60.0, 20.0));
        assert_eq!(chrome_size(&obj), 0.0);
    }
}
