use serde::{Deserialize, Serialize};

/// A point in level space (pixels, origin top-left, Y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Integer key used to tell two points apart after rounding.
    pub fn rounded(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Inclusive on every edge: a point on the border counts as inside.
    pub fn contains(&self, p: Point) -> bool {
        self.spans_x(p.x) && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Half-open horizontal overlap, so rects that only touch do not overlap.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_edges() {
        let r = Rect::new(0.0, 10.0, 64.0, 32.0);
        assert!(r.contains(Point::new(0.0, 10.0)));
        assert!(r.contains(Point::new(64.0, 42.0)));
        assert!(!r.contains(Point::new(64.5, 20.0)));
        assert!(!r.contains(Point::new(10.0, 9.9)));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        let b = Rect::new(64.0, 0.0, 64.0, 64.0);
        let c = Rect::new(63.0, 0.0, 64.0, 64.0);
        assert!(!a.overlaps_x(&b));
        assert!(a.overlaps_x(&c));
    }

    #[test]
    fn rounded_key_merges_near_points() {
        assert_eq!(
            Point::new(100.2, 40.4).rounded(),
            Point::new(99.8, 39.6).rounded()
        );
        assert_ne!(Point::new(100.0, 40.0).rounded(), Point::new(101.0, 40.0).rounded());
    }
}
