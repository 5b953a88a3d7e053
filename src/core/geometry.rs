//=========================================================================
// Geometry & Timing
//=========================================================================
//
// Small value types shared by every layer: points, sizes, rectangles,
// and the frame/millisecond normalisation used by the frame clock.
//
// The host frame clock reports elapsed time in "frames", normalised so
// that 1.0 is one 60 Hz frame.
//
//=========================================================================

use std::ops::{Add, Sub};

//=== Timing ==============================================================

/// Milliseconds in one normalised frame.
pub const FRAME_MS: f32 = 1000.0 / 60.0;

/// Converts normalised elapsed frames to milliseconds.
pub fn frames_to_ms(frames: f32) -> f32 {
    frames * FRAME_MS
}

/// Converts milliseconds to normalised elapsed frames.
pub fn ms_to_frames(ms: f32) -> f32 {
    ms / FRAME_MS
}

//=== Point ===============================================================

/// A position in some 2D coordinate space (local or screen).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Largest per-axis distance to `other`.
    pub fn chebyshev_distance(self, other: Point) -> f32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

//=== Size ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x <= self.origin.x + self.size.width
            && p.y <= self.origin.y + self.size.height
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_is_sixtieth_of_a_second() {
        assert!((frames_to_ms(60.0) - 1000.0).abs() < 1e-3);
        assert!((ms_to_frames(FRAME_MS) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn chebyshev_distance_takes_largest_axis() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(-3.0, 7.5);
        assert_eq!(a.chebyshev_distance(b), 7.5);
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 100.0, 40.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(110.0, 50.0)));
        assert!(!r.contains(Point::new(111.0, 20.0)));
    }

    #[test]
    fn centered_rect_is_symmetric() {
        let r = Rect::centered(Point::new(0.0, 0.0), Size::new(70.0, 98.0));
        assert_eq!(r.origin, Point::new(-35.0, -49.0));
    }
}
