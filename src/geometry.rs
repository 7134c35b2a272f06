//! Shared geometric primitives. None of these types carry a coordinate space;
//! whether a value is in native or displayed space depends on which function
//! produced it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn has_area(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding rectangle of two corner points, in either order.
    pub fn spanning(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self {
            x: left,
            y: top,
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(i32::try_from(self.width).unwrap_or(i32::MAX))
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(i32::try_from(self.height).unwrap_or(i32::MAX))
    }

    pub fn contains(&self, point: Point, padding: i32) -> bool {
        point.x >= self.x.saturating_sub(padding)
            && point.x <= self.right().saturating_add(padding)
            && point.y >= self.y.saturating_sub(padding)
            && point.y <= self.bottom().saturating_add(padding)
    }

    pub fn corners(&self) -> [(Corner, Point); 4] {
        [
            (Corner::TopLeft, Point::new(self.x, self.y)),
            (Corner::TopRight, Point::new(self.right(), self.y)),
            (Corner::BottomLeft, Point::new(self.x, self.bottom())),
            (Corner::BottomRight, Point::new(self.right(), self.bottom())),
        ]
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.right(), self.y),
            Corner::BottomLeft => Point::new(self.x, self.bottom()),
            Corner::BottomRight => Point::new(self.right(), self.bottom()),
        }
    }
}

/// Annotations keyed by an opaque id.
pub type Rectangles = BTreeMap<String, Rectangle>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }
}

/// Uniform displayed/native ratio. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const IDENTITY: Self = Self(1.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn reciprocal(self) -> Self {
        Self(1.0 / self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as cairo-style unit floats.
    pub fn unit_rgb(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanning_normalizes_reversed_corners() {
        let rect = Rectangle::spanning(Point::new(50, 40), Point::new(10, 20));
        assert_eq!(rect, Rectangle::new(10, 20, 40, 20));
    }

    #[test]
    fn contains_respects_padding() {
        let rect = Rectangle::new(10, 10, 20, 20);
        assert!(rect.contains(Point::new(30, 30), 0));
        assert!(!rect.contains(Point::new(33, 30), 0));
        assert!(rect.contains(Point::new(33, 30), 4));
    }

    #[test]
    fn scale_factor_rejects_non_positive_and_non_finite_values() {
        assert!(ScaleFactor::new(0.0).is_none());
        assert!(ScaleFactor::new(-0.5).is_none());
        assert!(ScaleFactor::new(f64::NAN).is_none());
        assert!(ScaleFactor::new(f64::INFINITY).is_none());
        assert_eq!(ScaleFactor::new(0.4).map(ScaleFactor::get), Some(0.4));
    }

    #[test]
    fn reciprocal_inverts_factor() {
        let scale = ScaleFactor::new(0.25).unwrap();
        assert_eq!(scale.reciprocal().get(), 4.0);
    }

    #[test]
    fn corner_opposites_pair_up() {
        assert_eq!(Corner::TopLeft.opposite(), Corner::BottomRight);
        assert_eq!(Corner::BottomLeft.opposite(), Corner::TopRight);
    }
}
