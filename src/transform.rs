//! Rectangle projection between coordinate spaces.

use crate::geometry::{Rectangle, Rectangles, ScaleFactor};

pub fn scale_rectangle(rectangle: &Rectangle, factor: ScaleFactor) -> Rectangle {
    let factor = factor.get();
    Rectangle {
        x: scale_coordinate(rectangle.x, factor),
        y: scale_coordinate(rectangle.y, factor),
        width: scale_extent(rectangle.width, factor),
        height: scale_extent(rectangle.height, factor),
    }
}

/// Scales every entry into a new mapping; keys are preserved.
pub fn scale_rectangles(rectangles: &Rectangles, factor: ScaleFactor) -> Rectangles {
    rectangles
        .iter()
        .map(|(id, rectangle)| (id.clone(), scale_rectangle(rectangle, factor)))
        .collect()
}

pub use self::scale_rectangles as project_rectangles;

// `f64::round` rounds half away from zero. The `as` casts saturate.
fn scale_coordinate(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).round() as i32
}

fn scale_extent(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}
