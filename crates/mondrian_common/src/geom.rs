//! Integer geometry primitives.
//!
//! All placement arithmetic is done in integer units. Coordinates are `i64`
//! so that packed extents and areas of large instances cannot overflow.

use serde::{Deserialize, Serialize};

/// A point in the placement plane.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The fixed target outline that a packing must fit inside.
///
/// Never mutated after load.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Outline width.
    pub width: i64,
    /// Outline height.
    pub height: i64,
}

impl Outline {
    /// Creates an outline from its dimensions.
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Returns whether a packing with the given extents fits inside the outline.
    pub fn contains(&self, len_x: i64, len_y: i64) -> bool {
        len_x <= self.width && len_y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_new() {
        let p = Point::new(3, -7);
        assert_eq!(p.x, 3);
        assert_eq!(p.y, -7);
    }

    #[test]
    fn outline_contains_exact_fit() {
        let o = Outline::new(10, 20);
        assert!(o.contains(10, 20));
    }

    #[test]
    fn outline_contains_smaller() {
        let o = Outline::new(10, 20);
        assert!(o.contains(1, 1));
        assert!(o.contains(0, 0));
    }

    #[test]
    fn outline_rejects_either_axis() {
        let o = Outline::new(10, 20);
        assert!(!o.contains(11, 20));
        assert!(!o.contains(10, 21));
        assert!(!o.contains(11, 21));
    }

    #[test]
    fn point_serde_roundtrip() {
        let p = Point::new(5, 9);
        let json = serde_json::to_string(&p).unwrap();
        let restored: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}
