use serde::{Deserialize, Serialize};

/// A continuous (x, y) position on the sensor field.
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline(always)]
    pub fn new(x: f32, y: f32) -> Self { Self { x, y } }
    #[inline(always)]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x; let dy = self.y - other.y; dx * dx + dy * dy
    }
    #[inline(always)]
    pub fn distance(self, other: Self) -> f32 { self.distance_squared(other).sqrt() }
    /// Taxicab distance, the travel length along lattice edges.
    #[inline(always)]
    pub fn manhattan_distance(self, other: Self) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
    #[inline(always)]
    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

/// Snaps a coordinate to the nearest lattice index (round half up).
#[inline(always)]
pub fn snap_to_lattice(value: f32, delta_s: f32) -> i64 {
    (value / delta_s + 0.5).floor() as i64
}
