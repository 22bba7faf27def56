use serde::{Deserialize, Serialize};

use crate::network::{NetworkError, SensorNetwork};
use crate::vecmath::{snap_to_lattice, Point};

/// Per-network constants derived once and read by every run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    // Lattice
    pub delta_s: f32,
    pub cols: usize, // K
    pub rows: usize, // L

    // Motion
    pub max_speed: f32,
    pub limit_time: f32,
    pub step_time: f32, // delta_s / max_speed

    // Snapped endpoints (row, col)
    pub start_row: usize,
    pub start_col: usize,
    pub dest_row: usize,
    pub dest_col: usize,
}

impl RunParams {
    /// Validates `network` and derives the lattice constants for spacing `delta_s`.
    pub fn derive(network: &SensorNetwork, delta_s: f32) -> Result<Self, NetworkError> {
        network.validate(delta_s)?;

        // Validation guarantees every value below is finite and non-negative.
        let snap = |v: f32| snap_to_lattice(v, delta_s).max(0) as usize;

        Ok(Self {
            delta_s,
            cols: snap(network.width),
            rows: snap(network.height),
            max_speed: network.max_speed,
            limit_time: network.limit_time,
            step_time: delta_s / network.max_speed,
            start_row: snap(network.start.y),
            start_col: snap(network.start.x),
            dest_row: snap(network.destination.y),
            dest_col: snap(network.destination.x),
        })
    }

    /// Coordinates of the destination's lattice location.
    pub fn snapped_destination(&self) -> Point {
        Point::new(self.dest_col as f32 * self.delta_s, self.dest_row as f32 * self.delta_s)
    }
}
