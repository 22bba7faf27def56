use serde::{Serialize, Deserialize};

use crate::vecmath::Point;

/// The best path found for one network, together with search statistics.
#[derive(Debug, Clone, Serialize, Deserialize)] // Derive traits for easy saving/loading
pub struct RunSummary {
    /// Name of the network description the search ran on.
    pub source: String,
    /// Base seed of the search; trial `i` used `seed + i`.
    pub seed: u64,
    /// Grid spacing the lattice was built with.
    pub delta_s: f32,
    /// Number of trials executed.
    pub trials: usize,
    /// Index of the trial that produced `path`.
    pub best_trial: usize,
    /// Exposure accumulated along `path`.
    pub exposure: f32,
    /// Travel time along `path`.
    pub elapsed_time: f32,
    /// Reference exposure from the network description.
    pub max_exposure: f32,
    /// Steps taken by the random walk before the fallback took over.
    pub random_steps: usize,
    /// Steps taken by the fallback router.
    pub fallback_steps: usize,
    /// Mean exposure over all trials.
    pub mean_exposure: f32,
    /// Lowest exposure over all trials.
    pub min_exposure: f32,
    pub path: Vec<Point>,
}
