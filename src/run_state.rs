use exposure_common::{Point, SensorNetwork};

/// Phase that produced a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Random,
    Fallback,
}

/// Travel time of `steps` lattice steps.
#[inline(always)]
pub fn elapsed_after(steps: usize, step_time: f32) -> f32 {
    (steps as f64 * step_time as f64) as f32
}

/// Path, time and exposure accumulated by a single run.
///
/// Owned exclusively by one run; the path is append-only.
#[derive(Debug, Clone)]
pub struct RunState {
    pub current: Point,
    pub path: Vec<Point>,
    pub exposure: f32,
    pub elapsed_time: f32,
    pub random_steps: usize,
    pub fallback_steps: usize,
    step_time: f32,
}

impl RunState {
    /// Starts a run at `start` with nothing accumulated.
    pub fn new(start: Point, step_time: f32) -> Self {
        Self {
            current: start,
            path: vec![start],
            exposure: 0.0,
            elapsed_time: 0.0,
            random_steps: 0,
            fallback_steps: 0,
            step_time,
        }
    }

    /// Moves to `next`, crediting the step's exposure to the departing location.
    ///
    /// Elapsed time is recomputed from the step count so it keeps growing
    /// even where adding `step_time` to an f32 total would round to nothing.
    pub fn advance(&mut self, next: Point, network: &SensorNetwork, phase: Phase) {
        self.exposure += network.exposure_at(self.current) * self.step_time;
        self.current = next;
        self.path.push(next);
        match phase {
            Phase::Random => self.random_steps += 1,
            Phase::Fallback => self.fallback_steps += 1,
        }
        self.elapsed_time = elapsed_after(self.random_steps + self.fallback_steps, self.step_time);
    }

    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }
}
