use crate::grid::{Direction, Grid, GridIndex};
use crate::run_state::{Phase, RunState};
use anyhow::Result;
use exposure_common::{Point, RunParams, SensorNetwork};
use log::trace;
use rand::distr::{Distribution, Uniform};
use rand::Rng;

/// Outcome of one construct-and-score run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Start first, snapped destination last.
    pub path: Vec<Point>,
    pub exposure: f32,
    pub elapsed_time: f32,
    pub random_steps: usize,
    pub fallback_steps: usize,
}

impl From<RunState> for RunResult {
    fn from(state: RunState) -> Self {
        Self {
            path: state.path,
            exposure: state.exposure,
            elapsed_time: state.elapsed_time,
            random_steps: state.random_steps,
            fallback_steps: state.fallback_steps,
        }
    }
}

/// One-step lookahead admission test for the random walk.
///
/// Accepts `candidate` iff travelling from it to the destination's lattice
/// location, plus one extra grid step, fits in the time left after
/// `elapsed_time`.
#[inline(always)]
pub fn can_continue(candidate: Point, params: &RunParams, elapsed_time: f32) -> bool {
    let shortest_time =
        (candidate.manhattan_distance(params.snapped_destination()) + params.delta_s) / params.max_speed;
    shortest_time < params.limit_time - elapsed_time
}

#[inline(always)]
fn step_toward(from: usize, to: usize) -> usize {
    if from < to { from + 1 } else { from - 1 }
}

/// Randomised exposure-seeking path construction over a shared, read-only network.
///
/// Holds no per-run state, so a single instance can serve many concurrent runs
/// as long as each brings its own rng.
#[derive(Debug, Clone)]
pub struct RandomHeuristic<'a> {
    network: &'a SensorNetwork,
    grid: &'a Grid,
    params: RunParams,
    direction_dist: Uniform<usize>,
}

impl<'a> RandomHeuristic<'a> {
    /// Validates `network` against `grid`'s spacing and derives the run parameters.
    pub fn new(network: &'a SensorNetwork, grid: &'a Grid) -> Result<Self> {
        let params = RunParams::derive(network, grid.delta_s())?;
        if (params.rows, params.cols) != (grid.rows(), grid.cols()) {
            anyhow::bail!(
                "Grid is {}x{} steps but the network field needs {}x{}.",
                grid.rows(),
                grid.cols(),
                params.rows,
                params.cols
            );
        }
        let direction_dist = Uniform::new(0, Direction::ALL.len())?;
        Ok(Self { network, grid, params, direction_dist })
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn start_index(&self) -> GridIndex {
        GridIndex::new(self.params.start_row, self.params.start_col)
    }

    pub fn destination_index(&self) -> GridIndex {
        GridIndex::new(self.params.dest_row, self.params.dest_col)
    }

    /// Draws uniformly among the four lattice moves until one stays on the lattice.
    pub fn propose_next_location<R: Rng + ?Sized>(&self, current: Point, rng: &mut R) -> Point {
        let at = self.grid.index_of(current);
        loop {
            let direction = Direction::ALL[self.direction_dist.sample(rng)];
            if let Some(next) = self.grid.neighbor(at, direction) {
                return self.grid[next];
            }
        }
    }

    pub fn can_continue(&self, candidate: Point, elapsed_time: f32) -> bool {
        can_continue(candidate, &self.params, elapsed_time)
    }

    /// Walks straight to the destination, alternating one column step and one
    /// row step. Ignores the time budget.
    pub fn rush_to_destination(&self, state: &mut RunState) {
        let dest = self.destination_index();
        let mut at = self.grid.index_of(state.current);

        while at != dest {
            if at.col != dest.col {
                at.col = step_toward(at.col, dest.col);
                state.advance(self.grid[at], self.network, Phase::Fallback);
            }
            if at.row != dest.row {
                at.row = step_toward(at.row, dest.row);
                state.advance(self.grid[at], self.network, Phase::Fallback);
            }
        }
    }

    /// Random walk while the lookahead admits the next move, then the fallback
    /// router to the destination.
    pub fn run_once<R: Rng + ?Sized>(&self, rng: &mut R) -> RunResult {
        let mut state = RunState::new(self.grid[self.start_index()], self.params.step_time);

        let mut candidate = self.propose_next_location(state.current, rng);
        while self.can_continue(candidate, state.elapsed_time) {
            state.advance(candidate, self.network, Phase::Random);
            candidate = self.propose_next_location(state.current, rng);
        }
        trace!(
            "Random phase stopped after {} steps at ({}, {}), t = {:.3}",
            state.random_steps,
            state.current.x,
            state.current.y,
            state.elapsed_time
        );

        self.rush_to_destination(&mut state);
        trace!(
            "Reached destination after {} fallback steps, exposure = {:.4}",
            state.fallback_steps,
            state.exposure
        );

        state.into()
    }
}
