pub mod grid;
pub mod heuristic;
pub mod input;
pub mod report;
pub mod run_state;
pub mod search;

pub use grid::{Direction, Grid, GridError, GridIndex};
pub use heuristic::{can_continue, RandomHeuristic, RunResult};
pub use run_state::{Phase, RunState};
pub use search::{search, trial_seed, SearchOutcome};
