use crate::heuristic::{RandomHeuristic, RunResult};
use anyhow::Result;
use exposure_common::SearchSettings;
use log::{debug, info, trace};
use rand::prelude::*;
use rayon::prelude::*;

/// Best run of a search plus statistics over every trial.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: RunResult,
    pub best_trial: usize,
    pub seed: u64,
    pub trials: usize,
    pub exposure_sum: f64,
    pub min_exposure: f32,
}

impl SearchOutcome {
    fn single(trial: usize, seed: u64, result: RunResult) -> Self {
        Self {
            min_exposure: result.exposure,
            exposure_sum: result.exposure as f64,
            best: result,
            best_trial: trial,
            seed,
            trials: 1,
        }
    }

    pub fn mean_exposure(&self) -> f32 {
        (self.exposure_sum / self.trials as f64) as f32
    }

    /// Folds two partial outcomes. Higher exposure wins, ties go to the earlier trial.
    fn merge(self, other: Self) -> Self {
        let other_wins = other.best.exposure > self.best.exposure
            || (other.best.exposure == self.best.exposure && other.best_trial < self.best_trial);
        let trials = self.trials + other.trials;
        let exposure_sum = self.exposure_sum + other.exposure_sum;
        let min_exposure = self.min_exposure.min(other.min_exposure);
        let (best, best_trial) = if other_wins {
            (other.best, other.best_trial)
        } else {
            (self.best, self.best_trial)
        };
        Self { best, best_trial, seed: self.seed, trials, exposure_sum, min_exposure }
    }
}

/// Seed for trial `trial` of a search started from `seed`.
#[inline(always)]
pub fn trial_seed(seed: u64, trial: usize) -> u64 {
    seed.wrapping_add(trial as u64)
}

fn run_trial(heuristic: &RandomHeuristic<'_>, seed: u64, trial: usize) -> SearchOutcome {
    let mut rng = StdRng::seed_from_u64(trial_seed(seed, trial));
    let result = heuristic.run_once(&mut rng);
    trace!(
        "Trial {}: exposure = {:.4}, {} random + {} fallback steps",
        trial,
        result.exposure,
        result.random_steps,
        result.fallback_steps
    );
    SearchOutcome::single(trial, seed, result)
}

/// Repeats the heuristic `settings.iterations` times and keeps the highest-exposure path.
///
/// Every trial owns its rng, so the outcome for a given seed is the same
/// whether trials run in parallel or in sequence.
pub fn search(heuristic: &RandomHeuristic<'_>, settings: &SearchSettings) -> Result<SearchOutcome> {
    if settings.iterations == 0 {
        anyhow::bail!("search.iterations must be greater than 0.");
    }

    let seed = match settings.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::rng().random::<u64>();
            info!("No seed configured, using {} (set search.seed to replay).", seed);
            seed
        }
    };
    debug!(
        "Running {} trials from seed {} ({})",
        settings.iterations,
        seed,
        if settings.parallel { "parallel" } else { "sequential" }
    );

    let outcome = if settings.parallel {
        (0..settings.iterations)
            .into_par_iter()
            .map(|trial| run_trial(heuristic, seed, trial))
            .reduce_with(SearchOutcome::merge)
    } else {
        (0..settings.iterations)
            .map(|trial| run_trial(heuristic, seed, trial))
            .reduce(SearchOutcome::merge)
    };

    // iterations > 0 was checked above.
    outcome.ok_or_else(|| anyhow::anyhow!("Search produced no trials."))
}
