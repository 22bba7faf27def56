use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::{debug, error, info, LevelFilter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use exposure_common::SearchConfig;
use exposure_path::grid::Grid;
use exposure_path::heuristic::RandomHeuristic;
use exposure_path::{input, report, search};

/// Command-line arguments for the exposure path search
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network description files to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Optional path to a config.toml file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of trials per network (overrides the config file)
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Base random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid spacing (overrides the config file)
    #[arg(long)]
    delta_s: Option<f32>,

    /// Directory for reports (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Run trials on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    Builder::new()
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting exposure path search...");

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => {
            let config = SearchConfig::load(path)?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => SearchConfig::default(),
    };
    if let Some(iterations) = args.iterations {
        config.search.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        config.search.seed = Some(seed);
    }
    if let Some(delta_s) = args.delta_s {
        config.grid.delta_s = delta_s;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if args.sequential {
        config.search.parallel = false;
    }
    config.validate()?;
    debug!("Search configuration: {:#?}", config);

    if config.search.parallel {
        info!("Using {} Rayon threads.", rayon::current_num_threads());
    }

    let output_dir = PathBuf::from(&config.output.directory);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let start_time = Instant::now();
    let mut failures = 0;
    for (i, input_path) in args.inputs.iter().enumerate() {
        info!("[{}/{}] Processing {}", i + 1, args.inputs.len(), input_path.display());
        if let Err(e) = process_network(input_path, &output_dir, &config) {
            error!("Failed to process '{}': {:#}", input_path.display(), e);
            failures += 1;
        }
    }

    info!(
        "Processed {} network(s) in {:.3} seconds.",
        args.inputs.len(),
        start_time.elapsed().as_secs_f64()
    );
    if failures > 0 {
        anyhow::bail!("{} of {} network(s) failed.", failures, args.inputs.len());
    }
    info!("Search Complete.");
    Ok(())
}

fn process_network(input_path: &Path, output_dir: &Path, config: &SearchConfig) -> Result<()> {
    let network = input::load_network(input_path)?.with_exposure_model(config.exposure_model());
    info!(
        "Loaded {}x{} field with {} sensors, speed {}, time limit {}",
        network.width,
        network.height,
        network.sensors.len(),
        network.max_speed,
        network.limit_time
    );

    network.validate(config.grid.delta_s)?;
    let grid = Grid::build(network.width, network.height, config.grid.delta_s)?;
    let heuristic = RandomHeuristic::new(&network, &grid)?;
    debug!("Run parameters: {:#?}", heuristic.params());

    let search_start = Instant::now();
    let outcome = search(&heuristic, &config.search)?;
    info!(
        "Best exposure {:.4} (trial {} of {}, mean {:.4}), path of {} points, found in {:.3} s",
        outcome.best.exposure,
        outcome.best_trial,
        outcome.trials,
        outcome.mean_exposure(),
        outcome.best.path.len(),
        search_start.elapsed().as_secs_f64()
    );

    // --- Save Results ---
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_string());

    report::save_path_report(&output_dir.join(format!("{}_path.txt", stem)), &network, &outcome)?;

    if config.output.save_path_csv {
        report::save_path_csv(&output_dir.join(format!("{}_path.csv", stem)), &outcome)?;
    }

    if let Some(format) = config.output.summary_format.as_deref() {
        let summary = report::summarize(
            &input_path.display().to_string(),
            config.grid.delta_s,
            &network,
            &outcome,
        );
        let filename = format!("{}_summary.{}", stem, report::summary_extension(format));
        report::save_summary(&output_dir.join(filename), &summary, format)?;
    }

    Ok(())
}
