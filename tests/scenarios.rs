use exposure_common::{ExposureModel, Point, SearchSettings, Sensor, SensorNetwork};
use exposure_path::grid::Grid;
use exposure_path::heuristic::{can_continue, RandomHeuristic};
use exposure_path::input::parse_network;
use exposure_path::run_state::elapsed_after;
use exposure_path::search;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPSILON: f32 = 1e-2;

fn assert_float_eq(a: f32, b: f32, msg: &str) {
    assert!((a - b).abs() < EPSILON, "{msg}: expected {b}, got {a}");
}

fn single_sensor_field(limit_time: f32) -> SensorNetwork {
    SensorNetwork {
        width: 10.0,
        height: 10.0,
        sensors: vec![Sensor::new(5.0, 5.0, 2.0)],
        start: Point::new(0.0, 0.0),
        destination: Point::new(9.0, 9.0),
        max_speed: 5.0,
        limit_time,
        max_exposure: 100.0,
        exposure_model: ExposureModel::Binary,
    }
}

fn is_unit_step(a: Point, b: Point, delta_s: f32) -> bool {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    (dx == delta_s && dy == 0.0) || (dx == 0.0 && dy == delta_s)
}

#[test]
fn test_single_sensor_run_terminates_at_destination() {
    let net = single_sensor_field(100.0);
    let grid = Grid::build(net.width, net.height, 1.0).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();

    for seed in 0..50 {
        let result = heuristic.run_once(&mut StdRng::seed_from_u64(seed));
        assert_eq!(result.path[0], Point::new(0.0, 0.0));
        assert_eq!(*result.path.last().unwrap(), Point::new(9.0, 9.0));
        assert!(result.exposure >= 0.0);
        assert!(result.path.windows(2).all(|w| is_unit_step(w[0], w[1], 1.0)));
    }
}

#[test]
fn test_accounting_is_monotonic_and_matches_step_count() {
    let net = single_sensor_field(40.0).with_exposure_model(ExposureModel::Attenuated { exponent: 2.0 });
    let grid = Grid::build(net.width, net.height, 0.5).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();
    let step_time = heuristic.params().step_time;

    let result = heuristic.run_once(&mut StdRng::seed_from_u64(2024));
    let steps = result.path.len() - 1;
    assert_float_eq(result.elapsed_time, steps as f32 * step_time, "elapsed time");

    // Exposure rebuilt from the departing location of every step.
    let mut exposure = 0.0f32;
    for pair in result.path.windows(2) {
        let before = exposure;
        exposure += net.exposure_at(pair[0]) * step_time;
        assert!(exposure >= before);
    }
    assert_float_eq(result.exposure, exposure, "exposure");
}

#[test]
fn test_random_steps_were_admitted_when_taken() {
    let net = single_sensor_field(20.0);
    let grid = Grid::build(net.width, net.height, 0.5).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();
    let step_time = heuristic.params().step_time;

    for seed in 100..120 {
        let result = heuristic.run_once(&mut StdRng::seed_from_u64(seed));
        for (taken, next) in result.path[1..=result.random_steps].iter().enumerate() {
            assert!(can_continue(*next, heuristic.params(), elapsed_after(taken, step_time)));
        }
    }
}

#[test]
fn test_exact_budget_routes_by_fallback_only() {
    let net = single_sensor_field(18.0 / 5.0);
    let grid = Grid::build(net.width, net.height, 1.0).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();

    for seed in 0..10 {
        let result = heuristic.run_once(&mut StdRng::seed_from_u64(seed));
        assert_eq!(result.random_steps, 0);
        assert_eq!(result.fallback_steps, 18);
        assert_eq!(result.path.len(), 1 + 18);
        assert_eq!(*result.path.last().unwrap(), Point::new(9.0, 9.0));
    }
}

#[test]
fn test_tight_budget_still_finishes_the_journey() {
    // Not even the direct route fits; the fallback runs regardless.
    let net = single_sensor_field(1.0);
    let grid = Grid::build(net.width, net.height, 1.0).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();

    let result = heuristic.run_once(&mut StdRng::seed_from_u64(8));
    assert_eq!(result.random_steps, 0);
    assert_eq!(*result.path.last().unwrap(), Point::new(9.0, 9.0));
    assert!(result.elapsed_time > net.limit_time);
}

#[test]
fn test_search_over_parsed_network() {
    let text = "10 10\n3\n5 5 2\n2 7 1.5\n8 2 1\n5\n0 0\n9 9\n20\n10\n";
    let net = parse_network(text).unwrap();
    let grid = Grid::build(net.width, net.height, 0.5).unwrap();
    let heuristic = RandomHeuristic::new(&net, &grid).unwrap();

    let settings = SearchSettings { iterations: 200, seed: Some(77), parallel: true };
    let outcome = search(&heuristic, &settings).unwrap();
    assert_eq!(outcome.trials, 200);
    assert_eq!(outcome.best.path[0], Point::new(0.0, 0.0));
    assert_eq!(*outcome.best.path.last().unwrap(), Point::new(9.0, 9.0));
    assert!(outcome.best.exposure >= outcome.mean_exposure() - 1e-4);

    let again = search(&heuristic, &settings).unwrap();
    assert_eq!(again.best.path, outcome.best.path);
}

#[test]
fn test_degenerate_network_is_rejected_before_running() {
    let mut net = single_sensor_field(100.0);
    net.max_speed = 0.0;
    let grid = Grid::build(net.width, net.height, 1.0).unwrap();
    assert!(RandomHeuristic::new(&net, &grid).is_err());

    let mut net = single_sensor_field(100.0);
    net.start = Point::new(12.0, 0.0);
    assert!(RandomHeuristic::new(&net, &grid).is_err());
}
