use crate::search::SearchOutcome;
use anyhow::{Context, Result};
use exposure_common::{RunSummary, SensorNetwork};
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Float text as in the legacy report: shortest round-trip digits, whole
/// numbers keep a trailing `.0`, and magnitudes outside [1e-3, 1e7) use
/// `d.dddE±n` notation.
fn fmt_float(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", value);
    }

    // `{:e}` gives e.g. "5e-4" or "1.2345678e7".
    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{}E{}", mantissa, exponent),
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => scientific,
    }
}

/// Writes the legacy text report: network description, achieved exposure,
/// path length, then one `x y` line per path point.
pub fn write_path_report<W: Write>(
    mut writer: W,
    network: &SensorNetwork,
    outcome: &SearchOutcome,
) -> Result<()> {
    writeln!(writer, "{} {}", fmt_float(network.width), fmt_float(network.height))?;
    writeln!(writer, "{}", network.sensors.len())?;
    for sensor in &network.sensors {
        writeln!(
            writer,
            "{} {} {}",
            fmt_float(sensor.position.x),
            fmt_float(sensor.position.y),
            fmt_float(sensor.range)
        )?;
    }
    writeln!(writer, "{}", fmt_float(network.max_speed))?;
    writeln!(writer, "{} {}", fmt_float(network.start.x), fmt_float(network.start.y))?;
    writeln!(
        writer,
        "{} {}",
        fmt_float(network.destination.x),
        fmt_float(network.destination.y)
    )?;
    writeln!(writer, "{}", fmt_float(network.limit_time))?;
    writeln!(writer, "{}", fmt_float(network.max_exposure))?;
    writeln!(writer, "{}", fmt_float(outcome.best.exposure))?;
    writeln!(writer, "{}", outcome.best.path.len())?;
    for point in &outcome.best.path {
        writeln!(writer, "{} {}", fmt_float(point.x), fmt_float(point.y))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_path_report(path: &Path, network: &SensorNetwork, outcome: &SearchOutcome) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating report file '{}'", path.display()))?;
    write_path_report(BufWriter::new(file), network, outcome)
        .with_context(|| format!("Error writing report file '{}'", path.display()))?;
    info!("Path report saved to {}", path.display());
    Ok(())
}

/// Writes the best path as `step,x,y` CSV rows.
pub fn write_path_csv<W: Write>(writer: W, outcome: &SearchOutcome) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["step", "x", "y"])?;
    for (step, point) in outcome.best.path.iter().enumerate() {
        writer.write_record(&[step.to_string(), format!("{:.4}", point.x), format!("{:.4}", point.y)])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_path_csv(path: &Path, outcome: &SearchOutcome) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    write_path_csv(file, outcome)
        .with_context(|| format!("Error writing CSV file '{}'", path.display()))?;
    info!("Path CSV saved to {}", path.display());
    Ok(())
}

/// Collects the serializable record of a finished search.
pub fn summarize(source: &str, delta_s: f32, network: &SensorNetwork, outcome: &SearchOutcome) -> RunSummary {
    if outcome.best.exposure > network.max_exposure {
        warn!(
            "{}: achieved exposure {:.4} exceeds the reference maximum {:.4}",
            source, outcome.best.exposure, network.max_exposure
        );
    }
    RunSummary {
        source: source.to_string(),
        seed: outcome.seed,
        delta_s,
        trials: outcome.trials,
        best_trial: outcome.best_trial,
        exposure: outcome.best.exposure,
        elapsed_time: outcome.best.elapsed_time,
        max_exposure: network.max_exposure,
        random_steps: outcome.best.random_steps,
        fallback_steps: outcome.best.fallback_steps,
        mean_exposure: outcome.mean_exposure(),
        min_exposure: outcome.min_exposure,
        path: outcome.best.path.clone(),
    }
}

/// File extension used for a summary format.
pub fn summary_extension(format: &str) -> &'static str {
    match format {
        "bincode" => "bin",
        "messagepack" => "msgpack",
        _ => "json",
    }
}

/// Serializes `summary` as "json", "bincode" or "messagepack"; anything else falls back to JSON.
pub fn write_summary<W: Write>(mut writer: W, summary: &RunSummary, format: &str) -> Result<()> {
    match format {
        "json" => serde_json::to_writer(&mut writer, summary)?,
        "bincode" => bincode::serialize_into(&mut writer, summary)?,
        "messagepack" => rmp_serde::encode::write(&mut writer, summary)?,
        _ => {
            error!("Unknown summary format: {}. Using JSON instead.", format);
            serde_json::to_writer(&mut writer, summary)?
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_summary(path: &Path, summary: &RunSummary, format: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating summary file '{}'", path.display()))?;
    write_summary(BufWriter::new(file), summary, format)
        .with_context(|| format!("Error serializing summary to '{}'", path.display()))?;
    info!("Run summary saved to {} ({} format)", path.display(), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::RunResult;
    use exposure_common::{ExposureModel, Point, Sensor};

    fn network() -> SensorNetwork {
        SensorNetwork {
            width: 10.0,
            height: 10.0,
            sensors: vec![Sensor::new(5.0, 5.0, 2.0)],
            start: Point::new(0.0, 0.0),
            destination: Point::new(1.0, 1.0),
            max_speed: 5.0,
            limit_time: 3.6,
            max_exposure: 42.5,
            exposure_model: ExposureModel::Binary,
        }
    }

    fn outcome() -> SearchOutcome {
        SearchOutcome {
            best: RunResult {
                path: vec![Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(0.5, 0.5)],
                exposure: 0.25,
                elapsed_time: 0.2,
                random_steps: 1,
                fallback_steps: 1,
            },
            best_trial: 3,
            seed: 9,
            trials: 4,
            exposure_sum: 0.5,
            min_exposure: 0.0,
        }
    }

    #[test]
    fn text_report_follows_legacy_layout() {
        let mut out = Vec::new();
        write_path_report(&mut out, &network(), &outcome()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "10.0 10.0\n1\n5.0 5.0 2.0\n5.0\n0.0 0.0\n1.0 1.0\n3.6\n42.5\n0.25\n3\n0.0 0.0\n0.5 0.0\n0.5 0.5\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn text_report_uses_scientific_notation_outside_plain_range() {
        let mut net = network();
        net.width = 1.0e7;
        net.max_exposure = 12345678.0;
        let mut out = outcome();
        out.best.exposure = 0.0005;

        let mut buf = Vec::new();
        write_path_report(&mut buf, &net, &out).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1.0E7 10.0");
        assert_eq!(lines[7], "1.2345678E7");
        assert_eq!(lines[8], "5.0E-4");
    }

    #[test]
    fn float_text_matches_legacy_notation() {
        assert_eq!(fmt_float(0.0), "0.0");
        assert_eq!(fmt_float(0.001), "0.001");
        assert_eq!(fmt_float(9999999.0), "9999999.0");
        assert_eq!(fmt_float(0.0005), "5.0E-4");
        assert_eq!(fmt_float(-0.00025), "-2.5E-4");
        assert_eq!(fmt_float(1.0e7), "1.0E7");
        assert_eq!(fmt_float(f32::INFINITY), "Infinity");
        assert_eq!(fmt_float(f32::NAN), "NaN");
    }

    #[test]
    fn csv_lists_every_step() {
        let mut out = Vec::new();
        write_path_csv(&mut out, &outcome()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["step,x,y", "0,0.0000,0.0000", "1,0.5000,0.0000", "2,0.5000,0.5000"]);
    }

    #[test]
    fn summary_carries_search_statistics() {
        let summary = summarize("net.txt", 0.5, &network(), &outcome());
        assert_eq!(summary.best_trial, 3);
        assert_eq!(summary.trials, 4);
        assert_eq!(summary.mean_exposure, 0.125);
        assert_eq!(summary.path.len(), 3);

        let mut out = Vec::new();
        write_summary(&mut out, &summary, "json").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["source"], "net.txt");
        assert_eq!(value["seed"], 9);
        assert_eq!(value["path"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn binary_summaries_decode() {
        let summary = summarize("net.txt", 0.5, &network(), &outcome());

        let mut bin = Vec::new();
        write_summary(&mut bin, &summary, "bincode").unwrap();
        let decoded: RunSummary = bincode::deserialize(&bin).unwrap();
        assert_eq!(decoded.path, summary.path);

        let mut msgpack = Vec::new();
        write_summary(&mut msgpack, &summary, "messagepack").unwrap();
        let decoded: RunSummary = rmp_serde::from_slice(&msgpack).unwrap();
        assert_eq!(decoded.best_trial, 3);
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let summary = summarize("net.txt", 0.5, &network(), &outcome());
        let mut out = Vec::new();
        write_summary(&mut out, &summary, "yaml").unwrap();
        assert!(serde_json::from_slice::<serde_json::Value>(&out).is_ok());
        assert_eq!(summary_extension("yaml"), "json");
        assert_eq!(summary_extension("bincode"), "bin");
    }
}
