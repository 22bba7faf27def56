use anyhow::{Context, Result};
use exposure_common::{ExposureModel, Point, Sensor, SensorNetwork};
use log::warn;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// Whitespace tokenizer that names the field it failed on.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next<T: FromStr>(&mut self, field: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let token = self
            .inner
            .next()
            .ok_or_else(|| anyhow::anyhow!("Unexpected end of input while reading {}", field))?;
        token
            .parse()
            .with_context(|| format!("Invalid {} '{}'", field, token))
    }

    fn point(&mut self, field: &str) -> Result<Point> {
        let x = self.next(&format!("{} x", field))?;
        let y = self.next(&format!("{} y", field))?;
        Ok(Point::new(x, y))
    }
}

/// Parses a network description:
/// `width height`, `count`, `count` x `x y r`, `speed`, `start`, `destination`,
/// `limit_time`, `max_exposure`.
pub fn parse_network(text: &str) -> Result<SensorNetwork> {
    let mut tokens = Tokens { inner: text.split_whitespace() };

    let width = tokens.next("field width")?;
    let height = tokens.next("field height")?;
    let count: usize = tokens.next("sensor count")?;
    let sensors = (0..count)
        .map(|i| -> Result<Sensor> {
            let position = tokens.point(&format!("sensor {}", i))?;
            let range = tokens.next(&format!("sensor {} range", i))?;
            Ok(Sensor { position, range })
        })
        .collect::<Result<Vec<_>>>()?;
    let max_speed = tokens.next("max speed")?;
    let start = tokens.point("start")?;
    let destination = tokens.point("destination")?;
    let limit_time = tokens.next("time limit")?;
    let max_exposure = tokens.next("max exposure")?;

    let trailing = tokens.inner.count();
    if trailing > 0 {
        warn!("Ignoring {} trailing tokens after the network description.", trailing);
    }

    Ok(SensorNetwork {
        width,
        height,
        sensors,
        start,
        destination,
        max_speed,
        limit_time,
        max_exposure,
        exposure_model: ExposureModel::default(),
    })
}

/// Reads and parses a network description file.
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<SensorNetwork> {
    let path_ref = path.as_ref();
    let text = std::fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read network file '{}'", path_ref.display()))?;
    parse_network(&text).with_context(|| format!("Failed to parse network file '{}'", path_ref.display()))
}
