use crate::vecmath::Point;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// A circular-range sensor placed on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub position: Point,
    /// Effective sensing range.
    pub range: f32,
}

impl Sensor {
    pub fn new(x: f32, y: f32, range: f32) -> Self {
        Self { position: Point::new(x, y), range }
    }
}

/// How a single sensor contributes to exposure at a point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ExposureModel {
    /// 1 inside range, 0 outside.
    #[default]
    Binary,
    /// `1 / (1 + d)^exponent` inside range, 0 outside.
    Attenuated { exponent: f32 },
}

impl ExposureModel {
    #[inline(always)]
    pub fn contribution(&self, sensor: &Sensor, point: Point) -> f32 {
        let d = sensor.position.distance(point);
        if d > sensor.range {
            return 0.0;
        }
        match *self {
            ExposureModel::Binary => 1.0,
            ExposureModel::Attenuated { exponent } => 1.0 / (1.0 + d).powf(exponent),
        }
    }
}

/// Construction-time rejection of a network the path search cannot work with.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    NonPositiveField { width: f32, height: f32 },
    NonPositiveSpeed(f32),
    NonPositiveTimeLimit(f32),
    NonPositiveSpacing(f32),
    NegativeRange { index: usize, range: f32 },
    NonFinite(&'static str),
    OutsideField { what: &'static str, point: Point },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::NonPositiveField { width, height } => {
                write!(f, "field dimensions must be positive, got {}x{}", width, height)
            }
            NetworkError::NonPositiveSpeed(v) => write!(f, "max speed must be positive, got {}", v),
            NetworkError::NonPositiveTimeLimit(v) => {
                write!(f, "time limit must be positive, got {}", v)
            }
            NetworkError::NonPositiveSpacing(v) => {
                write!(f, "grid spacing must be positive, got {}", v)
            }
            NetworkError::NegativeRange { index, range } => {
                write!(f, "sensor {} has negative range {}", index, range)
            }
            NetworkError::NonFinite(what) => write!(f, "{} is not a finite number", what),
            NetworkError::OutsideField { what, point } => write!(
                f,
                "{} ({}, {}) lies outside the field",
                what, point.x, point.y
            ),
        }
    }
}

impl Error for NetworkError {}

/// Sensor field description consumed read-only by every path search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorNetwork {
    pub width: f32,
    pub height: f32,
    pub sensors: Vec<Sensor>,
    pub start: Point,
    pub destination: Point,
    pub max_speed: f32,
    pub limit_time: f32,
    /// Reference exposure; only reported, never used by the search.
    pub max_exposure: f32,
    #[serde(default)]
    pub exposure_model: ExposureModel,
}

impl SensorNetwork {
    /// Aggregate exposure of all sensors at `point`.
    pub fn exposure_at(&self, point: Point) -> f32 {
        self.sensors
            .iter()
            .map(|sensor| self.exposure_model.contribution(sensor, point))
            .sum()
    }

    pub fn with_exposure_model(mut self, model: ExposureModel) -> Self {
        self.exposure_model = model;
        self
    }

    fn in_field(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Rejects networks for which grid indices or travel times are undefined.
    pub fn validate(&self, delta_s: f32) -> Result<(), NetworkError> {
        let scalars = [
            ("field width", self.width),
            ("field height", self.height),
            ("max speed", self.max_speed),
            ("time limit", self.limit_time),
            ("grid spacing", delta_s),
        ];
        for (what, value) in scalars {
            if !value.is_finite() {
                return Err(NetworkError::NonFinite(what));
            }
        }
        if !self.start.is_finite() {
            return Err(NetworkError::NonFinite("start"));
        }
        if !self.destination.is_finite() {
            return Err(NetworkError::NonFinite("destination"));
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(NetworkError::NonPositiveField { width: self.width, height: self.height });
        }
        if self.max_speed <= 0.0 {
            return Err(NetworkError::NonPositiveSpeed(self.max_speed));
        }
        if self.limit_time <= 0.0 {
            return Err(NetworkError::NonPositiveTimeLimit(self.limit_time));
        }
        if delta_s <= 0.0 {
            return Err(NetworkError::NonPositiveSpacing(delta_s));
        }
        if let Some((index, sensor)) = self.sensors.iter().enumerate().find(|(_, s)| s.range < 0.0) {
            return Err(NetworkError::NegativeRange { index, range: sensor.range });
        }
        if !self.in_field(self.start) {
            return Err(NetworkError::OutsideField { what: "start", point: self.start });
        }
        if !self.in_field(self.destination) {
            return Err(NetworkError::OutsideField { what: "destination", point: self.destination });
        }
        Ok(())
    }
}
