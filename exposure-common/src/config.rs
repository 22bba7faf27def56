use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::network::ExposureModel;
use std::path::Path;

// Lattice settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridConfig {
    #[serde(default = "default_delta_s")]
    pub delta_s: f32,
}

// Trial settings for the best-of-N search
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SearchSettings {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Base seed; trial `i` uses `seed + i`. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureKind {
    Binary,
    Attenuated,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ExposureConfig {
    #[serde(default = "default_exposure_kind")]
    pub model: ExposureKind,
    /// Decay exponent, only read by the attenuated model.
    #[serde(default = "default_exponent")]
    pub exponent: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default)]
    pub save_path_csv: bool,
    /// Run summary format: "json", "bincode", "messagepack". No summary when absent.
    #[serde(default)]
    pub summary_format: Option<String>,
}

// Main configuration structure, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub exposure: ExposureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { delta_s: default_delta_s() }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            iterations: default_iterations(),
            seed: None,
            parallel: default_parallel(),
        }
    }
}

impl Default for ExposureConfig {
    fn default() -> Self {
        ExposureConfig { model: default_exposure_kind(), exponent: default_exponent() }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_output_directory(),
            save_path_csv: false,
            summary_format: None,
        }
    }
}

impl SearchConfig {
    /// Loads the search configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.grid.delta_s.is_finite() || self.grid.delta_s <= 0.0 {
            anyhow::bail!("grid.delta_s must be a positive number.");
        }
        if self.search.iterations == 0 {
            anyhow::bail!("search.iterations must be greater than 0.");
        }
        if self.exposure.model == ExposureKind::Attenuated && !self.exposure.exponent.is_finite() {
            anyhow::bail!("exposure.exponent must be finite.");
        }
        if let Some(format) = &self.output.summary_format {
            if !matches!(format.as_str(), "json" | "bincode" | "messagepack") {
                log::warn!("Unknown summary format '{}', JSON will be used.", format);
            }
        }
        Ok(())
    }

    /// Converts the exposure section into the model the network evaluates.
    pub fn exposure_model(&self) -> ExposureModel {
        match self.exposure.model {
            ExposureKind::Binary => ExposureModel::Binary,
            ExposureKind::Attenuated => ExposureModel::Attenuated { exponent: self.exposure.exponent },
        }
    }
}

fn default_delta_s() -> f32 {
    0.5
}

fn default_iterations() -> usize {
    1000
}

fn default_parallel() -> bool {
    true
}

fn default_exposure_kind() -> ExposureKind {
    ExposureKind::Binary
}

fn default_exponent() -> f32 {
    2.0
}

fn default_output_directory() -> String {
    "output".to_string()
}
