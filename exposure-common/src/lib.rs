pub mod config;
pub mod network;
pub mod sim_params;
pub mod summary;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{SearchConfig, GridConfig, SearchSettings, ExposureConfig, ExposureKind, OutputConfig};
pub use network::{ExposureModel, NetworkError, Sensor, SensorNetwork};
pub use sim_params::RunParams;
pub use summary::RunSummary;
pub use vecmath::{Point, snap_to_lattice};
