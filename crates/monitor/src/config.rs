//! Monitor configuration
//!
//! Loaded from an optional TOML file, then overridden by `STRESS_MONITOR__*`
//! environment variables (`__` separates nested keys, e.g.
//! `STRESS_MONITOR__EYE_TRACKER__EAR_THRESHOLD=0.22`).

use std::net::SocketAddr;

use expression::ExpressionConfig;
use eye_tracker::EyeTrackerConfig;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "STRESS_MONITOR";

/// Default config file name, looked up without extension
pub const DEFAULT_CONFIG_FILE: &str = "stress-monitor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub log_level: String,

    /// Landmark stream path, `-` for stdin
    pub input: String,

    pub eye_tracker: EyeTrackerConfig,

    /// Expression scoring; its topology also locates the eyes
    pub expression: ExpressionConfig,

    /// Face frames used for calibration. The first calibrates the expression
    /// baseline, the last sets the EAR threshold. 0 disables calibration.
    pub calibration_frames: usize,

    /// Prometheus exporter listen address, disabled when unset
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            input: "-".to_string(),
            eye_tracker: EyeTrackerConfig::default(),
            expression: ExpressionConfig::default(),
            calibration_frames: 30,
            metrics_addr: None,
        }
    }
}

impl MonitorConfig {
    /// Load from `path` (optional file) and the environment
    pub fn load(path: Option<&str>) -> Result<Self, MonitorError> {
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(path.is_some()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: MonitorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        self.eye_tracker.validate()?;
        self.expression.validate()?;
        Ok(())
    }

    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }
}
