//! TOML run configuration.
//!
//! ```toml
//! timestep_seconds = 86400.0
//! cells = 4
//! checkpoint = "smart-state.json"
//!
//! [parameters]
//! theta_c = 0.5
//! theta_h = 0.1
//! theta_d = 0.3
//! theta_s = 0.2
//! theta_z = 600.0
//! theta_sk = 172800.0
//! theta_fk = 432000.0
//! theta_gk = 2592000.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartError};
use crate::smart::params::Parameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Timestep length [s].
    pub timestep_seconds: f64,
    /// Number of grid cells sharing the parameter set.
    #[serde(default = "default_cells")]
    pub cells: usize,
    /// Where to restore state from and save it to, if anywhere.
    #[serde(default)]
    pub checkpoint: Option<PathBuf>,
    pub parameters: Parameters,
}

fn default_cells() -> usize {
    1
}

impl RunConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), cells = config.cells, "loaded run config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.timestep_seconds.is_finite() && self.timestep_seconds > 0.0) {
            return Err(SmartError::InvalidForcing(format!(
                "timestep_seconds must be positive, got {}",
                self.timestep_seconds
            )));
        }
        self.parameters.validate()
    }
}
