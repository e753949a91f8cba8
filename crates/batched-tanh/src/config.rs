//! Kernel configuration: lane width and backend choice.
//!
//! Loadable from YAML alongside the rest of a model's settings:
//!
//! ```yaml
//! lane_width: 8
//! backend: auto
//! ```

use serde::{Deserialize, Serialize};

use crate::error::KernelError;
use crate::kernels::Backend;

/// Lane width used when none is configured.
pub const DEFAULT_LANE_WIDTH: usize = 8;

/// Widest lane-group accepted.
pub const MAX_LANE_WIDTH: usize = 64;

/// Which backend a kernel should run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Fastest backend the host supports.
    #[default]
    Auto,
    /// Always the portable per-lane backend.
    Scalar,
    /// AVX2+FMA; construction fails on hosts without it.
    Avx2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    /// Granularity `count` must be a multiple of.
    pub lane_width: usize,
    pub backend: BackendChoice,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            lane_width: DEFAULT_LANE_WIDTH,
            backend: BackendChoice::Auto,
        }
    }
}

impl KernelConfig {
    /// Parse a YAML document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Yaml` on malformed YAML or unknown fields, and
    /// `KernelError::InvalidLaneWidth` if the lane width is rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self, KernelError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_lane_width(mut self, lane_width: usize) -> Self {
        self.lane_width = lane_width;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    /// Lane width must be a power of two in `1..=MAX_LANE_WIDTH`.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidLaneWidth` otherwise.
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.lane_width == 0
            || self.lane_width > MAX_LANE_WIDTH
            || !self.lane_width.is_power_of_two()
        {
            return Err(KernelError::InvalidLaneWidth(self.lane_width));
        }
        Ok(())
    }

    /// Resolve the backend choice against the running host.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::BackendUnavailable` if a forced backend is missing.
    pub fn resolve_backend(&self) -> Result<Backend, KernelError> {
        match self.backend {
            BackendChoice::Auto => Ok(Backend::detect()),
            BackendChoice::Scalar => Ok(Backend::Scalar),
            BackendChoice::Avx2 => {
                if Backend::Avx2.is_available() {
                    Ok(Backend::Avx2)
                } else {
                    log::warn!("AVX2+FMA requested but not supported by this host");
                    Err(KernelError::BackendUnavailable(Backend::Avx2))
                }
            }
        }
    }
}
