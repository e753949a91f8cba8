use thiserror::Error;

use crate::kernels::Backend;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Precondition violation: count {count} is not a positive multiple of lane width {lane_width}")]
    PreconditionViolation { count: usize, lane_width: usize },

    #[error("Length mismatch: input has {input} elements, output has {output}")]
    LengthMismatch { input: usize, output: usize },

    #[error("Invalid lane width: {0} (expected a power of two in 1..=64)")]
    InvalidLaneWidth(usize),

    #[error("Backend unavailable on this host: {0:?}")]
    BackendUnavailable(Backend),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
