use thiserror::Error;

/// Caller-input failures raised by the transform engine and the entity wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RelativityError {
    /// A traveller velocity whose magnitude reaches or exceeds the speed of light.
    #[error("velocity {beta} is not below the speed of light (|beta| must be < 1)")]
    InvalidVelocity { beta: f64 },

    /// An observer frame moving at or beyond the speed of light.
    #[error("observer frame velocity {beta} is not below the speed of light (|beta| must be < 1)")]
    InvalidObserverFrame { beta: f64 },
}

/// Errors while reading or writing a diagram file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access diagram file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed diagram record: {0}")]
    Csv(#[from] csv::Error),

    #[error("diagram file has no version line")]
    MissingVersion,

    #[error("unsupported diagram file version {0}")]
    UnsupportedVersion(u32),

    #[error("traveller on row {row} has no velocity")]
    MissingBeta { row: usize },

    #[error("invalid object on row {row}: {source}")]
    Velocity {
        row: usize,
        #[source]
        source: RelativityError,
    },
}
