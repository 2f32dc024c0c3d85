use thiserror::Error;

/// Invalid tuning parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("bullet hole upscale factor must be positive, got {0}")]
    InvalidUpscaleFactor(f64),

    #[error("max frames without detection must be at least 1")]
    ZeroFrameBudget,

    #[error("row tolerance must be non-negative, got {0}")]
    NegativeRowTolerance(f64),

    #[error("grid layout for {0} has zero rows or columns")]
    EmptyGridLayout(String),

    #[error("row tolerance mismatch: tracker {tracker}, scoring {scoring}")]
    RowToleranceMismatch { tracker: f64, scoring: f64 },
}

/// Reasons a bullet hole could not be scored. None of these are fatal:
/// the frame simply goes unscored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("object is not a bullet hole")]
    NotABulletHole,

    #[error("no targets found")]
    NoTargets,

    #[error("{found} centers are not enough to infer target dimensions")]
    InsufficientCenters { found: usize },

    #[error("hit point lies outside the closest target's bounds")]
    HitOutsideTarget,
}
