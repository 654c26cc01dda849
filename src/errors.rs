use thiserror::Error;

/// Problems with a scan configuration. These are only ever raised when a beam set or scan state
/// is being constructed, never while casting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanConfigError {
    #[error("scan config field `{0}` must be finite")]
    NonFinite(&'static str),

    #[error("angle_min ({min}) must be less than angle_max ({max})")]
    AngleOrder { min: f64, max: f64 },

    #[error("angle_increment ({0}) must be positive")]
    NonPositiveIncrement(f64),

    #[error("angle_increment ({increment}) must not exceed the angular span ({span})")]
    IncrementExceedsSpan { increment: f64, span: f64 },

    #[error("a sweep of {steps} increments exceeds the limit of {limit} beams")]
    TooManyBeams { steps: f64, limit: usize },

    #[error("range_min ({0}) must not be negative")]
    NegativeRangeMin(f64),

    #[error("range_max ({max}) must be greater than range_min ({min})")]
    RangeOrder { min: f64, max: f64 },
}

/// Obstacle geometry which cannot be turned into an edge list at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGeometry {
    #[error("obstacle needs at least {required} vertices, got {found}")]
    NotEnoughVertices { required: usize, found: usize },
}

/// Failures of a scan update. When one of these is returned the previous scan is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("sensor pose ({x}, {y}, {theta}) is not finite")]
    InvalidPose { x: f64, y: f64, theta: f64 },

    #[error("no map has been loaded into the scanner")]
    MapNotLoaded,

    #[error("scanner has not been initialized with a starting pose")]
    ScannerNotLoaded,
}
