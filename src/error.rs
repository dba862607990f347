use thiserror::Error;

/// Top-level error type for the polynet engine.
#[derive(Debug, Error)]
pub enum PolynetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Malformed geometric input, rejected before any mutation takes place.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("coordinate ({x}, {y}) is not finite")]
    NonFinite { x: f64, y: f64 },

    #[error("at least {required} distinct points required, found {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("index {index} is out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("coordinate sequence has odd length {0}")]
    OddCoordinateCount(usize),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised by engine operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while decoding the textual or binary encodings.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed literal: {0}")]
    Malformed(String),

    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("unknown geometry tag {0:?}")]
    UnknownTag(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PolynetError`].
pub type Result<T> = std::result::Result<T, PolynetError>;
