use thiserror::Error;

/// Inconsistent gear/pin dimensions rejected at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("gear seat width max ({max}) must exceed seat width min ({min})")]
    SeatWidth { max: f64, min: f64 },
    #[error("pin width max ({max}) must exceed pin width min ({min})")]
    PinWidth { max: f64, min: f64 },
    #[error("gear pitch radius ({pitch}) must exceed base radius ({base})")]
    ToothRadius { pitch: f64, base: f64 },
    #[error("gear must have at least one tooth")]
    NoTeeth,
    #[error("geometry parameter `{0}` is not finite")]
    NonFinite(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("contact cache capacity must be non-zero")]
    ZeroCapacity,
    #[error("contact cache capacity {capacity} must exceed the shoe count {shoes}")]
    CacheCapacity { capacity: usize, shoes: usize },
    #[error("contact tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}
