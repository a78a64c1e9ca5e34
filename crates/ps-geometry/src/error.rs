//! Geometry error type.

use thiserror::Error;

/// Errors produced by `ps-geometry`.
///
/// `polygon` is the position of the offending polygon in the order it was
/// added to the [`GeometryBuilder`][crate::GeometryBuilder].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("geometry has no accessible areas")]
    Empty,

    #[error("polygon {polygon} has {points} distinct points, at least 3 required")]
    TooFewPoints { polygon: usize, points: usize },

    #[error("polygon {polygon} contains a non-finite coordinate")]
    NonFinite { polygon: usize },

    #[error("polygon {polygon} intersects itself")]
    SelfIntersection { polygon: usize },

    #[error("polygon {polygon} encloses zero area")]
    ZeroArea { polygon: usize },

    #[error("could only place {placed} of {requested} agents")]
    DistributionFailed { requested: usize, placed: usize },

    #[error("invalid distribution parameter: {0}")]
    InvalidDistribution(String),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
