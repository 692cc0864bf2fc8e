//! Spatial-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

use rd_core::{NodeId, Point, Rect};

/// Errors produced by `rd-spatial`.
///
/// An unreachable destination is not an error: routing returns
/// [`Route::unreachable`](crate::Route::unreachable) instead.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("map load error at line {line}: {reason}")]
    MapLoad { line: u64, reason: String },

    #[error("cannot open map source {}: {source}", path.display())]
    MapSource {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    #[error("road {a} - {b} has invalid weight {weight}")]
    InvalidWeight { a: NodeId, b: NodeId, weight: f64 },

    #[error("point {point} lies outside the index boundary {boundary}")]
    OutOfBounds { point: Point, boundary: Rect },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
