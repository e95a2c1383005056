//! Error types for floor plan construction and layout runs.

use thiserror::Error;

use crate::config::ConfigError;

/// Unified result type for the layout engine.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced while building a floor plan or starting a run.
///
/// Infeasible geometry and timeouts are *not* errors: they come back as a
/// [`LayoutOutcome`](crate::report::LayoutOutcome) with `success == false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("floor shape needs at least one region")]
    EmptyFloor,
    #[error("region #{index} has non-positive dimensions {width}x{height}")]
    InvalidRegion {
        index: usize,
        width: i32,
        height: i32,
    },
    #[error("room `{name}` has non-positive dimensions {width}x{height}")]
    InvalidRoomSize {
        name: String,
        width: i32,
        height: i32,
    },
    #[error("room `{0}` already exists")]
    DuplicateRoom(String),
    #[error("room `{0}` is not registered; constraint dropped")]
    UnknownRoom(String),
    #[error("invalid layout configuration: {0:?}")]
    InvalidConfig(Vec<ConfigError>),
}
