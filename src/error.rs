// src/error.rs

use thiserror::Error;

/// Everything that can go wrong while measuring.
///
/// None of these are fatal to the host: a rejected gesture leaves the
/// measurement state exactly as it was.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// NaN, infinite or out-of-range latitude handed in by the host.
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// A path operation that is not legal in the path's current state.
    #[error("cannot {action}: {reason}")]
    IllegalTransition {
        action: &'static str,
        reason: &'static str,
    },

    #[error("path {0} does not exist")]
    UnknownPath(usize),

    #[error("vertex {vertex} does not exist in path {path}")]
    UnknownVertex { path: usize, vertex: usize },

    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl MeasureError {
    pub(crate) fn illegal(action: &'static str, reason: &'static str) -> Self {
        MeasureError::IllegalTransition { action, reason }
    }

    /// True for errors caused by a gesture the controller should simply ignore.
    pub fn is_rejected_gesture(&self) -> bool {
        matches!(
            self,
            MeasureError::IllegalTransition { .. }
                | MeasureError::UnknownPath(_)
                | MeasureError::UnknownVertex { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MeasureError>;
