use thiserror::Error;

/// Reasons a foreign pose could not be turned into a transform.
///
/// None of these escape the sync API: callers log them and treat the pose
/// as absent for the current frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseError {
    #[error("pose matrix must have 16 elements, got {0}")]
    BadLength(usize),

    #[error("pose matrix element {index} is not finite")]
    NonFinite { index: usize },

    #[error("input provider call failed: {0}")]
    ProviderCall(String),

    #[error("input provider returned an unsupported value: {0}")]
    UnsupportedValue(String),
}
