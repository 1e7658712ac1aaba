use thiserror::Error;

pub type Result<T, E = HandPoseError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum HandPoseError {
    #[error("expected 21 hand landmarks, got {got}")]
    InvalidLandmarkCount { got: usize },
    #[error("gesture evaluation requires at least one detected hand")]
    NoHandDetected,
    #[error("pinch threshold must be a finite, non-negative pixel distance (got {0})")]
    InvalidThreshold(f32),
}
