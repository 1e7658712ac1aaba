//! Finger state and pinch gesture classification for 21-point hand
//! landmarks reported in frame pixel coordinates.

pub mod config;
pub mod distance;
pub mod error;
pub mod gesture;
pub mod pipeline;
pub mod replay;
pub mod types;

pub use config::{GestureConfig, RenderStyle};
pub use distance::{DistanceSample, distance};
pub use error::HandPoseError;
pub use gesture::{CrossHandDistances, GestureEngine, GestureEvaluation, classify, classify_points};
pub use types::{FingerStateVector, GestureEvent, HandBounds, Handedness, LandmarkSet, Point2D};
