pub mod evaluator;
pub mod frame;

// Re-exports for convenience
pub use evaluator::start_evaluator;
pub use frame::{DetectedFrame, FrameProcessor, FrameReport, HandReport, MAX_HANDS};
