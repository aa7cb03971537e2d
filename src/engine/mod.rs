//! Screening engine: frame sampling arithmetic and the evaluators

pub mod frames;
pub mod sampling;
pub mod text;

pub use frames::FrameEvaluator;
pub use text::TextEvaluator;
