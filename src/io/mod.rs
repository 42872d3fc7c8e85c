//! Audio input modules
//!
//! The waveform handed over by the decoding collaborator and the windowing
//! used to cut it into analysis segments.

pub mod sample_buffer;
pub mod waveform;

pub use sample_buffer::{plan_segments, Segment, SegmentWindows};
pub use waveform::Waveform;
