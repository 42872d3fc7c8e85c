//! Sample windowing: overlapping analysis segments over a waveform

use serde::{Deserialize, Serialize};

/// A time-bounded slice of a waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the segment sequence (0-based)
    pub index: usize,

    /// First sample (inclusive)
    pub start_sample: usize,

    /// Last sample (exclusive)
    pub end_sample: usize,

    /// Start time in seconds
    pub start_time: f32,

    /// Actual duration in seconds (shorter than the window at the tail)
    pub window_duration: f32,
}

impl Segment {
    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.end_sample - self.start_sample
    }

    /// True when the segment covers no samples
    pub fn is_empty(&self) -> bool {
        self.end_sample == self.start_sample
    }
}

/// Iterator over overlapping windows
///
/// Windows start every `hop` samples. The tail window is truncated at the end
/// of the signal and iteration stops at the first window shorter than
/// `min_len`.
#[derive(Debug, Clone)]
pub struct SegmentWindows {
    total_len: usize,
    window: usize,
    hop: usize,
    min_len: usize,
    sample_rate: u32,
    position: usize,
    index: usize,
}

impl SegmentWindows {
    /// Create a window iterator (all sizes in samples)
    pub fn new(total_len: usize, sample_rate: u32, window: usize, hop: usize, min_len: usize) -> Self {
        Self {
            total_len,
            window: window.max(1),
            hop: hop.max(1),
            min_len: min_len.min(window.max(1)),
            sample_rate: sample_rate.max(1),
            position: 0,
            index: 0,
        }
    }
}

impl Iterator for SegmentWindows {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.position >= self.total_len {
            return None;
        }

        let start = self.position;
        let end = (start + self.window).min(self.total_len);
        if end - start < self.min_len {
            self.position = self.total_len;
            return None;
        }

        let segment = Segment {
            index: self.index,
            start_sample: start,
            end_sample: end,
            start_time: start as f32 / self.sample_rate as f32,
            window_duration: (end - start) as f32 / self.sample_rate as f32,
        };

        self.position += self.hop;
        self.index += 1;
        Some(segment)
    }
}

/// Plan every analysis segment for a signal
///
/// A non-empty signal shorter than `min_len` still gets one segment covering
/// all of it, so callers always have at least one window to score.
pub fn plan_segments(
    total_len: usize,
    sample_rate: u32,
    window: usize,
    hop: usize,
    min_len: usize,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> =
        SegmentWindows::new(total_len, sample_rate, window, hop, min_len).collect();

    if segments.is_empty() && total_len > 0 {
        let rate = sample_rate.max(1) as f32;
        segments.push(Segment {
            index: 0,
            start_sample: 0,
            end_sample: total_len,
            start_time: 0.0,
            window_duration: total_len as f32 / rate,
        });
    }

    log::debug!(
        "Planned {} segments over {} samples (window={}, hop={})",
        segments.len(),
        total_len,
        window,
        hop
    );

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_windows() {
        // 4 s at 10 Hz, 1 s windows, 0.5 s hop, 0.5 s minimum
        let segments = plan_segments(40, 10, 10, 5, 5);
        let starts: Vec<usize> = segments.iter().map(|s| s.start_sample).collect();
        assert_eq!(starts, vec![0, 5, 10, 15, 20, 25, 30, 35]);
        assert_eq!(segments.last().unwrap().len(), 5);
        assert!((segments[3].start_time - 1.5).abs() < 1e-6);
        assert!((segments[0].window_duration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_indices_are_sequential() {
        let segments = plan_segments(100, 10, 10, 5, 5);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn test_short_tail_dropped() {
        // Tail of 3 samples is below the 5-sample minimum
        let segments = plan_segments(23, 10, 10, 10, 5);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].end_sample, 20);
    }

    #[test]
    fn test_signal_shorter_than_minimum() {
        let segments = plan_segments(3, 10, 10, 5, 5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_sample, 3);
    }

    #[test]
    fn test_empty_signal() {
        assert!(plan_segments(0, 10, 10, 5, 5).is_empty());
    }
}
