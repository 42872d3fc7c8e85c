//! Chord timeline
//!
//! Collapses the per-window candidate stream into chord-change events. A
//! candidate is kept when it changes the label, when enough time has passed
//! since the last kept entry, or when its confidence jumps well above it.

use crate::config::AnalysisConfig;
use crate::features::chords::{ChordCandidate, NO_CHORD};
use serde::{Deserialize, Serialize};

/// One chord-change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Start time formatted "mm:ss"
    pub time: String,

    /// Chord label
    pub chord: String,

    /// Template similarity of the window
    pub confidence: f32,

    /// Start time in seconds
    #[serde(skip)]
    pub seconds: f32,
}

/// Reducer thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    /// Repeat a label after this many seconds without a kept entry
    pub max_gap_seconds: f32,

    /// Repeat a label when confidence rises by more than this
    pub confidence_jump: f32,

    /// Maximum progression length
    pub progression_cap: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: 4.0,
            confidence_jump: 0.2,
            progression_cap: 8,
        }
    }
}

impl TimelineConfig {
    /// Thresholds from the analysis configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_gap_seconds: config.timeline_max_gap_seconds,
            confidence_jump: config.timeline_confidence_jump,
            progression_cap: config.progression_cap,
        }
    }
}

/// Streaming consecutive-chord filter
#[derive(Debug, Clone)]
pub struct TimelineReducer {
    config: TimelineConfig,
    entries: Vec<TimelineEntry>,
}

impl TimelineReducer {
    /// Empty reducer
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// Offer the next candidate; returns true if it was kept
    pub fn push(&mut self, candidate: &ChordCandidate) -> bool {
        let keep = match self.entries.last() {
            None => true,
            Some(last) => {
                candidate.label != last.chord
                    || candidate.start_time - last.seconds >= self.config.max_gap_seconds
                    || candidate.confidence - last.confidence > self.config.confidence_jump
            }
        };

        if keep {
            self.entries.push(TimelineEntry {
                time: format_timestamp(candidate.start_time),
                chord: candidate.label.clone(),
                confidence: candidate.confidence,
                seconds: candidate.start_time,
            });
        }
        keep
    }

    /// Kept entries, in time order
    pub fn finish(self) -> Vec<TimelineEntry> {
        self.entries
    }
}

/// Reduce a time-ordered candidate stream to a timeline
pub fn build_timeline(candidates: &[ChordCandidate], config: &TimelineConfig) -> Vec<TimelineEntry> {
    let mut reducer = TimelineReducer::new(*config);
    for candidate in candidates {
        reducer.push(candidate);
    }
    let timeline = reducer.finish();
    log::debug!(
        "Timeline: {} candidates reduced to {} entries",
        candidates.len(),
        timeline.len()
    );
    timeline
}

/// Distinct chord labels in first-occurrence order, without "N", capped
pub fn derive_progression(timeline: &[TimelineEntry], cap: usize) -> Vec<String> {
    let mut progression: Vec<String> = Vec::new();
    for entry in timeline {
        if progression.len() >= cap {
            break;
        }
        if entry.chord != NO_CHORD && !progression.contains(&entry.chord) {
            progression.push(entry.chord.clone());
        }
    }
    progression
}

/// Format seconds as "mm:ss" (minutes keep counting past 59)
pub fn format_timestamp(seconds: f32) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Mean confidence of the timeline; 0 when empty
pub fn average_confidence(timeline: &[TimelineEntry]) -> f32 {
    if timeline.is_empty() {
        return 0.0;
    }
    timeline.iter().map(|e| e.confidence).sum::<f32>() / timeline.len() as f32
}
