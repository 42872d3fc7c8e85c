//! Chord templates
//!
//! Binary triad profiles: a 1 on each chord tone, 0 elsewhere. Banks are
//! built once per vocabulary and shared read-only.

use crate::features::chroma::{pitch_class_name, N_PITCH_CLASSES};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DIATONIC: Lazy<ChordBank> = Lazy::new(|| ChordBank::new(ChordVocabulary::Diatonic));
static MAJOR_MINOR: Lazy<ChordBank> = Lazy::new(|| ChordBank::new(ChordVocabulary::MajorMinor));
static MAJOR_MINOR_DIMINISHED: Lazy<ChordBank> =
    Lazy::new(|| ChordBank::new(ChordVocabulary::MajorMinorDiminished));

/// Set of chords a bank can recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChordVocabulary {
    /// The six diatonic triads of C major: C, Dm, Em, F, G, Am
    Diatonic,
    /// All 24 major and minor triads
    #[default]
    MajorMinor,
    /// All 36 major, minor and diminished triads
    MajorMinorDiminished,
}

/// Triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordQuality {
    /// Root, major third, fifth
    Major,
    /// Root, minor third, fifth
    Minor,
    /// Root, minor third, diminished fifth
    Diminished,
}

impl ChordQuality {
    /// Semitone offsets of the chord tones above the root
    pub fn intervals(&self) -> [usize; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
            ChordQuality::Diminished => [0, 3, 6],
        }
    }

    /// Label suffix ("", "m", "dim")
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }
}

/// A named binary chord profile
#[derive(Debug, Clone, PartialEq)]
pub struct ChordTemplate {
    /// Chord label, e.g. "C#m"
    pub name: String,

    /// Root pitch class (0 = C)
    pub root: usize,

    /// Triad quality
    pub quality: ChordQuality,

    /// Binary membership profile
    pub profile: [f32; N_PITCH_CLASSES],
}

impl ChordTemplate {
    /// Build the template for `root` and `quality`
    pub fn new(root: usize, quality: ChordQuality) -> Self {
        let root = root % N_PITCH_CLASSES;
        let mut profile = [0.0f32; N_PITCH_CLASSES];
        for interval in quality.intervals() {
            profile[(root + interval) % N_PITCH_CLASSES] = 1.0;
        }
        Self {
            name: format!("{}{}", pitch_class_name(root), quality.suffix()),
            root,
            quality,
            profile,
        }
    }
}

/// Ordered chord templates for one vocabulary
///
/// Order is majors (ascending root), then minors, then diminished. Scoring
/// ties resolve to the earlier template.
#[derive(Debug, Clone)]
pub struct ChordBank {
    vocabulary: ChordVocabulary,
    templates: Vec<ChordTemplate>,
}

impl ChordBank {
    /// Build a bank
    pub fn new(vocabulary: ChordVocabulary) -> Self {
        let templates = match vocabulary {
            ChordVocabulary::Diatonic => {
                let majors = [0, 5, 7].map(|root| ChordTemplate::new(root, ChordQuality::Major));
                let minors = [2, 4, 9].map(|root| ChordTemplate::new(root, ChordQuality::Minor));
                majors.into_iter().chain(minors).collect()
            }
            ChordVocabulary::MajorMinor => all_roots(&[ChordQuality::Major, ChordQuality::Minor]),
            ChordVocabulary::MajorMinorDiminished => all_roots(&[
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Diminished,
            ]),
        };
        Self {
            vocabulary,
            templates,
        }
    }

    /// Shared bank for a vocabulary
    pub fn shared(vocabulary: ChordVocabulary) -> &'static ChordBank {
        match vocabulary {
            ChordVocabulary::Diatonic => &DIATONIC,
            ChordVocabulary::MajorMinor => &MAJOR_MINOR,
            ChordVocabulary::MajorMinorDiminished => &MAJOR_MINOR_DIMINISHED,
        }
    }

    /// Vocabulary this bank covers
    pub fn vocabulary(&self) -> ChordVocabulary {
        self.vocabulary
    }

    /// Templates in scoring order
    pub fn templates(&self) -> &[ChordTemplate] {
        &self.templates
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True for an empty bank
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn all_roots(qualities: &[ChordQuality]) -> Vec<ChordTemplate> {
    qualities
        .iter()
        .flat_map(|&quality| (0..N_PITCH_CLASSES).map(move |root| ChordTemplate::new(root, quality)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_sizes() {
        assert_eq!(ChordBank::new(ChordVocabulary::Diatonic).len(), 6);
        assert_eq!(ChordBank::new(ChordVocabulary::MajorMinor).len(), 24);
        assert_eq!(ChordBank::new(ChordVocabulary::MajorMinorDiminished).len(), 36);
    }

    #[test]
    fn test_iteration_order() {
        let bank = ChordBank::shared(ChordVocabulary::MajorMinorDiminished);
        let names: Vec<&str> = bank.templates().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names[0], "C");
        assert_eq!(names[11], "B");
        assert_eq!(names[12], "Cm");
        assert_eq!(names[21], "Am");
        assert_eq!(names[35], "Bdim");

        let diatonic: Vec<String> = ChordBank::new(ChordVocabulary::Diatonic)
            .templates()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(diatonic, vec!["C", "F", "G", "Dm", "Em", "Am"]);
    }

    #[test]
    fn test_profiles() {
        let c_sharp_minor = ChordTemplate::new(1, ChordQuality::Minor);
        assert_eq!(c_sharp_minor.name, "C#m");
        let tones: Vec<usize> = (0..12).filter(|&i| c_sharp_minor.profile[i] > 0.0).collect();
        assert_eq!(tones, vec![1, 4, 8]);

        let b_dim = ChordTemplate::new(11, ChordQuality::Diminished);
        let tones: Vec<usize> = (0..12).filter(|&i| b_dim.profile[i] > 0.0).collect();
        assert_eq!(tones, vec![2, 5, 11]);
    }

    #[test]
    fn test_shared_is_stable() {
        let a = ChordBank::shared(ChordVocabulary::MajorMinor) as *const ChordBank;
        let b = ChordBank::shared(ChordVocabulary::MajorMinor) as *const ChordBank;
        assert_eq!(a, b);
    }
}
