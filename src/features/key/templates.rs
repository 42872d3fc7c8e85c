//! Krumhansl-Kessler key templates
//!
//! Defines tonal profiles for 24 keys (12 major + 12 minor). The tables are
//! built once per process and shared read-only.

use once_cell::sync::Lazy;

/// Krumhansl-Kessler major profile, tonic at index 0
pub const KRUMHANSL_MAJOR: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor profile, tonic at index 0
pub const KRUMHANSL_MINOR: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

static SHARED: Lazy<KeyTemplates> = Lazy::new(KeyTemplates::new);

/// Key templates for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Major key templates (12 keys: C, C#, D, ..., B)
    major: [[f32; 12]; 12],

    /// Minor key templates (12 keys: C, C#, D, ..., B)
    minor: [[f32; 12]; 12],
}

impl KeyTemplates {
    /// Create key templates with sum-normalized Krumhansl-Kessler profiles
    pub fn new() -> Self {
        Self {
            major: rotations(&KRUMHANSL_MAJOR),
            minor: rotations(&KRUMHANSL_MINOR),
        }
    }

    /// Process-wide instance
    pub fn shared() -> &'static KeyTemplates {
        &SHARED
    }

    /// Major profile with its tonic on pitch class `tonic`
    pub fn get_major_template(&self, tonic: u32) -> &[f32; 12] {
        &self.major[tonic as usize % 12]
    }

    /// Minor profile with its tonic on pitch class `tonic`
    pub fn get_minor_template(&self, tonic: u32) -> &[f32; 12] {
        &self.minor[tonic as usize % 12]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// All 12 rotations of a profile, each normalized to sum 1
fn rotations(profile: &[f32; 12]) -> [[f32; 12]; 12] {
    let sum: f32 = profile.iter().sum();
    let mut out = [[0.0f32; 12]; 12];
    for (tonic, template) in out.iter_mut().enumerate() {
        for (pc, slot) in template.iter_mut().enumerate() {
            *slot = profile[(pc + 12 - tonic) % 12] / sum;
        }
    }
    out
}
