//! Answer verification: classify a submitted answer against the expected
//! phrase and emit a score increment.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::similarity::ratio;

/// Classification of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Normalized answer matches exactly. The only outcome that scores.
    Exact,
    /// Similarity at or above the near-perfect threshold.
    NearPerfect,
    /// Similarity at or above the minor-error threshold.
    MinorError,
    /// Similarity at or above the moderate-error threshold.
    ModerateError,
    /// Similarity below every threshold.
    MajorMismatch,
    /// Nothing was submitted. Warned about, never penalized.
    Empty,
}

impl Outcome {
    /// Whether this attempt counts toward score, streak, and miss tracking.
    pub fn counts(&self) -> bool {
        !matches!(self, Outcome::Empty)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exact => write!(f, "exact"),
            Outcome::NearPerfect => write!(f, "near_perfect"),
            Outcome::MinorError => write!(f, "minor_error"),
            Outcome::ModerateError => write!(f, "moderate_error"),
            Outcome::MajorMismatch => write!(f, "major_mismatch"),
            Outcome::Empty => write!(f, "empty"),
        }
    }
}

/// Similarity thresholds for near-miss classification.
///
/// Boundaries are inclusive: a similarity exactly at a threshold falls into
/// the higher-scoring bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Lower bound for [`Outcome::NearPerfect`].
    #[serde(default = "default_near_perfect")]
    pub near_perfect: f64,
    /// Lower bound for [`Outcome::MinorError`].
    #[serde(default = "default_minor")]
    pub minor: f64,
    /// Lower bound for [`Outcome::ModerateError`].
    #[serde(default = "default_moderate")]
    pub moderate: f64,
}

fn default_near_perfect() -> f64 {
    0.90
}

fn default_minor() -> f64 {
    0.75
}

fn default_moderate() -> f64 {
    0.60
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            near_perfect: default_near_perfect(),
            minor: default_minor(),
            moderate: default_moderate(),
        }
    }
}

impl VerifyConfig {
    /// Check that the thresholds form a valid ordered partition of `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.moderate)
                && self.moderate <= self.minor
                && self.minor <= self.near_perfect
                && self.near_perfect <= 1.0,
            "thresholds must satisfy 0 <= moderate <= minor <= near_perfect <= 1, \
             got moderate={}, minor={}, near_perfect={}",
            self.moderate,
            self.minor,
            self.near_perfect
        );
        Ok(())
    }
}

/// The result of verifying one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Outcome classification.
    pub outcome: Outcome,
    /// Feedback message for the learner.
    pub message: String,
    /// Score increment: 1 for [`Outcome::Exact`], 0 otherwise.
    pub score_increment: u32,
    /// Raw similarity between submitted and expected, in `[0, 1]`.
    pub similarity: f64,
}

/// Verify a submitted answer against the expected phrase.
///
/// A pure function of its inputs: identical `(submitted, expected)` pairs
/// always produce identical verdicts, and no input panics or errors.
pub fn verify(submitted: &str, expected: &str, config: &VerifyConfig) -> Verdict {
    if submitted.trim().is_empty() {
        return Verdict {
            outcome: Outcome::Empty,
            message: "Type or speak an answer first.".into(),
            score_increment: 0,
            similarity: 0.0,
        };
    }

    let norm_submitted = normalize(submitted);
    let norm_expected = normalize(expected);

    if norm_submitted == norm_expected {
        return Verdict {
            outcome: Outcome::Exact,
            message: "Correct! Well done.".into(),
            score_increment: 1,
            similarity: 1.0,
        };
    }

    let similarity = ratio(&norm_submitted, &norm_expected);

    let (outcome, message) = if similarity >= config.near_perfect {
        (
            Outcome::NearPerfect,
            format!("So close! The expected answer is: \"{expected}\""),
        )
    } else if similarity >= config.minor {
        (
            Outcome::MinorError,
            format!("Almost there, small slip. Expected: \"{expected}\""),
        )
    } else if similarity >= config.moderate {
        (
            Outcome::ModerateError,
            format!("Partly right. Expected: \"{expected}\""),
        )
    } else {
        (
            Outcome::MajorMismatch,
            format!("Not quite. Try again! Expected: \"{expected}\""),
        )
    };

    Verdict {
        outcome,
        message,
        score_increment: 0,
        similarity,
    }
}
