//! Practice scheduling: pick the next phrase, biased toward missed ones.

use std::collections::HashMap;

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::PhraseEntry;

/// Scheduling knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Probability of replaying a phrase with a nonzero miss count instead
    /// of drawing uniformly from the whole tier.
    #[serde(default = "default_reinforcement")]
    pub reinforcement_probability: f64,
}

fn default_reinforcement() -> f64 {
    0.3
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            reinforcement_probability: default_reinforcement(),
        }
    }
}

impl PracticeConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.reinforcement_probability),
            "reinforcement_probability must be in [0, 1], got {}",
            self.reinforcement_probability
        );
        Ok(())
    }
}

/// Select the next phrase from `phrases`.
///
/// With probability `reinforcement_probability`, if any phrase's expected
/// answer has a nonzero miss count, one such phrase is chosen uniformly.
/// Otherwise the draw is uniform over the whole slice. Biased sampling, not
/// spaced repetition: no recency or interval modeling.
///
/// Returns `None` for an empty slice. Takes the RNG generically so seeded
/// runs are reproducible.
pub fn next_phrase<'a, R: Rng>(
    rng: &mut R,
    phrases: &'a [PhraseEntry],
    misses: &HashMap<String, u32>,
    config: &PracticeConfig,
) -> Option<&'a PhraseEntry> {
    if phrases.is_empty() {
        return None;
    }

    if rng.gen::<f64>() < config.reinforcement_probability {
        let missed: Vec<&PhraseEntry> = phrases
            .iter()
            .filter(|p| misses.get(&p.answer).copied().unwrap_or(0) > 0)
            .collect();
        if !missed.is_empty() {
            return Some(missed[rng.gen_range(0..missed.len())]);
        }
    }

    Some(&phrases[rng.gen_range(0..phrases.len())])
}
