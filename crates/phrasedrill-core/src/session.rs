//! Session state and the verify/advance/reset handlers.
//!
//! All mutable drill state lives in an explicit [`Session`] passed to each
//! handler; there is no ambient global state. Every handler returns a render
//! payload describing what the UI should show next.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{PhraseEntry, PhraseSet, Tier};
use crate::scheduler::{next_phrase, PracticeConfig};
use crate::verify::{verify, Outcome, VerifyConfig};

/// Snapshot of one verification attempt. Append-only; never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub tier: Tier,
    pub prompt: String,
    pub expected: String,
    pub submitted: String,
    pub outcome: Outcome,
    pub similarity: f64,
    pub timestamp: DateTime<Utc>,
}

/// What the UI shows for the current phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptCard {
    pub tier: Tier,
    pub prompt: String,
    /// Prompt translation, shown up front only on easy drills.
    pub translation: Option<String>,
}

/// Render payload returned by the verify handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyFeedback {
    pub outcome: Outcome,
    pub message: String,
    pub similarity: f64,
    pub score: u32,
    pub total: u32,
    pub streak: u32,
    /// Translations revealed after verification on non-easy tiers.
    pub reveal: Option<Reveal>,
}

/// Post-verification translation reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reveal {
    pub prompt_translation: String,
    pub answer_translation: String,
}

/// Mutable per-session drill state.
#[derive(Debug, Clone)]
pub struct Session {
    set: PhraseSet,
    tier: Tier,
    current: PhraseEntry,
    score: u32,
    total: u32,
    streak: u32,
    best_streak: u32,
    history: Vec<AttemptRecord>,
    misses: HashMap<String, u32>,
    verify_config: VerifyConfig,
    practice_config: PracticeConfig,
}

impl Session {
    /// Start a session on one tier of a phrase pack.
    ///
    /// Fails if the tier has no phrases or a config is invalid.
    pub fn new<R: Rng>(
        set: PhraseSet,
        tier: Tier,
        verify_config: VerifyConfig,
        practice_config: PracticeConfig,
        rng: &mut R,
    ) -> Result<Session> {
        verify_config.validate()?;
        practice_config.validate()?;

        let misses = HashMap::new();
        let current = next_phrase(rng, set.tier(tier), &misses, &practice_config)
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!("tier '{tier}' has no phrases in pack '{}'", set.id)
            })?;

        Ok(Session {
            set,
            tier,
            current,
            score: 0,
            total: 0,
            streak: 0,
            best_streak: 0,
            history: Vec::new(),
            misses,
            verify_config,
            practice_config,
        })
    }

    /// Verify a submitted answer against the current phrase.
    ///
    /// Appends an attempt record, then applies score/streak/miss updates for
    /// counted outcomes. Empty submissions warn without touching any counter.
    pub fn verify(&mut self, submitted: &str) -> VerifyFeedback {
        let verdict = verify(submitted, &self.current.answer, &self.verify_config);

        self.history.push(AttemptRecord {
            tier: self.tier,
            prompt: self.current.prompt.clone(),
            expected: self.current.answer.clone(),
            submitted: submitted.to_string(),
            outcome: verdict.outcome,
            similarity: verdict.similarity,
            timestamp: Utc::now(),
        });

        if verdict.outcome.counts() {
            self.total += 1;
            self.score += verdict.score_increment;

            if verdict.outcome == Outcome::Exact {
                self.streak += 1;
                self.best_streak = self.best_streak.max(self.streak);
                // A correct replay pays down the phrase's miss count.
                if let Some(count) = self.misses.get_mut(&self.current.answer) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.misses.remove(&self.current.answer);
                    }
                }
            } else {
                self.streak = 0;
                *self.misses.entry(self.current.answer.clone()).or_insert(0) += 1;
            }
        }

        let reveal = if self.tier.shows_translation_upfront() {
            None
        } else {
            Some(Reveal {
                prompt_translation: self.current.prompt_translation.clone(),
                answer_translation: self.current.answer_translation.clone(),
            })
        };

        VerifyFeedback {
            outcome: verdict.outcome,
            message: verdict.message,
            similarity: verdict.similarity,
            score: self.score,
            total: self.total,
            streak: self.streak,
            reveal,
        }
    }

    /// Move to the next phrase, biased toward missed ones.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> PromptCard {
        if let Some(next) =
            next_phrase(rng, self.set.tier(self.tier), &self.misses, &self.practice_config)
        {
            self.current = next.clone();
        }
        self.prompt_card()
    }

    /// Discard all session progress and start over on the same tier.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) -> PromptCard {
        self.score = 0;
        self.total = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.history.clear();
        self.misses.clear();
        self.advance(rng)
    }

    /// Render payload for the current phrase.
    pub fn prompt_card(&self) -> PromptCard {
        let translation = if self.tier.shows_translation_upfront() {
            Some(self.current.prompt_translation.clone())
        } else {
            None
        };
        PromptCard {
            tier: self.tier,
            prompt: self.current.prompt.clone(),
            translation,
        }
    }

    pub fn phrase_set(&self) -> &PhraseSet {
        &self.set
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn current(&self) -> &PhraseEntry {
        &self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    /// Current miss counts keyed by expected-answer text.
    pub fn misses(&self) -> &HashMap<String, u32> {
        &self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn single_phrase_session() -> (Session, StdRng) {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            Tier::Medium,
            vec![PhraseEntry {
                prompt: "Where is the box?".into(),
                answer: "The box is on the table.".into(),
                prompt_translation: "Onde está a caixa?".into(),
                answer_translation: "A caixa está na mesa.".into(),
            }],
        );
        let set = PhraseSet {
            id: "test".into(),
            name: "Test".into(),
            description: String::new(),
            tiers,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let session = Session::new(
            set,
            Tier::Medium,
            VerifyConfig::default(),
            PracticeConfig::default(),
            &mut rng,
        )
        .unwrap();
        (session, rng)
    }

    #[test]
    fn empty_tier_fails_to_start() {
        let set = PhraseSet {
            id: "empty".into(),
            name: "Empty".into(),
            description: String::new(),
            tiers: BTreeMap::new(),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = Session::new(
            set,
            Tier::Hard,
            VerifyConfig::default(),
            PracticeConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(err.to_string().contains("hard"));
    }

    #[test]
    fn exact_answer_scores_and_extends_streak() {
        let (mut session, _) = single_phrase_session();
        let fb = session.verify("the box is on the table");
        assert_eq!(fb.outcome, Outcome::Exact);
        assert_eq!(fb.score, 1);
        assert_eq!(fb.total, 1);
        assert_eq!(fb.streak, 1);

        let fb = session.verify("The box is on the table.");
        assert_eq!(fb.streak, 2);
        assert_eq!(session.best_streak(), 2);
    }

    #[test]
    fn miss_resets_streak_and_tracks_difficult_word() {
        let (mut session, _) = single_phrase_session();
        session.verify("the box is on the table");
        assert_eq!(session.streak(), 1);

        let fb = session.verify("the box is on the shelf");
        assert_ne!(fb.outcome, Outcome::Exact);
        assert_eq!(fb.streak, 0);
        assert_eq!(fb.score, 1);
        assert_eq!(
            session.misses().get("The box is on the table."),
            Some(&1),
            "missed phrase should be tracked"
        );
        assert_eq!(session.best_streak(), 1);
    }

    #[test]
    fn exact_replay_pays_down_miss_count() {
        let (mut session, _) = single_phrase_session();
        session.verify("wrong answer entirely zzz");
        assert_eq!(session.misses().len(), 1);

        session.verify("the box is on the table");
        assert!(
            session.misses().is_empty(),
            "exact replay should clear a single miss"
        );
    }

    #[test]
    fn empty_submission_changes_nothing_but_history() {
        let (mut session, _) = single_phrase_session();
        let fb = session.verify("   ");
        assert_eq!(fb.outcome, Outcome::Empty);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total(), 0);
        assert_eq!(session.streak(), 0);
        assert!(session.misses().is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].outcome, Outcome::Empty);
    }

    #[test]
    fn history_is_append_only_snapshots() {
        let (mut session, _) = single_phrase_session();
        session.verify("one");
        session.verify("two");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].submitted, "one");
        assert_eq!(session.history()[1].submitted, "two");
        assert_eq!(session.history()[0].tier, Tier::Medium);
    }

    #[test]
    fn medium_tier_reveals_translation_after_verification() {
        let (mut session, _) = single_phrase_session();
        assert!(session.prompt_card().translation.is_none());

        let fb = session.verify("anything");
        let reveal = fb.reveal.expect("medium tier reveals translations");
        assert_eq!(reveal.prompt_translation, "Onde está a caixa?");
        assert_eq!(reveal.answer_translation, "A caixa está na mesa.");
    }

    #[test]
    fn easy_tier_shows_translation_upfront() {
        let set = PhraseSet::builtin();
        let mut rng = StdRng::seed_from_u64(4);
        let session = Session::new(
            set,
            Tier::Easy,
            VerifyConfig::default(),
            PracticeConfig::default(),
            &mut rng,
        )
        .unwrap();
        let card = session.prompt_card();
        assert!(card.translation.is_some());
    }

    #[test]
    fn reset_clears_all_counters() {
        let (mut session, mut rng) = single_phrase_session();
        session.verify("the box is on the table");
        session.verify("nope");
        assert!(session.total() > 0);

        session.reset(&mut rng);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total(), 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.best_streak(), 0);
        assert!(session.history().is_empty());
        assert!(session.misses().is_empty());
    }

    #[test]
    fn advance_replays_missed_phrases() {
        // Two phrases, one missed; advancing repeatedly must hit the missed
        // one more often than its uniform share.
        let mut tiers = BTreeMap::new();
        tiers.insert(
            Tier::Easy,
            vec![
                PhraseEntry {
                    prompt: "p0".into(),
                    answer: "a0".into(),
                    prompt_translation: String::new(),
                    answer_translation: String::new(),
                },
                PhraseEntry {
                    prompt: "p1".into(),
                    answer: "a1".into(),
                    prompt_translation: String::new(),
                    answer_translation: String::new(),
                },
            ],
        );
        let set = PhraseSet {
            id: "two".into(),
            name: "Two".into(),
            description: String::new(),
            tiers,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = Session::new(
            set,
            Tier::Easy,
            VerifyConfig::default(),
            PracticeConfig::default(),
            &mut rng,
        )
        .unwrap();

        // Force a miss on whichever phrase is current.
        let missed = session.current().answer.clone();
        session.verify("completely unrelated words qqq");
        assert_eq!(session.misses().get(&missed), Some(&1));

        let mut hits = 0;
        let n = 2000;
        for _ in 0..n {
            let card = session.advance(&mut rng);
            let is_missed = session.current().answer == missed;
            assert_eq!(card.prompt, session.current().prompt);
            if is_missed {
                hits += 1;
            }
        }
        // Expected rate: 0.3 + 0.7 * 0.5 = 0.65.
        let rate = f64::from(hits) / f64::from(n);
        assert!((rate - 0.65).abs() < 0.04, "got {rate}");
    }
}
