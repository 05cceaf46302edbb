//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Tier;
use crate::session::{AttemptRecord, Session};
use crate::verify::Outcome;

/// A complete record of one drill session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the phrase pack drilled.
    pub phrase_set: PhraseSetSummary,
    /// Tier that was practiced.
    pub tier: Tier,
    /// Final score and counted attempts.
    pub score: u32,
    pub total: u32,
    /// Longest run of consecutive exact answers.
    pub best_streak: u32,
    /// Every attempt, in order.
    pub attempts: Vec<AttemptRecord>,
    /// Aggregates over the counted attempts.
    pub stats: SessionStats,
}

/// Summary of a phrase pack (without the full phrase lists).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseSetSummary {
    pub id: String,
    pub name: String,
    pub phrase_count: usize,
}

/// Aggregate statistics for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Counted (non-empty) attempts.
    pub counted: u32,
    /// Exact answers among them.
    pub exact: u32,
    /// exact / counted, 0.0 when nothing was counted.
    pub accuracy: f64,
    /// Mean similarity over counted attempts, 0.0 when nothing was counted.
    pub mean_similarity: f64,
}

impl SessionReport {
    /// Build a report from a finished session.
    pub fn from_session(session: &Session) -> SessionReport {
        let attempts: Vec<AttemptRecord> = session.history().to_vec();

        let counted: Vec<&AttemptRecord> =
            attempts.iter().filter(|a| a.outcome.counts()).collect();
        let exact = counted
            .iter()
            .filter(|a| a.outcome == Outcome::Exact)
            .count() as u32;
        let counted_n = counted.len() as u32;
        let accuracy = if counted_n == 0 {
            0.0
        } else {
            f64::from(exact) / f64::from(counted_n)
        };
        let mean_similarity = if counted.is_empty() {
            0.0
        } else {
            counted.iter().map(|a| a.similarity).sum::<f64>() / counted.len() as f64
        };

        SessionReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            phrase_set: PhraseSetSummary {
                id: session.phrase_set().id.clone(),
                name: session.phrase_set().name.clone(),
                phrase_count: session.phrase_set().phrase_count(),
            },
            tier: session.tier(),
            score: session.score(),
            total: session.total(),
            best_streak: session.best_streak(),
            attempts,
            stats: SessionStats {
                counted: counted_n,
                exact,
                accuracy,
                mean_similarity,
            },
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<SessionReport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
