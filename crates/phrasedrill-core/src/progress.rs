//! Per-phrase progress counters with JSON persistence.
//!
//! The store is read once at session start and rewritten after each counted
//! verification. Concurrent sessions racing on the file are last-writer-wins;
//! there is no locking.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Success and failure counts keyed by expected-answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStore {
    #[serde(default)]
    pub successes: HashMap<String, u32>,
    #[serde(default)]
    pub failures: HashMap<String, u32>,
}

impl ProgressStore {
    /// Load progress from `path`.
    ///
    /// A missing or unreadable file degrades to an empty store with a
    /// warning; progress loss is never fatal to a session.
    pub fn load(path: &Path) -> ProgressStore {
        if !path.exists() {
            return ProgressStore::default();
        }
        match File::open(path)
            .map_err(anyhow::Error::from)
            .and_then(|f| serde_json::from_reader(BufReader::new(f)).map_err(anyhow::Error::from))
        {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    "could not read progress from {}: {e:#}; starting empty",
                    path.display()
                );
                ProgressStore::default()
            }
        }
    }

    /// Write progress to `path` atomically (write to a temp file in the same
    /// directory, then persist over the target).
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = parent {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let temp = NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))
            .context("failed to create temp progress file")?;
        serde_json::to_writer_pretty(BufWriter::new(&temp), self)
            .context("failed to serialize progress")?;
        temp.persist(path)
            .map_err(|e| anyhow::anyhow!("failed to write progress to {}: {e}", path.display()))?;
        Ok(())
    }

    /// Record one counted verification for a phrase.
    pub fn record(&mut self, answer: &str, exact: bool) {
        let map = if exact {
            &mut self.successes
        } else {
            &mut self.failures
        };
        *map.entry(answer.to_string()).or_insert(0) += 1;
    }

    pub fn success_count(&self, answer: &str) -> u32 {
        self.successes.get(answer).copied().unwrap_or(0)
    }

    pub fn failure_count(&self, answer: &str) -> u32 {
        self.failures.get(answer).copied().unwrap_or(0)
    }

    /// Fraction of counted attempts that were exact, if any were recorded.
    pub fn accuracy(&self, answer: &str) -> Option<f64> {
        let s = self.success_count(answer);
        let f = self.failure_count(answer);
        let total = s + f;
        if total == 0 {
            None
        } else {
            Some(f64::from(s) / f64::from(total))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.failures.is_empty()
    }

    /// All phrases with at least one recorded attempt.
    pub fn phrases(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .successes
            .keys()
            .chain(self.failures.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
