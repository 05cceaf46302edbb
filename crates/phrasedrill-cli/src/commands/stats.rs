//! The `phrasedrill stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use phrasedrill_core::progress::ProgressStore;
use phrasedrill_speech::config::load_config_from;

pub fn execute(progress_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = match progress_path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.progress_path,
    };

    let store = ProgressStore::load(&path);
    if store.is_empty() {
        println!("No progress recorded yet ({}).", path.display());
        return Ok(());
    }

    // Hardest phrases first.
    let mut phrases: Vec<&str> = store.phrases();
    phrases.sort_by(|a, b| {
        store
            .failure_count(b)
            .cmp(&store.failure_count(a))
            .then_with(|| a.cmp(b))
    });

    let mut table = Table::new();
    table.set_header(vec!["Phrase", "Correct", "Missed", "Accuracy"]);
    for phrase in phrases {
        let accuracy = store
            .accuracy(phrase)
            .map(|a| format!("{:.0}%", a * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        table.add_row(vec![
            Cell::new(phrase),
            Cell::new(store.success_count(phrase)),
            Cell::new(store.failure_count(phrase)),
            Cell::new(accuracy),
        ]);
    }

    println!("{table}");
    Ok(())
}
