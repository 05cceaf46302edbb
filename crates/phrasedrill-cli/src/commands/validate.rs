//! The `phrasedrill validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(pack_path: PathBuf) -> Result<()> {
    let sets = if pack_path.is_dir() {
        phrasedrill_core::parser::load_pack_directory(&pack_path)?
    } else {
        vec![phrasedrill_core::parser::parse_phrase_set(&pack_path)?]
    };

    let mut total_warnings = 0;

    for set in &sets {
        println!("Phrase pack: {} ({} phrases)", set.name, set.phrase_count());

        let warnings = phrasedrill_core::parser::validate_phrase_set(set);
        for w in &warnings {
            let prefix = w
                .tier
                .map(|t| format!("  [{t}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All phrase packs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
