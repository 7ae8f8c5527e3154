use std::path::Path;

use anyhow::Context;
use hostdb_common::config::Config;
use hostdb_core::{AddOutcome, HostStore};
use tracing::{info, warn};

use crate::session::{Access, Session};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub merged: usize,
    pub appended: usize,
    pub failed: usize,
}

pub fn import(file: &Path, cfg: &Config) -> anyhow::Result<()> {
    let text: String =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    let mut session = Session::open(cfg, Access::Write)?;
    let summary: ImportSummary = import_lines(session.store_mut(), &text);
    session.commit()?;

    info!(
        "imported {}: {} appended, {} merged, {} lines skipped",
        file.display(),
        summary.appended,
        summary.merged,
        summary.failed
    );
    Ok(())
}

/// Adds every line of a legacy hosts file. Blank lines and `#` comment lines
/// are ignored; lines that fail to parse are reported and skipped.
pub fn import_lines(store: &mut HostStore, text: &str) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (lineno, line) in text.lines().enumerate() {
        let trimmed: &str = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match store.add_from_legacy_line(line) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome {
                        AddOutcome::Merged(_) => summary.merged += 1,
                        AddOutcome::Appended(_) => summary.appended += 1,
                    }
                }
            }
            Err(e) => {
                warn!("line {}: {e}", lineno + 1);
                summary.failed += 1;
            }
        }
    }

    summary
}
