//! Feeds sightings printed by `listen` (or any compatible sniffer) into the
//! database.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use hostdb_common::config::Config;
use hostdb_core::{AddOutcome, HostStore};
use hostdb_protocols::sighting::Sighting;
use tracing::{debug, info, warn};

use crate::session::{Access, Session};

const STDIN: &str = "-";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub merged: usize,
    pub appended: usize,
    /// Sightings missing an IP, hostname or MAC.
    pub incomplete: usize,
    pub rejected: usize,
}

pub fn ingest(source: &str, cfg: &Config) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = if source == STDIN {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(source).with_context(|| format!("opening {source}"))?;
        Box::new(BufReader::new(file))
    };

    let mut session = Session::open(cfg, Access::Write)?;
    let summary: IngestSummary = ingest_lines(session.store_mut(), reader)?;
    session.commit()?;

    info!(
        "{} appended, {} merged, {} incomplete, {} rejected",
        summary.appended, summary.merged, summary.incomplete, summary.rejected
    );
    Ok(())
}

pub fn ingest_lines(store: &mut HostStore, reader: impl BufRead) -> anyhow::Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    for (lineno, line) in reader.lines().enumerate() {
        let line: String = line.context("reading sightings")?;
        if line.trim().is_empty() {
            continue;
        }

        let sighting = match Sighting::from_json_line(&line) {
            Ok(sighting) => sighting,
            Err(e) => {
                warn!("line {}: {e}", lineno + 1);
                summary.rejected += 1;
                continue;
            }
        };

        let Some((ip, hostname, mac)) = sighting.identity() else {
            debug!(?sighting, "skipping incomplete sighting");
            summary.incomplete += 1;
            continue;
        };

        match store.add(ip, hostname, mac, Vec::<String>::new()) {
            Ok(AddOutcome::Merged(_)) => summary.merged += 1,
            Ok(AddOutcome::Appended(_)) => summary.appended += 1,
            Err(e) => {
                warn!("line {}: {e}", lineno + 1);
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}
