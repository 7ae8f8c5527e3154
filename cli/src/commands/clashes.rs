use colored::*;
use hostdb_common::config::Config;
use hostdb_core::clashes::{self, AutoMergeReport, Clash, DEFAULT_IGNORED_HOSTNAMES, HOSTNAME_MERGE_EXCEPTION, MAC_MERGE_EXCEPTION};
use hostdb_core::vendors::{MacOuiRepo, VendorRepository};
use hostdb_core::HostRecord;
use tracing::{info, warn};

use crate::commands::list::print_records;
use crate::hprint;
use crate::session::{Access, Session};
use crate::terminal::{colors, print};

pub fn clashes(show_vendors: bool, cfg: &Config) -> anyhow::Result<()> {
    let session = Session::open(cfg, Access::Read)?;
    let records: &[HostRecord] = session.store().records();
    let repo = MacOuiRepo;
    let vendors: Option<&dyn VendorRepository> = if show_vendors { Some(&repo) } else { None };

    let by_mac: Vec<Clash> = without_exceptions(records, clashes::mac_clashes(records), MAC_MERGE_EXCEPTION);
    let by_hostname: Vec<Clash> = without_exceptions(
        records,
        clashes::hostname_clashes(records, DEFAULT_IGNORED_HOSTNAMES),
        HOSTNAME_MERGE_EXCEPTION,
    );

    if by_mac.is_empty() && by_hostname.is_empty() {
        print::header("no clashes", cfg.quiet);
        print::no_results("clashes");
        return Ok(());
    }

    print_clashes("mac clashes", &by_mac, records, vendors, cfg);
    print_clashes("hostname clashes", &by_hostname, records, vendors, cfg);
    info!("{} MAC clashes, {} hostname clashes", by_mac.len(), by_hostname.len());
    Ok(())
}

pub fn automerge(force: bool, cfg: &Config) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, Access::Write)?;
    let report: AutoMergeReport = clashes::auto_merge_macs(session.store_mut(), force)?;

    for clash in &report.skipped {
        warn!(
            "{} shared by records {:?} needs review, run `merge` by hand",
            clash.key, clash.indices
        );
    }

    if report.merged.is_empty() {
        info!("nothing to merge automatically");
        return Ok(());
    }

    session.commit()?;
    info!("merged the records of {} MACs", report.merged.len());
    Ok(())
}

/// Drops opted-out records from each clash, and clashes left with fewer
/// than two records.
fn without_exceptions(records: &[HostRecord], found: Vec<Clash>, marker: &str) -> Vec<Clash> {
    found
        .into_iter()
        .map(|clash| Clash {
            indices: clashes::merge_candidates(records, &clash.indices, marker),
            key: clash.key,
        })
        .filter(|clash| clash.indices.len() > 1)
        .collect()
}

fn print_clashes(
    title: &str,
    found: &[Clash],
    records: &[HostRecord],
    vendors: Option<&dyn VendorRepository>,
    cfg: &Config,
) {
    if found.is_empty() {
        return;
    }

    print::header(title, cfg.quiet);
    for (pos, clash) in found.iter().enumerate() {
        let key: ColoredString = clash.key.color(colors::ACCENT).bold();
        print::print(&format!("{} {}", "»".color(colors::SEPARATOR), key));
        print_records(records, &clash.indices, vendors, cfg);
        if pos + 1 != found.len() {
            hprint!();
        }
    }
}
