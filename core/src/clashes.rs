//! # Duplicate Detection
//!
//! Finds records that probably describe the same device and merges the ones
//! that are safe to merge without an operator looking at them.
//!
//! * A **MAC clash** is a MAC carried by more than one record. `add` creates
//!   these when a device shows up under an unrelated hostname.
//! * A **hostname clash** is a hostname used by more than one record, usually
//!   a device that changed its MAC (randomized Wi-Fi addresses).
//!
//! Records can opt out with the [`MAC_MERGE_EXCEPTION`] and
//! [`HOSTNAME_MERGE_EXCEPTION`] comments.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use hostdb_common::network::hostname::hostnames_equivalent;
use regex::Regex;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::record::HostRecord;
use crate::store::HostStore;

pub const MAC_MERGE_EXCEPTION: &str = "<mac merge exception>";
pub const HOSTNAME_MERGE_EXCEPTION: &str = "<hostname merge exception>";
pub const UNKNOWN_HOSTNAME: &str = "<unknown>";

/// Prefixes of names that vendors hand out to every unit they sell.
pub const GENERIC_PREFIXES: &[&str] = &["Android-", "iPhone-", "iPad-", "Samsung-", "Galaxy-"];

/// Generic names never treated as a hostname clash (compared fuzzily).
pub const DEFAULT_IGNORED_HOSTNAMES: &[&str] = &[
    "Android",
    "iPhone",
    "iPad",
    "Samsung",
    "<Ubiquiti AP>",
    UNKNOWN_HOSTNAME,
    "Pixel-4",
    "Pixel-4a",
    "Google-Home-Mini",
    "Google-Nest-Mini",
    "XboxOne",
    "MacBook-Pro",
    "MacBook-Air",
];

// Randomly generated 32 character names, as used by some IoT firmwares.
static GENERATED_HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{32}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clash {
    /// The shared MAC or hostname.
    pub key: String,
    pub indices: Vec<usize>,
}

/// Every MAC held by more than one record, ordered by MAC.
pub fn mac_clashes(records: &[HostRecord]) -> Vec<Clash> {
    let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        for mac in &record.macs {
            seen.entry(mac.as_str()).or_default().push(index);
        }
    }

    seen.into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(mac, indices)| Clash {
            key: mac.to_string(),
            indices,
        })
        .collect()
}

/// Every hostname used by more than one record, skipping generic names.
///
/// The indices of a clash cover every record whose hostnames match the key
/// case-insensitively or fuzzily.
pub fn hostname_clashes(records: &[HostRecord], ignored: &[&str]) -> Vec<Clash> {
    let mut owners: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        for hostname in &record.hostnames {
            if is_generic(hostname, ignored) {
                continue;
            }
            *owners.entry(hostname.as_str()).or_default() += 1;
        }
    }

    owners
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(hostname, _)| Clash {
            key: hostname.to_string(),
            indices: records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.matches_hostname(hostname, true))
                .map(|(index, _)| index)
                .collect(),
        })
        .collect()
}

fn is_generic(hostname: &str, ignored: &[&str]) -> bool {
    GENERIC_PREFIXES.iter().any(|prefix| hostname.starts_with(prefix))
        || ignored.iter().any(|name| hostnames_equivalent(name, hostname))
}

/// The clash indices minus records that carry the opt-out `marker` comment.
pub fn merge_candidates(records: &[HostRecord], indices: &[usize], marker: &str) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&index| records.get(index).is_some_and(|record| !record.has_comment(marker)))
        .collect()
}

/// Drops the `<unknown>` placeholder once a record has a real hostname.
pub fn tidy_unknown(record: &mut HostRecord) -> bool {
    record.hostnames.len() > 1 && record.hostnames.remove(UNKNOWN_HOSTNAME)
}

/// Whether records can be merged without review: every one of them must
/// have a generated hostname.
pub fn is_auto_mergeable(records: &[&HostRecord]) -> bool {
    records.iter().all(|record| {
        record
            .hostnames
            .iter()
            .any(|hostname| GENERATED_HOSTNAME.is_match(hostname))
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AutoMergeReport {
    /// MACs whose records were merged.
    pub merged: Vec<String>,
    /// MAC clashes left for an operator.
    pub skipped: Vec<Clash>,
}

/// Merges MAC clashes. Without `force` a clash is merged only when every
/// record carrying the MAC, excepted ones included, has a generated hostname.
///
/// Indices are looked up again for every clash since each merge shifts them.
pub fn auto_merge_macs(store: &mut HostStore, force: bool) -> StoreResult<AutoMergeReport> {
    let mut report = AutoMergeReport::default();
    let clashing: Vec<String> = mac_clashes(store.records())
        .into_iter()
        .map(|clash| clash.key)
        .collect();

    for mac in clashing {
        let indices: Vec<usize> = store.find_indices_by_mac(&mac)?;
        let candidates: Vec<usize> = merge_candidates(store.records(), &indices, MAC_MERGE_EXCEPTION);
        if candidates.len() < 2 {
            debug!(%mac, "nothing to merge after exceptions");
            continue;
        }

        // Excepted records still veto an unforced merge.
        if !force && !is_auto_mergeable(&store.get_many(&indices)) {
            report.skipped.push(Clash { key: mac, indices: candidates });
            continue;
        }

        let merged: usize = store.merge(candidates)?;
        if let Some(record) = store.get_mut(merged) {
            tidy_unknown(record);
        }
        info!(%mac, "merged clashing records");
        report.merged.push(mac);
    }

    Ok(report)
}
