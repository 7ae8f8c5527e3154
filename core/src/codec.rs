//! JSON (de)serialization of the database file.
//!
//! The file is an array of objects with exactly four keys, each holding an
//! array of strings:
//!
//! ```json
//! [{"ips": ["IP4/10.0.0.5"], "hostnames": ["Printer"],
//!   "macs": ["aa:bb:cc:dd:ee:ff"], "comments": ["lobby"]}]
//! ```

use std::collections::HashSet;
use std::net::IpAddr;

use hostdb_common::FormatError;
use hostdb_common::network::{ip, mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::record::HostRecord;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredRecord {
    ips: Vec<String>,
    hostnames: Vec<String>,
    macs: Vec<String>,
    comments: Vec<String>,
}

/// Decodes a whole database file.
///
/// Nothing is returned unless every record is valid.
pub fn decode_database(bytes: &[u8]) -> StoreResult<Vec<HostRecord>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::CorruptData(format!("not valid JSON: {e}")))?;

    let Value::Array(entries) = document else {
        return Err(StoreError::CorruptData(
            "top level must be an array of records".to_string(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| decode_record(index, entry))
        .collect()
}

fn decode_record(index: usize, entry: Value) -> StoreResult<HostRecord> {
    let stored: StoredRecord = serde_json::from_value(entry)
        .map_err(|e| StoreError::CorruptData(format!("record {index}: {e}")))?;

    let ips: HashSet<IpAddr> = stored
        .ips
        .iter()
        .map(|encoded| ip::decode_ip(encoded))
        .collect::<Result<_, FormatError>>()?;

    for stored_mac in &stored.macs {
        if !mac::is_canonical(stored_mac) {
            mac::canonicalize_mac(stored_mac)?;
            return Err(StoreError::CorruptData(format!(
                "record {index}: MAC '{stored_mac}' is not in canonical form"
            )));
        }
    }

    let record = HostRecord {
        ips,
        hostnames: stored.hostnames.into_iter().collect(),
        macs: stored.macs.into_iter().collect(),
        comments: stored.comments.into_iter().collect(),
    };
    if !record.has_identity() {
        warn!("record {index} has no MAC, IP or hostname");
    }
    Ok(record)
}

/// Encodes the database. With `sort`, every set is written in sorted order
/// (IPv4 addresses before IPv6) so saved files diff cleanly.
pub fn encode_database(records: &[HostRecord], sort: bool) -> StoreResult<Vec<u8>> {
    let stored: Vec<StoredRecord> = records
        .iter()
        .map(|record| encode_record(record, sort))
        .collect();
    Ok(serde_json::to_vec(&stored)?)
}

fn encode_record(record: &HostRecord, sort: bool) -> StoredRecord {
    let mut ips: Vec<IpAddr> = record.ips.iter().copied().collect();
    if sort {
        // `IpAddr` orders every V4 before every V6.
        ips.sort();
    }

    StoredRecord {
        ips: ips.iter().map(ip::encode_ip).collect(),
        hostnames: string_set(record.hostnames.iter(), sort),
        macs: string_set(record.macs.iter(), sort),
        comments: string_set(record.comments.iter(), sort),
    }
}

fn string_set<'a>(items: impl Iterator<Item = &'a String>, sort: bool) -> Vec<String> {
    let mut items: Vec<String> = items.cloned().collect();
    if sort {
        items.sort();
    }
    items
}
