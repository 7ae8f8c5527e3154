//! # Host Store
//!
//! An ordered, file-backed list of [`HostRecord`]s.
//!
//! Records are only ever appended, except that [`HostStore::merge`] removes
//! the merged records and appends the combined one at the end. Lookups by
//! hostname and IP are linear scans (the dataset is a few thousand records at
//! most); lookups by MAC are memoized in a cache that every mutation keeps
//! consistent.
//!
//! The store assumes a single writer. Callers that share the file between
//! processes must lock around their sessions.

use std::collections::{BTreeSet, HashMap};
use std::net::IpAddr;
use std::ops::Range;
use std::path::{Path, PathBuf};

use hostdb_common::network::hostname::strip_mdns_suffix;
use hostdb_common::network::ip::parse_ip;
use hostdb_common::network::mac::canonicalize_mac;
use tracing::{debug, info};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::legacy::LegacyLine;
use crate::persist;
use crate::record::HostRecord;

/// What [`HostStore::add`] did with the new observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Folded into the existing record at this index.
    Merged(usize),
    /// Stored as a new record at this index.
    Appended(usize),
}

impl AddOutcome {
    pub fn index(self) -> usize {
        match self {
            AddOutcome::Merged(index) | AddOutcome::Appended(index) => index,
        }
    }
}

#[derive(Debug)]
pub struct HostStore {
    path: PathBuf,
    records: Vec<HostRecord>,
    /// Canonical MAC -> indices of the records holding it.
    mac_cache: HashMap<String, Vec<usize>>,
}

impl HostStore {
    /// Loads the database at `path`, or starts empty if the file does not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
            mac_cache: HashMap::new(),
        };
        if store.path.exists() {
            store.open()?;
        } else {
            debug!("{} does not exist yet, starting empty", store.path.display());
        }
        Ok(store)
    }

    /// (Re)loads the file, discarding every unsaved change.
    ///
    /// On failure the in-memory records are left as they were.
    pub fn open(&mut self) -> StoreResult<()> {
        let bytes: Vec<u8> = std::fs::read(&self.path)?;
        let records: Vec<HostRecord> = codec::decode_database(&bytes)?;
        info!("loaded {} records from {}", records.len(), self.path.display());
        self.records = records;
        self.mac_cache.clear();
        Ok(())
    }

    /// Atomically writes the database back to its file.
    pub fn save(&self, sort: bool) -> StoreResult<()> {
        let bytes: Vec<u8> = codec::encode_database(&self.records, sort)?;
        persist::write_atomic(&self.path, &bytes)?;
        info!("saved {} records to {}", self.records.len(), self.path.display());
        Ok(())
    }

    /// Saves to `path`; later saves go there too.
    pub fn save_as(&mut self, path: impl Into<PathBuf>, sort: bool) -> StoreResult<()> {
        self.path = path.into();
        self.save(sort)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HostRecord> {
        self.records.get(index)
    }

    /// Mutable access for annotation edits. The MAC cache is dropped since
    /// the caller may change MACs.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut HostRecord> {
        self.mac_cache.clear();
        self.records.get_mut(index)
    }

    /// Records in `range`, clamped to the store like a slice expression.
    pub fn get_range(&self, range: Range<usize>) -> &[HostRecord] {
        let end: usize = range.end.min(self.records.len());
        let start: usize = range.start.min(end);
        &self.records[start..end]
    }

    pub fn get_many(&self, indices: &[usize]) -> Vec<&HostRecord> {
        indices.iter().filter_map(|&index| self.records.get(index)).collect()
    }

    pub fn remove(&mut self, index: usize) -> StoreResult<HostRecord> {
        self.check_index(index)?;
        self.mac_cache.clear();
        Ok(self.records.remove(index))
    }

    /// Removes several records at once, returned in ascending index order.
    ///
    /// Duplicates collapse. Removal runs from the highest index down so
    /// earlier removals never shift later targets.
    pub fn remove_many(&mut self, indices: impl IntoIterator<Item = usize>) -> StoreResult<Vec<HostRecord>> {
        let unique: BTreeSet<usize> = indices.into_iter().collect();
        for &index in &unique {
            self.check_index(index)?;
        }

        self.mac_cache.clear();
        let mut removed: Vec<HostRecord> = unique
            .iter()
            .rev()
            .map(|&index| self.records.remove(index))
            .collect();
        removed.reverse();
        Ok(removed)
    }

    /// Indices of the records holding `mac` (any accepted spelling).
    pub fn find_indices_by_mac(&mut self, mac: &str) -> StoreResult<Vec<usize>> {
        let canonical: String = canonicalize_mac(mac)?;
        if let Some(indices) = self.mac_cache.get(&canonical) {
            return Ok(indices.clone());
        }

        let indices: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.has_mac(&canonical))
            .map(|(index, _)| index)
            .collect();
        self.mac_cache.insert(canonical, indices.clone());
        Ok(indices)
    }

    /// Indices of records with `hostname` (case-insensitive); with `fuzz`, also
    /// records whose hostnames only differ by a `-<n>` suffix.
    pub fn find_indices_by_hostname(&self, hostname: &str, fuzz: bool) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.matches_hostname(hostname, fuzz))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn find_indices_by_ip(&self, ip: IpAddr) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.ips.contains(&ip))
            .map(|(index, _)| index)
            .collect()
    }

    /// Like [`HostStore::find_indices_by_ip`] for a textual address.
    pub fn find_indices_by_ip_str(&self, text: &str) -> StoreResult<Vec<usize>> {
        Ok(self.find_indices_by_ip(parse_ip(text)?))
    }

    /// Records matching `key` as an exact hostname, as a MAC or as an IP.
    ///
    /// Keys that are not a valid MAC or IP simply do not match those.
    pub fn lookup(&mut self, key: &str) -> Vec<usize> {
        let mut matches: BTreeSet<usize> = self.find_indices_by_hostname(key, false).into_iter().collect();
        if let Ok(indices) = self.find_indices_by_mac(key) {
            matches.extend(indices);
        }
        if let Ok(indices) = self.find_indices_by_ip_str(key) {
            matches.extend(indices);
        }
        matches.into_iter().collect()
    }

    /// Records one (ip, hostname, mac) observation.
    ///
    /// A trailing `.local` is dropped from `hostname`. If a record already
    /// holds `mac` and one of its hostnames is fuzzy-equivalent to
    /// `hostname`, the observation is folded into it; otherwise a new record
    /// is appended. A known MAC under an unrelated hostname is appended as
    /// well and left for an explicit [`HostStore::merge`].
    pub fn add<I, S>(&mut self, ip: IpAddr, hostname: &str, mac: &str, comments: I) -> StoreResult<AddOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hostname: &str = strip_mdns_suffix(hostname);
        let mac: String = canonicalize_mac(mac)?;
        let observation = HostRecord::from_sighting(ip, hostname, &mac, comments);

        let existing: Vec<usize> = self.find_indices_by_mac(&mac)?;
        let target: Option<usize> = existing
            .into_iter()
            .find(|&index| self.records[index].matches_hostname(hostname, true));

        let outcome = match target {
            Some(index) => {
                self.records[index].absorb(observation);
                AddOutcome::Merged(index)
            }
            None => {
                self.records.push(observation);
                AddOutcome::Appended(self.records.len() - 1)
            }
        };

        self.mac_cache.remove(&mac);
        debug!(%mac, hostname, ?outcome, "recorded sighting");
        Ok(outcome)
    }

    /// Replaces the records at `indices` by their union, appended at the end.
    ///
    /// Returns the index of the merged record.
    pub fn merge(&mut self, indices: impl IntoIterator<Item = usize>) -> StoreResult<usize> {
        let unique: BTreeSet<usize> = indices.into_iter().collect();
        if unique.is_empty() {
            return Err(StoreError::NothingToMerge);
        }

        let mut merged = HostRecord::default();
        for record in self.remove_many(unique.iter().copied())? {
            merged.absorb(record);
        }
        self.records.push(merged);

        // Every index after the first removed one has shifted.
        self.mac_cache.clear();
        debug!(merged = ?unique, "merged records");
        Ok(self.records.len() - 1)
    }

    /// Imports one tab-separated line of the old text format,
    /// `<ip>\t<hostname>\t<mac>[\t<mac>...]` with an optional `#comment` in
    /// the last field. Every MAC is added separately. A line with any bad MAC
    /// is rejected before anything is added.
    pub fn add_from_legacy_line(&mut self, line: &str) -> StoreResult<Vec<AddOutcome>> {
        let parsed: LegacyLine<'_> = LegacyLine::parse(line)?;
        parsed
            .macs
            .iter()
            .map(|mac| self.add(parsed.ip, parsed.hostname, mac, parsed.comment.clone()))
            .collect()
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a HostStore {
    type Item = &'a HostRecord;
    type IntoIter = std::slice::Iter<'a, HostRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
