use std::collections::HashSet;
use std::fs;

use hostdb_core::clashes::{self, MAC_MERGE_EXCEPTION};
use hostdb_core::{AddOutcome, HostStore, StoreError};
use serde_json::{Value, json};

use crate::util::{no_comments, populated_store, scratch_db, stray_files, v4};

#[test]
fn save_then_open_reproduces_records_in_order() {
    let (_dir, path) = scratch_db();
    let store = populated_store(path.clone());
    store.save(false).unwrap();

    let reopened = HostStore::new(&path).unwrap();
    assert_eq!(reopened.records(), store.records());
    assert_eq!(reopened.len(), 3);
    assert!(reopened.records()[0].hostnames.contains("Printer-2"));
    assert!(reopened.records()[1].has_comment("rack"));
}

#[test]
fn sorted_save_is_deterministic() {
    let (_dir, path) = scratch_db();
    let store = populated_store(path.clone());
    store.save(true).unwrap();
    let first = fs::read(&path).unwrap();

    HostStore::new(&path).unwrap().save(true).unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);

    let document: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(
        document[0],
        json!({
            "ips": ["IP4/10.0.0.5", "IP6/2001:db8::5"],
            "hostnames": ["Printer", "Printer-2"],
            "macs": ["aa:bb:cc:dd:ee:ff"],
            "comments": [],
        })
    );
}

#[test]
fn saving_leaves_no_temporary_files() {
    let (dir, path) = scratch_db();
    let mut store = populated_store(path);
    store.save(false).unwrap();
    store.add(v4(10, 0, 0, 10), "laptop", "12:34:56:78:9a:bc", no_comments()).unwrap();
    store.save(false).unwrap();

    assert!(stray_files(&dir).is_empty(), "left behind: {:?}", stray_files(&dir));
}

#[cfg(unix)]
#[test]
fn saving_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = scratch_db();
    let store = populated_store(path.clone());
    store.save(false).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
    store.save(false).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o600);
}

#[test]
fn corrupt_file_is_rejected_without_partial_state() {
    let (_dir, path) = scratch_db();
    let mut store = populated_store(path.clone());
    store.save(false).unwrap();

    let broken = json!([
        {"ips": ["IP4/10.0.0.1"], "hostnames": ["a"], "macs": [], "comments": []},
        {"ips": [], "hostnames": ["b"], "macs": []},
    ]);
    fs::write(&path, serde_json::to_vec(&broken).unwrap()).unwrap();

    assert!(matches!(HostStore::new(&path), Err(StoreError::CorruptData(_))));
    assert!(matches!(store.open(), Err(StoreError::CorruptData(_))));
    assert_eq!(store.len(), 3);
}

#[test]
fn bad_ip_encoding_is_a_format_error() {
    let (_dir, path) = scratch_db();
    let text = r#"[{"ips": ["10.0.0.1"], "hostnames": [], "macs": [], "comments": []}]"#;
    fs::write(&path, text).unwrap();
    assert!(matches!(HostStore::new(&path), Err(StoreError::Format(_))));
}

#[test]
fn legacy_file_import() {
    let (_dir, path) = scratch_db();
    let mut store = HostStore::new(path).unwrap();
    let lines = [
        "10.0.0.5\tPrinter\taa:bb:cc:dd:ee:ff #lobby",
        "10.0.0.7\tPrinter-3\tAA:BB:CC:DD:EE:FF",
        "10.0.0.8\tphone\t2-0-0-0-0-1\t02:00:00:00:00:02",
    ];

    let outcomes: Vec<AddOutcome> = lines
        .iter()
        .flat_map(|line| store.add_from_legacy_line(line).unwrap())
        .collect();

    assert_eq!(
        outcomes,
        vec![
            AddOutcome::Appended(0),
            AddOutcome::Merged(0),
            AddOutcome::Appended(1),
            AddOutcome::Appended(2),
        ]
    );
    assert_eq!(store.records()[0].ips, HashSet::from([v4(10, 0, 0, 5), v4(10, 0, 0, 7)]));
    assert!(store.records()[0].has_comment("lobby"));
    // Every MAC of a line is its own sighting.
    assert_eq!(store.records()[1].macs, HashSet::from(["02:00:00:00:00:01".to_string()]));
    assert_eq!(store.records()[2].macs, HashSet::from(["02:00:00:00:00:02".to_string()]));
    assert!(store.add_from_legacy_line("10.0.0.9\tlonely").is_err());

    let err = store.add_from_legacy_line("10.0.0.10\tnas\t02:00:00:00:00:03\tnot-a-mac").unwrap_err();
    assert!(matches!(err, StoreError::Format(_)));
    assert_eq!(store.len(), 3);
    assert!(store.find_indices_by_mac("02:00:00:00:00:03").unwrap().is_empty());
}

#[test]
fn merge_appends_union_last() {
    let (_dir, path) = scratch_db();
    let mut store = populated_store(path);
    let nas = store.records()[1].clone();
    let tv = store.records()[2].clone();

    let merged = store.merge([2, 0]).unwrap();
    assert_eq!(merged, 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0], nas);
    assert!(store.records()[1].hostnames.is_superset(&tv.hostnames));
    assert!(store.records()[1].hostnames.contains("Printer"));

    assert!(matches!(
        store.merge([0, 5]),
        Err(StoreError::IndexOutOfRange { index: 5, len: 2 })
    ));
    assert_eq!(store.len(), 2);
}

#[test]
fn automerge_only_takes_generated_names() {
    const SHARED_A: &str = "02:aa:00:00:00:01";
    const SHARED_B: &str = "02:bb:00:00:00:01";

    let (_dir, path) = scratch_db();
    let mut store = HostStore::new(path).unwrap();
    store.add(v4(10, 0, 1, 1), "0123456789abcdef0123456789abcdef", SHARED_A, no_comments()).unwrap();
    store.add(v4(10, 0, 1, 2), "fedcba9876543210fedcba9876543210", SHARED_A, no_comments()).unwrap();
    store.add(v4(10, 0, 1, 3), "kitchen-speaker", SHARED_B, no_comments()).unwrap();
    store.add(v4(10, 0, 1, 4), "living-room-tv", SHARED_B, no_comments()).unwrap();
    assert_eq!(store.len(), 4);

    let report = clashes::auto_merge_macs(&mut store, false).unwrap();
    assert_eq!(report.merged, vec![SHARED_A.to_string()]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].key, SHARED_B);
    assert_eq!(store.len(), 3);
    assert_eq!(store.records()[2].ips.len(), 2);

    let report = clashes::auto_merge_macs(&mut store, true).unwrap();
    assert_eq!(report.merged, vec![SHARED_B.to_string()]);
    assert_eq!(store.len(), 2);
    assert!(clashes::mac_clashes(store.records()).is_empty());
}

#[test]
fn merge_exception_survives_automerge() {
    const SHARED: &str = "02:cc:00:00:00:01";

    let (_dir, path) = scratch_db();
    let mut store = HostStore::new(path).unwrap();
    store.add(v4(10, 0, 2, 1), "0123456789abcdef0123456789abcdef", SHARED, no_comments()).unwrap();
    store.add(v4(10, 0, 2, 2), "fedcba9876543210fedcba9876543210", SHARED, [MAC_MERGE_EXCEPTION]).unwrap();

    let report = clashes::auto_merge_macs(&mut store, true).unwrap();
    assert!(report.merged.is_empty());
    assert_eq!(store.len(), 2);
}

#[test]
fn save_as_moves_later_saves() {
    let (dir, path) = scratch_db();
    let mut store = populated_store(path.clone());
    let copy = dir.path().join("copy.json");

    store.save_as(&copy, true).unwrap();
    assert_eq!(store.path(), copy.as_path());
    assert!(!path.exists());

    store.add(v4(10, 0, 0, 11), "printer-9", "aa:bb:cc:dd:ee:ff", no_comments()).unwrap();
    store.save(true).unwrap();
    let reopened = HostStore::new(&copy).unwrap();
    assert_eq!(reopened.len(), 3);
    assert!(reopened.records()[0].ips.contains(&v4(10, 0, 0, 11)));
}
