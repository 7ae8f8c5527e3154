use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use hostdb_core::HostStore;
use tempfile::TempDir;

pub fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// A scratch directory with the path of a database that does not exist yet.
pub fn scratch_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hosts.json");
    (dir, path)
}

pub fn no_comments() -> Vec<String> {
    Vec::new()
}

/// Three devices, the first seen twice under a renamed hostname.
pub fn populated_store(path: PathBuf) -> HostStore {
    let mut store = HostStore::new(path).unwrap();
    store.add(v4(10, 0, 0, 5), "Printer.local", "AA:BB:CC:DD:EE:FF", no_comments()).unwrap();
    store.add(v4(10, 0, 0, 6), "nas", "00:11:22:33:44:55", ["rack"]).unwrap();
    store.add("2001:db8::5".parse().unwrap(), "Printer-2", "aa-bb-cc-dd-ee-ff", no_comments()).unwrap();
    store.add(v4(10, 0, 0, 9), "tv", "66:77:88:99:aa:bb", no_comments()).unwrap();
    store
}

/// Names in the directory other than the database and its lock file.
pub fn stray_files(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "hosts.json" && name != "hosts.json.lock")
        .collect()
}
