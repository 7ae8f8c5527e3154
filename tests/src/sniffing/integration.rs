use std::net::IpAddr;

use hostdb_core::{AddOutcome, HostStore};
use hostdb_protocols::dhcp::{BOOTP_HDR_LEN, MAGIC_COOKIE};
use hostdb_protocols::frame::{DHCP_CLIENT_PORT, DHCP_SERVER_PORT, MDNS_PORT, decode_udp};
use hostdb_protocols::sighting::{Sighting, SightingSource};

use crate::util::{no_comments, scratch_db, v4};

fn dhcp_request(mac: [u8; 6], hostname: &str, requested: [u8; 4]) -> Vec<u8> {
    let mut payload = vec![0u8; BOOTP_HDR_LEN];
    payload[0] = 1;
    payload[28..34].copy_from_slice(&mac);
    payload.extend_from_slice(&MAGIC_COOKIE);
    payload.extend_from_slice(&[53, 1, 3]);
    payload.extend_from_slice(&[12, hostname.len() as u8]);
    payload.extend_from_slice(hostname.as_bytes());
    payload.extend_from_slice(&[50, 4]);
    payload.extend_from_slice(&requested);
    payload.push(255);
    payload
}

#[test]
fn dhcp_sightings_reach_the_store() {
    let (_dir, path) = scratch_db();
    let mut store = HostStore::new(path).unwrap();

    let first = dhcp_request([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff], "Printer", [10, 0, 0, 5]);
    let second = dhcp_request([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff], "Printer-2", [10, 0, 0, 6]);

    let mut outcomes: Vec<AddOutcome> = Vec::new();
    for payload in [first, second] {
        // Through the same JSON lines `listen` prints and `ingest` reads.
        let lines: Vec<String> = decode_udp(DHCP_CLIENT_PORT, DHCP_SERVER_PORT, &payload)
            .iter()
            .map(|sighting| sighting.to_json_line().unwrap())
            .collect();
        assert_eq!(lines.len(), 1);

        let sighting = Sighting::from_json_line(&lines[0]).unwrap();
        assert_eq!(sighting.source, SightingSource::Dhcp);
        let (ip, hostname, mac) = sighting.identity().unwrap();
        outcomes.push(store.add(ip, hostname, mac, no_comments()).unwrap());
    }

    assert_eq!(outcomes, vec![AddOutcome::Appended(0), AddOutcome::Merged(0)]);
    let record = &store.records()[0];
    assert!(record.ips.contains(&v4(10, 0, 0, 5)) && record.ips.contains(&v4(10, 0, 0, 6)));
    assert!(record.has_mac("aa:bb:cc:dd:ee:ff"));
}

#[test]
fn mdns_sightings_are_incomplete() {
    // Response with one AAAA record for tv.local.
    let mut payload: Vec<u8> = vec![0, 0, 0x84, 0x00, 0, 0, 0, 1, 0, 0, 0, 0];
    payload.extend_from_slice(&[2, b't', b'v', 5, b'l', b'o', b'c', b'a', b'l', 0]);
    payload.extend_from_slice(&[0, 28, 0, 1, 0, 0, 0, 120, 0, 16]);
    payload.extend_from_slice(&[0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    let sightings = decode_udp(MDNS_PORT, MDNS_PORT, &payload);
    assert_eq!(sightings.len(), 1);
    assert_eq!(sightings[0].ip, Some("fe80::1".parse::<IpAddr>().unwrap()));
    assert_eq!(sightings[0].hostname.as_deref(), Some("tv"));
    assert_eq!(sightings[0].source, SightingSource::MdnsAaaa);
    assert!(sightings[0].identity().is_none());
}

#[test]
fn unrelated_ports_yield_nothing() {
    let payload = dhcp_request([2, 0, 0, 0, 0, 1], "phone", [10, 0, 0, 9]);
    assert!(decode_udp(53, 40000, &payload).is_empty());
}
