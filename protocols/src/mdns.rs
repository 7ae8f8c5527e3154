use anyhow::{Context, Result};
use dns_parser::{Packet, RData, ResourceRecord};
use hostdb_common::network::hostname::strip_mdns_suffix;
use std::net::IpAddr;

use crate::arpa::reverse_pointer_to_ip;
use crate::sighting::{Sighting, SightingSource};

/// Service types whose PTR targets are `<device name>.<service type>`.
pub const NAMED_SERVICE_TYPES: &[&str] = &["_googlecast._tcp.local", "_companion-link._tcp.local"];

/// Decodes the answer section of an mDNS or LLMNR message.
pub fn extract_sightings(data: &[u8]) -> Result<Vec<Sighting>> {
    let packet = Packet::parse(data).context("failed to parse mDNS packet")?;
    Ok(packet.answers.iter().filter_map(answer_to_sighting).collect())
}

fn answer_to_sighting(record: &ResourceRecord) -> Option<Sighting> {
    let owner: String = record.name.to_string();

    match &record.data {
        RData::A(a) => Some(address_sighting(&owner, IpAddr::V4(a.0), SightingSource::MdnsA)),
        RData::AAAA(aaaa) => Some(address_sighting(&owner, IpAddr::V6(aaaa.0), SightingSource::MdnsAaaa)),
        RData::PTR(ptr) => pointer_sighting(&owner, &ptr.0.to_string()),
        _ => None,
    }
}

fn address_sighting(owner: &str, ip: IpAddr, source: SightingSource) -> Sighting {
    Sighting {
        ip: Some(ip),
        hostname: Some(strip_mdns_suffix(owner).to_string()),
        mac: None,
        source,
    }
}

fn pointer_sighting(owner: &str, target: &str) -> Option<Sighting> {
    let owner = owner.trim_end_matches('.');
    let target = target.trim_end_matches('.');

    for service in NAMED_SERVICE_TYPES {
        if owner == *service {
            let device = target.strip_suffix(service)?.strip_suffix('.')?;
            return Some(Sighting {
                ip: None,
                hostname: Some(device.to_string()),
                mac: None,
                source: SightingSource::MdnsPtr,
            });
        }
    }

    let ip: IpAddr = reverse_pointer_to_ip(owner)?;
    Some(Sighting {
        ip: Some(ip),
        hostname: Some(strip_mdns_suffix(target).to_string()),
        mac: None,
        source: SightingSource::MdnsPtr,
    })
}
