use crate::terminal::colors;
use colored::*;
use hostdb_core::HostRecord;
use hostdb_core::vendors::{VendorRepository, vendors_of_record};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv6Addr};

type Detail = (String, ColoredString);

const NO_HOSTNAME: &str = "<no hostname>";

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(ipv6_addr) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    "IPv6"
}

// 2000::/3
fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn ip_to_key_value_pair(ips: &BTreeSet<IpAddr>) -> Vec<Detail> {
    ips.iter()
        .map(|ip| match ip {
            IpAddr::V4(ipv4_addr) => {
                let value = ipv4_addr.to_string().color(colors::IPV4_ADDR);
                (String::from("IPv4"), value)
            }
            IpAddr::V6(ipv6_addr) => {
                let ipv6_type = ipv6_to_type_str(ipv6_addr);
                let ipv6_addr = ipv6_addr.to_string().color(colors::IPV6_ADDR);
                (String::from(ipv6_type), ipv6_addr)
            }
        })
        .collect()
}

/// All hostnames of a record, sorted case-insensitively and joined. Falls
/// back to the primary address for unnamed records.
pub fn display_name(record: &HostRecord) -> String {
    let mut names: Vec<&String> = record.hostnames.iter().collect();
    if names.is_empty() {
        return match record.primary_ip() {
            Some(ip) => format!("{NO_HOSTNAME} {ip}"),
            None => NO_HOSTNAME.to_string(),
        };
    }
    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    names.iter().map(|name| name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Tree lines for a record: addresses, MACs (with vendors if a repository
/// is given) and comments, each group sorted.
pub fn record_details(record: &HostRecord, vendors: Option<&dyn VendorRepository>) -> Vec<Detail> {
    let ips: BTreeSet<IpAddr> = record.ips.iter().copied().collect();
    let mut details: Vec<Detail> = ip_to_key_value_pair(&ips);

    match vendors {
        Some(repo) => {
            for (mac, vendor) in vendors_of_record(repo, record) {
                let vendor: String = vendor.unwrap_or_else(|| String::from("unknown vendor"));
                let value = format!("{} ({})", mac.color(colors::MAC_ADDR), vendor.color(colors::VENDOR));
                details.push((String::from("MAC"), value.normal()));
            }
        }
        None => {
            let macs: BTreeSet<&String> = record.macs.iter().collect();
            details.extend(macs.into_iter().map(|mac| (String::from("MAC"), mac.color(colors::MAC_ADDR))));
        }
    }

    let comments: BTreeSet<&String> = record.comments.iter().collect();
    details.extend(comments.into_iter().map(|text| (String::from("Note"), text.color(colors::COMMENT))));
    details
}
