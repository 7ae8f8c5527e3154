//! Textual IP address encoding used by the on-disk database.
//!
//! Addresses are stored as `IP4/<addr>` or `IP6/<addr>`; no other form is
//! accepted when loading.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::FormatError;

pub const IPV4_PREFIX: &str = "IP4/";
pub const IPV6_PREFIX: &str = "IP6/";

pub fn encode_ip(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(ipv4_addr) => format!("{IPV4_PREFIX}{ipv4_addr}"),
        IpAddr::V6(ipv6_addr) => format!("{IPV6_PREFIX}{ipv6_addr}"),
    }
}

pub fn decode_ip(encoded: &str) -> Result<IpAddr, FormatError> {
    if let Some(addr) = encoded.strip_prefix(IPV4_PREFIX) {
        return addr
            .parse::<Ipv4Addr>()
            .map(IpAddr::V4)
            .map_err(|_| FormatError::Ip(addr.to_string()));
    }
    if let Some(addr) = encoded.strip_prefix(IPV6_PREFIX) {
        return addr
            .parse::<Ipv6Addr>()
            .map(IpAddr::V6)
            .map_err(|_| FormatError::Ip(addr.to_string()));
    }
    Err(FormatError::IpPrefix(encoded.to_string()))
}

/// Parses a plain textual address such as `10.0.0.5` or `2001:db8::1`.
pub fn parse_ip(text: &str) -> Result<IpAddr, FormatError> {
    text.trim()
        .parse::<IpAddr>()
        .map_err(|_| FormatError::Ip(text.to_string()))
}
