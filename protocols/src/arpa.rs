//! Reverse-pointer names (`*.in-addr.arpa`, `*.ip6.arpa`) back to addresses.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const IPV4_ARPA: &str = ".in-addr.arpa";
const IPV6_ARPA: &str = ".ip6.arpa";

/// `4.3.2.1.in-addr.arpa` becomes `1.2.3.4`; a 32-nibble `ip6.arpa` name
/// becomes the matching IPv6 address. Any other name yields `None`.
pub fn reverse_pointer_to_ip(name: &str) -> Option<IpAddr> {
    let name: String = name.trim_end_matches('.').to_ascii_lowercase();

    if let Some(reversed) = name.strip_suffix(IPV4_ARPA) {
        let mut octets: Vec<&str> = reversed.split('.').collect();
        octets.reverse();
        return octets.join(".").parse::<Ipv4Addr>().ok().map(IpAddr::V4);
    }

    if let Some(reversed) = name.strip_suffix(IPV6_ARPA) {
        let mut nibbles: Vec<&str> = reversed.split('.').collect();
        if nibbles.len() != 32 || nibbles.iter().any(|n| n.len() != 1) {
            return None;
        }
        nibbles.reverse();
        let groups: Vec<String> = nibbles.chunks(4).map(|group| group.concat()).collect();
        return groups.join(":").parse::<Ipv6Addr>().ok().map(IpAddr::V6);
    }

    None
}
