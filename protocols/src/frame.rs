//! # Frame Dispatch
//!
//! Walks captured Ethernet frames down to UDP and hands the payload to the
//! decoder registered for its port. Frames that are not UDP, or that fail to
//! decode, produce no sightings.

use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::udp::UdpPacket;
use tracing::trace;

use crate::sighting::Sighting;
use crate::{dhcp, mdns};

pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;
pub const MDNS_PORT: u16 = 5353;
pub const LLMNR_PORT: u16 = 5355;

pub fn decode_frame(frame: &[u8]) -> Vec<Sighting> {
    let Some(eth) = EthernetPacket::new(frame) else {
        return Vec::new();
    };

    match eth.get_ethertype() {
        EtherTypes::Ipv4 => {
            let Some(ip) = Ipv4Packet::new(eth.payload()) else {
                return Vec::new();
            };
            if ip.get_next_level_protocol() != IpNextHeaderProtocols::Udp {
                return Vec::new();
            }
            decode_udp_packet(ip.payload())
        }
        EtherTypes::Ipv6 => {
            let Some(ip) = Ipv6Packet::new(eth.payload()) else {
                return Vec::new();
            };
            if ip.get_next_header() != IpNextHeaderProtocols::Udp {
                return Vec::new();
            }
            decode_udp_packet(ip.payload())
        }
        _ => Vec::new(),
    }
}

fn decode_udp_packet(bytes: &[u8]) -> Vec<Sighting> {
    match UdpPacket::new(bytes) {
        Some(udp) => decode_udp(udp.get_source(), udp.get_destination(), udp.payload()),
        None => Vec::new(),
    }
}

/// Dispatches a UDP payload on its ports.
pub fn decode_udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<Sighting> {
    let is_port = |port: u16| src_port == port || dst_port == port;

    if is_port(DHCP_SERVER_PORT) || is_port(DHCP_CLIENT_PORT) {
        return match dhcp::extract_sighting(payload) {
            Ok(sighting) => sighting.into_iter().collect(),
            Err(e) => {
                trace!("ignoring DHCP payload: {e:#}");
                Vec::new()
            }
        };
    }

    if is_port(MDNS_PORT) || is_port(LLMNR_PORT) {
        return mdns::extract_sightings(payload).unwrap_or_else(|e| {
            trace!("ignoring mDNS/LLMNR payload: {e:#}");
            Vec::new()
        });
    }

    Vec::new()
}
