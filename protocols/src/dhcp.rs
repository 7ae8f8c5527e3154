//! DHCP (BOOTP) payload decoding.
//!
//! Clients broadcast DISCOVER and REQUEST messages carrying their hardware
//! address, usually their hostname (option 12) and the address they want
//! (option 50). Together these identify a device.

use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, ensure};
use pnet::util::MacAddr;

use crate::sighting::{Sighting, SightingSource};

pub const BOOTP_HDR_LEN: usize = 236;
pub const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const CHADDR_OFFSET: usize = 28;

const OPT_PAD: u8 = 0;
const OPT_HOSTNAME: u8 = 12;
const OPT_REQUESTED_ADDR: u8 = 50;
const OPT_MESSAGE_TYPE: u8 = 53;
const OPT_END: u8 = 255;

const DHCP_DISCOVER: u8 = 1;
const DHCP_REQUEST: u8 = 3;

#[derive(Debug, Default, PartialEq, Eq)]
struct ClientOptions {
    message_type: Option<u8>,
    hostname: Option<String>,
    requested_addr: Option<Ipv4Addr>,
}

/// Decodes a DHCP payload. Returns `Ok(None)` for messages that are not a
/// DISCOVER/REQUEST or that lack the hostname or requested address.
pub fn extract_sighting(payload: &[u8]) -> anyhow::Result<Option<Sighting>> {
    ensure!(
        payload.len() >= BOOTP_HDR_LEN + MAGIC_COOKIE.len(),
        "DHCP payload too short: {} bytes",
        payload.len()
    );
    ensure!(
        payload[BOOTP_HDR_LEN..BOOTP_HDR_LEN + MAGIC_COOKIE.len()] == MAGIC_COOKIE,
        "missing DHCP magic cookie"
    );

    let options = parse_options(&payload[BOOTP_HDR_LEN + MAGIC_COOKIE.len()..])?;
    if !matches!(options.message_type, Some(DHCP_DISCOVER | DHCP_REQUEST)) {
        return Ok(None);
    }

    let (Some(hostname), Some(requested_addr)) = (options.hostname, options.requested_addr) else {
        return Ok(None);
    };

    let chaddr = &payload[CHADDR_OFFSET..CHADDR_OFFSET + 6];
    let mac = MacAddr::new(chaddr[0], chaddr[1], chaddr[2], chaddr[3], chaddr[4], chaddr[5]);

    Ok(Some(Sighting {
        ip: Some(IpAddr::V4(requested_addr)),
        hostname: Some(hostname),
        mac: Some(mac.to_string()),
        source: SightingSource::Dhcp,
    }))
}

fn parse_options(mut options: &[u8]) -> anyhow::Result<ClientOptions> {
    let mut parsed = ClientOptions::default();

    while let Some((&code, rest)) = options.split_first() {
        match code {
            OPT_END => break,
            OPT_PAD => {
                options = rest;
                continue;
            }
            _ => {}
        }

        let (&len, rest) = rest.split_first().context("truncated DHCP option length")?;
        let len = len as usize;
        ensure!(rest.len() >= len, "DHCP option {code} overruns the payload");
        let (value, rest) = rest.split_at(len);

        match code {
            OPT_MESSAGE_TYPE => parsed.message_type = value.first().copied(),
            OPT_HOSTNAME => {
                let hostname = std::str::from_utf8(value).context("hostname is not UTF-8")?;
                parsed.hostname = Some(hostname.trim_end_matches('\0').to_string());
            }
            OPT_REQUESTED_ADDR => {
                if let Ok(octets) = <[u8; 4]>::try_from(value) {
                    parsed.requested_addr = Some(Ipv4Addr::from(octets));
                }
            }
            _ => {}
        }
        options = rest;
    }

    Ok(parsed)
}
