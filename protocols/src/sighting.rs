use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Which kind of packet a sighting was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SightingSource {
    #[serde(rename = "DHCP")]
    Dhcp,
    #[serde(rename = "mDNS A")]
    MdnsA,
    #[serde(rename = "mDNS AAAA")]
    MdnsAaaa,
    #[serde(rename = "mDNS PTR")]
    MdnsPtr,
}

/// One observation of a device on the wire. Written as one JSON object per
/// line, absent fields omitted:
///
/// ```json
/// {"ip":"10.0.0.5","hostname":"Printer","mac":"aa:bb:cc:dd:ee:ff","source":"DHCP"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sighting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub source: SightingSource,
}

impl Sighting {
    /// The `(ip, hostname, mac)` triple needed to record the sighting, if complete.
    pub fn identity(&self) -> Option<(IpAddr, &str, &str)> {
        match (&self.ip, &self.hostname, &self.mac) {
            (Some(ip), Some(hostname), Some(mac)) => Some((*ip, hostname.as_str(), mac.as_str())),
            _ => None,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}
