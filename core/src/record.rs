use std::collections::HashSet;
use std::net::IpAddr;

use hostdb_common::network::hostname;

/// Everything known about one (believed) physical device.
///
/// The sets are never optional, any of them may be empty. Hostnames keep
/// their original case; comparisons are done case-insensitively.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub ips: HashSet<IpAddr>,
    pub hostnames: HashSet<String>,
    /// Canonical `aa:bb:cc:dd:ee:ff` strings.
    pub macs: HashSet<String>,
    pub comments: HashSet<String>,
}

impl HostRecord {
    /// Builds a record holding exactly one observation.
    ///
    /// `mac` is expected to be canonical already.
    pub fn from_sighting<I, S>(ip: IpAddr, hostname: &str, mac: &str, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ips: HashSet::from([ip]),
            hostnames: HashSet::from([hostname.to_string()]),
            macs: HashSet::from([mac.to_string()]),
            comments: comments.into_iter().map(Into::into).collect(),
        }
    }

    /// Unions every set of `other` into `self`.
    pub fn absorb(&mut self, other: HostRecord) {
        self.ips.extend(other.ips);
        self.hostnames.extend(other.hostnames);
        self.macs.extend(other.macs);
        self.comments.extend(other.comments);
    }

    /// A record must carry at least one MAC, IP or hostname to identify a device.
    pub fn has_identity(&self) -> bool {
        !(self.macs.is_empty() && self.ips.is_empty() && self.hostnames.is_empty())
    }

    pub fn has_mac(&self, mac: &str) -> bool {
        self.macs.contains(mac)
    }

    /// Case-insensitive hostname match, optionally extended with the
    /// `-<n>` suffix rule.
    pub fn matches_hostname(&self, name: &str, fuzz: bool) -> bool {
        let wanted = name.to_lowercase();
        self.hostnames.iter().any(|own| {
            own.to_lowercase() == wanted || (fuzz && hostname::hostnames_equivalent(name, own))
        })
    }

    /// Prefers the lowest IPv4 address, then the lowest IPv6 address.
    pub fn primary_ip(&self) -> Option<IpAddr> {
        self.ips.iter().min().copied()
    }

    pub fn has_comment(&self, comment: &str) -> bool {
        self.comments.contains(comment)
    }
}
