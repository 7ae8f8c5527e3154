//! Hostname comparison rules.
//!
//! mDNS responders resolve name collisions by appending `-<n>` (RFC 6762
//! section 9), so `Android` and `Android-10` usually refer to the same device.

const MDNS_SUFFIX: &str = ".local";
const MDNS_SUFFIX_FQDN: &str = ".local.";

/// Returns `true` when two hostnames only differ by a numeric `-<n>` suffix,
/// compared case-insensitively.
pub fn hostnames_equivalent(one: &str, two: &str) -> bool {
    base_name(one).to_lowercase() == base_name(two).to_lowercase()
}

/// Strips a trailing `-<digits>` disambiguator.
///
/// A non-numeric suffix is part of the name and is kept.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((base, suffix)) if is_decimal(suffix) => base,
        _ => name,
    }
}

/// Removes one trailing `.local` (or the FQDN form `.local.`). Any other
/// name, including one with a bare trailing dot, is returned unchanged.
pub fn strip_mdns_suffix(name: &str) -> &str {
    name.strip_suffix(MDNS_SUFFIX_FQDN)
        .or_else(|| name.strip_suffix(MDNS_SUFFIX))
        .unwrap_or(name)
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
