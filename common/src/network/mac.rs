//! # MAC Address Canonicalization
//!
//! Every MAC that enters the database goes through [`canonicalize_mac`], which
//! produces six lowercase, colon-separated hex pairs (`aa:bb:cc:dd:ee:ff`).
//!
//! Two input shapes are accepted:
//! * Anything whose alphanumeric characters form exactly 12 hex digits
//!   (`AA-BB-CC-DD-EE-FF`, `aabb.ccdd.eeff`, `AABBCCDDEEFF`, mixed separators).
//! * Exports that dropped leading zeros (`3-F3-e7-e9-39-73`). Here a single
//!   separator character must be used throughout, so each segment can be
//!   zero-padded back to `12 / segments` digits.

use pnet::util::MacAddr;

use crate::error::FormatError;

const MAC_DIGITS: usize = 12;

/// Converts `raw` to the canonical `aa:bb:cc:dd:ee:ff` form.
pub fn canonicalize_mac(raw: &str) -> Result<String, FormatError> {
    parse_mac(raw).map(|mac| mac.to_string())
}

/// Parses `raw` with the same rules as [`canonicalize_mac`].
pub fn parse_mac(raw: &str) -> Result<MacAddr, FormatError> {
    let invalid = || FormatError::Mac(raw.to_string());

    let alnums: String = raw.chars().filter(|ch| ch.is_alphanumeric()).collect();
    let digits: String = if alnums.chars().count() == MAC_DIGITS {
        alnums
    } else {
        pad_segments(raw).ok_or_else(invalid)?
    };

    let [a, b, c, d, e, f] = hex_to_octets(&digits).ok_or_else(invalid)?;
    Ok(MacAddr::new(a, b, c, d, e, f))
}

/// Returns `true` when `mac` is already in canonical form.
pub fn is_canonical(mac: &str) -> bool {
    canonicalize_mac(mac).is_ok_and(|canonical| canonical == mac)
}

/// Re-inserts the leading zeros a spreadsheet export stripped from each segment.
///
/// Mixed separators are rejected: without a single separator the segment
/// widths cannot be known.
fn pad_segments(raw: &str) -> Option<String> {
    let separators: Vec<char> = raw.chars().filter(|ch| !ch.is_alphanumeric()).collect();
    let separator: char = *separators.first()?;
    if separators.iter().any(|&ch| ch != separator) {
        return None;
    }

    let segments: usize = separators.len() + 1;
    if MAC_DIGITS % segments != 0 {
        return None;
    }
    let width: usize = MAC_DIGITS / segments;

    let padded: String = raw
        .split(separator)
        .map(|segment| format!("{segment:0>width$}"))
        .collect();

    (padded.chars().count() == MAC_DIGITS).then_some(padded)
}

fn hex_to_octets(digits: &str) -> Option<[u8; 6]> {
    if digits.len() != MAC_DIGITS || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut octets = [0u8; 6];
    for (idx, octet) in octets.iter_mut().enumerate() {
        *octet = u8::from_str_radix(&digits[idx * 2..idx * 2 + 2], 16).ok()?;
    }
    Some(octets)
}
