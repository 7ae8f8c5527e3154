//! Parser for the tab-separated format the database used before JSON.
//!
//! ```text
//! <ip>\t<hostname>\t<mac1>[\t<mac2>...]
//! ```
//!
//! The last field may end with ` #<comment>`.

use std::net::IpAddr;

use hostdb_common::network::ip::parse_ip;
use hostdb_common::network::mac::canonicalize_mac;

use crate::error::{StoreError, StoreResult};

const FIELD_SEPARATOR: char = '\t';
const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyLine<'a> {
    pub ip: IpAddr,
    pub hostname: &'a str,
    /// Canonical MACs, in line order. A line with any bad MAC does not parse.
    pub macs: Vec<String>,
    pub comment: Option<String>,
}

impl<'a> LegacyLine<'a> {
    pub fn parse(line: &'a str) -> StoreResult<Self> {
        let mut fields: Vec<&'a str> = line.trim().split(FIELD_SEPARATOR).collect();
        if fields.len() < 3 {
            return Err(StoreError::CorruptData(format!(
                "legacy line needs an IP, a hostname and at least one MAC: '{}'",
                line.trim()
            )));
        }

        let mut comment: Option<String> = None;
        let last_idx: usize = fields.len() - 1;
        let last: &'a str = fields[last_idx];
        if let Some((mac_part, comment_part)) = last.split_once(COMMENT_MARKER) {
            let text = comment_part.trim();
            if !text.is_empty() {
                comment = Some(text.to_string());
            }
            fields[last_idx] = mac_part.trim();
        }

        let ip: IpAddr = parse_ip(fields[0])?;
        let macs: Vec<String> = fields[2..]
            .iter()
            .map(|field| canonicalize_mac(field))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            ip,
            hostname: fields[1],
            macs,
            comment,
        })
    }
}
