use std::sync::OnceLock;

use hostdb_common::network::mac::parse_mac;
use mac_oui::Oui;
use pnet::util::MacAddr;
use tracing::warn;

use crate::record::HostRecord;

/// Resolves device manufacturers from MAC addresses.
pub trait VendorRepository {
    /// Returns `None` when the OUI is unknown.
    fn vendor_of(&self, mac: MacAddr) -> Option<String>;
}

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("failed to load OUI database: {e}");
                None
            }
        })
        .as_ref()
}

/// Lookups against the OUI table bundled with `mac_oui`.
pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn vendor_of(&self, mac: MacAddr) -> Option<String> {
        let db: &Oui = get_oui_db()?;
        match db.lookup_by_mac(&mac.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            Ok(None) => None,
            Err(_) => None,
        }
    }
}

/// Every MAC of `record` paired with its vendor, sorted by MAC.
pub fn vendors_of_record(repo: &dyn VendorRepository, record: &HostRecord) -> Vec<(String, Option<String>)> {
    let mut macs: Vec<&String> = record.macs.iter().collect();
    macs.sort();
    macs.into_iter()
        .map(|mac| {
            let vendor = parse_mac(mac).ok().and_then(|parsed| repo.vendor_of(parsed));
            (mac.clone(), vendor)
        })
        .collect()
}
