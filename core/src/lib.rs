//! # Host Identity Store
//!
//! A file-backed list of device records. Each record gathers the MAC
//! addresses, IP addresses, hostnames and comments believed to belong to one
//! physical device; [`store::HostStore`] keeps them in order, deduplicates new
//! sightings with the fuzzy hostname rule and persists them atomically.

pub mod clashes;
pub mod codec;
pub mod error;
pub mod legacy;
pub mod persist;
pub mod record;
pub mod store;
pub mod vendors;

pub use error::{StoreError, StoreResult};
pub use record::HostRecord;
pub use store::{AddOutcome, HostStore};
