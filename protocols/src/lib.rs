//! Decoders for the broadcast traffic that reveals device identities:
//! DHCP requests (client MAC, hostname, requested address) and mDNS / LLMNR
//! answers (hostname to address mappings).
//!
//! Each decoder turns a UDP payload into [`sighting::Sighting`]s.

pub mod arpa;
pub mod dhcp;
pub mod frame;
pub mod mdns;
pub mod sighting;
