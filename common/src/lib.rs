//! Shared building blocks for the host identity database.
//!
//! Everything in here is pure: canonical forms for MAC addresses, the fuzzy
//! hostname rule, the `IP4/` / `IP6/` address encoding and the runtime
//! configuration handed around by the binary.

pub mod config;
pub mod error;
pub mod network;

pub use error::FormatError;
