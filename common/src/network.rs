pub mod hostname;
pub mod ip;
pub mod mac;
