use thiserror::Error;

/// Raised when a MAC address or an IP address cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("'{0}' does not appear to be a MAC address")]
    Mac(String),

    #[error("'{0}' does not appear to be an IP address")]
    Ip(String),

    #[error("expecting an IP address with a IP4/ or IP6/ prefix, got '{0}'")]
    IpPrefix(String),
}
