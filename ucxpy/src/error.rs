//! Crate error type.
use std::io;
use std::net::AddrParseError;
use std::result;
use thiserror::Error;
#[cfg(feature = "ucx")]
use crate::Status;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The text given for a remote peer is not an IPv4 or IPv6 literal.
    #[error("invalid IP address {input:?}")]
    AddressParse {
        input: String,
        #[source]
        source: AddrParseError,
    },

    /// Malformed `UCX_TLS` value.
    #[error("invalid transport list {0:?}")]
    InvalidTransports(String),

    #[error("no network interface named {0:?}")]
    InterfaceNotFound(String),

    #[error("network interface {0:?} has no IP address")]
    NoInterfaceAddress(String),

    /// UCX option names and values are handed to C and may not contain NUL.
    #[error("UCX option {key:?} contains a NUL byte")]
    InvalidOption { key: String },

    #[error(transparent)]
    Nix(#[from] nix::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "ucx")]
    #[error("UCX error: {0}")]
    Ucx(Status),
}

#[cfg(feature = "ucx")]
impl From<Status> for Error {
    #[inline]
    fn from(status: Status) -> Error {
        Error::Ucx(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn address_parse_keeps_input_and_source() {
        let source = "not-an-ip".parse::<std::net::IpAddr>().unwrap_err();
        let err = Error::AddressParse {
            input: "not-an-ip".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "invalid IP address \"not-an-ip\"");
        assert!(err.source().is_some());
    }
}
