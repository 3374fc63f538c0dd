use ipnet::AddrParseError;
use std::io;
use std::num::ParseIntError;
use thiserror::Error as ThisError;

#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("required fact {0:?} is missing")]
    MissingFact(&'static str),
    #[error("interface {0:?} not found")]
    InterfaceNotFound(String),
    #[error("invalid subnet mask {0:?}")]
    InvalidMask(String),
    #[error("invalid address {spec:?}: {source}")]
    InvalidAddressSpec {
        spec: String,
        #[source]
        source: AddrParseError,
    },
    #[error("invalid MTU {value:?}: {source}")]
    InvalidMtu {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("{operation} failed on {interface} (address {address}): {source}")]
    AddressOperationFailed {
        operation: &'static str,
        interface: String,
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("{operation} failed on {interface}: {source}")]
    InterfaceConfigFailed {
        operation: &'static str,
        interface: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
