mod dispatch;
mod dry_run;
mod error;
pub mod facts;
pub mod mask;
pub mod reconcile;
mod traits;

pub use dispatch::{dispatch, Outcome};
pub use dry_run::DryRun;
pub use error::Error;
pub use facts::{FactSet, Reason};
pub use ipnet;
pub use traits::LinkControl;

use ipnet::IpNet;
use log::{debug, error};
use std::fmt;
use std::net::IpAddr;

pub mod sys;

/// Address family scope of a flush or an address listing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Family {
    V4,
    V6,
    All,
}

impl Family {
    pub fn contains(&self, network: &IpNet) -> bool {
        match (self, network) {
            (Family::All, _) => true,
            (Family::V4, IpNet::V4(_)) => true,
            (Family::V6, IpNet::V6(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::V4 => "v4",
            Family::V6 => "v6",
            Family::All => "all",
        })
    }
}

/// Address bound to an interface, as listed by the kernel.
///
/// `peer` is the remote end of a point-to-point IPv4 address. The kernel
/// needs it back to match the entry on removal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Address {
    network: IpNet,
    peer: Option<IpAddr>,
}

impl Address {
    pub fn with_peer(network: IpNet, peer: IpAddr) -> Self {
        Self {
            network,
            peer: Some(peer),
        }
    }

    pub fn network(&self) -> IpNet {
        self.network
    }

    pub fn peer(&self) -> Option<IpAddr> {
        self.peer
    }
}

impl From<IpNet> for Address {
    fn from(network: IpNet) -> Self {
        Self {
            network,
            peer: None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peer {
            Some(peer) => write!(f, "{} peer {}", self.network, peer),
            None => write!(f, "{}", self.network),
        }
    }
}

/// Resolved kernel interface.
///
/// Obtained once per lease event with [`Interface::resolve`] and used for every
/// address and link operation of that event.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Interface {
    name: String,
    index: u32,
}

impl Interface {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Returns the interface with the given name or [`Error::InterfaceNotFound`].
    pub fn resolve<K: LinkControl>(name: &str, kernel: &K) -> Result<Self, Error> {
        match kernel.link_index(name) {
            Ok(Some(index)) => {
                debug!("resolved interface={name} index={index}");
                Ok(Self::new(name, index))
            }
            Ok(None) => {
                error!("link lookup failed interface={name} error=\"no such interface\"");
                Err(Error::InterfaceNotFound(name.to_string()))
            }
            Err(e) => {
                error!("link lookup failed interface={name} error=\"{e}\"");
                Err(Error::Io(e))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Brings the interface administratively up.
    pub fn set_up<K: LinkControl>(&self, kernel: &K) -> Result<(), Error> {
        match kernel.set_link_up(self) {
            Ok(()) => {
                debug!("interface up interface={}", self.name);
                Ok(())
            }
            Err(source) => {
                error!("link set up failed interface={} error=\"{source}\"", self.name);
                Err(Error::InterfaceConfigFailed {
                    operation: "link set up",
                    interface: self.name.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
