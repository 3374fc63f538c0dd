#![allow(dead_code)]

use dhcphook::ipnet::IpNet;
use dhcphook::{Address, FactSet, Family, Interface, LinkControl};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    LinkIndex(String),
    SetUp(String),
    SetMtu(String, u32),
    List(String, Family),
    Add(String, IpNet),
    Remove(String, IpNet),
}

impl Call {
    fn is_change(&self) -> bool {
        !matches!(self, Call::LinkIndex(_) | Call::List(..))
    }
}

/// In-memory link table that records every kernel call.
#[derive(Default)]
pub struct FakeKernel {
    links: HashMap<String, u32>,
    addresses: RefCell<Vec<Address>>,
    calls: RefCell<Vec<Call>>,
    pub fail_remove: Option<IpNet>,
    pub fail_list: bool,
    pub fail_up: bool,
    pub reject_mtu: bool,
}

impl FakeKernel {
    pub fn with_link(name: &str, index: u32) -> Self {
        let mut kernel = Self::default();
        kernel.links.insert(name.to_string(), index);
        kernel
    }

    pub fn with_addresses(self, addresses: &[&str]) -> Self {
        self.addresses
            .borrow_mut()
            .extend(addresses.iter().map(|a| Address::from(net(a))));
        self
    }

    pub fn with_point_to_point(self, address: &str, peer: &str) -> Self {
        self.addresses
            .borrow_mut()
            .push(Address::with_peer(net(address), peer.parse().unwrap()));
        self
    }

    pub fn addresses(&self) -> Vec<IpNet> {
        self.addresses.borrow().iter().map(Address::network).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls that would change kernel state.
    pub fn changes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_change).collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl LinkControl for FakeKernel {
    fn link_index(&self, name: &str) -> io::Result<Option<u32>> {
        self.record(Call::LinkIndex(name.to_string()));
        Ok(self.links.get(name).copied())
    }

    fn set_link_up(&self, interface: &Interface) -> io::Result<()> {
        self.record(Call::SetUp(interface.name().to_string()));
        if self.fail_up {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Operation not permitted",
            ));
        }
        Ok(())
    }

    fn set_link_mtu(&self, interface: &Interface, mtu: u32) -> io::Result<()> {
        self.record(Call::SetMtu(interface.name().to_string(), mtu));
        if self.reject_mtu {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Invalid argument",
            ));
        }
        Ok(())
    }

    fn addresses(&self, interface: &Interface, family: Family) -> io::Result<Vec<Address>> {
        self.record(Call::List(interface.name().to_string(), family));
        if self.fail_list {
            return Err(io::Error::new(io::ErrorKind::Other, "No buffer space available"));
        }
        Ok(self
            .addresses
            .borrow()
            .iter()
            .filter(|a| family.contains(&a.network()))
            .copied()
            .collect())
    }

    fn add_address(&self, interface: &Interface, network: IpNet) -> io::Result<()> {
        self.record(Call::Add(interface.name().to_string(), network));
        let mut addresses = self.addresses.borrow_mut();
        if addresses.iter().any(|a| a.network().addr() == network.addr()) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "File exists"));
        }
        addresses.push(Address::from(network));
        Ok(())
    }

    /// Matches on address and peer like the kernel does.
    fn remove_address(&self, interface: &Interface, address: &Address) -> io::Result<()> {
        let network = address.network();
        self.record(Call::Remove(interface.name().to_string(), network));
        if self.fail_remove == Some(network) {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "Cannot assign requested address",
            ));
        }
        let mut addresses = self.addresses.borrow_mut();
        match addresses.iter().position(|a| a == address) {
            Some(position) => {
                addresses.remove(position);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "Cannot assign requested address",
            )),
        }
    }
}

pub fn net(s: &str) -> IpNet {
    s.parse().unwrap()
}

pub fn facts(pairs: &[(&str, &str)]) -> FactSet {
    FactSet::new(pairs.iter().copied()).unwrap()
}
