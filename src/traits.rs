use crate::{Address, Family, Interface};
use ipnet::IpNet;
use std::io;

/// Kernel operations the hook needs from a link/address backend.
///
/// Every method is blocking and reports kernel failures as plain I/O errors;
/// callers attach interface and address context.
pub trait LinkControl {
    /// Looks up an interface index by name. `Ok(None)` means no such interface.
    fn link_index(&self, name: &str) -> io::Result<Option<u32>>;

    fn set_link_up(&self, interface: &Interface) -> io::Result<()>;
    fn set_link_mtu(&self, interface: &Interface, mtu: u32) -> io::Result<()>;

    fn addresses(&self, interface: &Interface, family: Family) -> io::Result<Vec<Address>>;
    fn add_address(&self, interface: &Interface, network: IpNet) -> io::Result<()>;
    fn remove_address(&self, interface: &Interface, address: &Address) -> io::Result<()>;
}
