use crate::{Address, Family, Interface, LinkControl};
use ipnet::IpNet;
use log::info;
use std::io;

/// Backend that reads from `K` but only logs the changes it would make.
#[derive(Debug, Default)]
pub struct DryRun<K>(pub K);

impl<K: LinkControl> LinkControl for DryRun<K> {
    fn link_index(&self, name: &str) -> io::Result<Option<u32>> {
        self.0.link_index(name)
    }

    fn set_link_up(&self, interface: &Interface) -> io::Result<()> {
        info!("dry run: would set link up interface={interface}");
        Ok(())
    }

    fn set_link_mtu(&self, interface: &Interface, mtu: u32) -> io::Result<()> {
        info!("dry run: would set MTU interface={interface} mtu={mtu}");
        Ok(())
    }

    fn addresses(&self, interface: &Interface, family: Family) -> io::Result<Vec<Address>> {
        self.0.addresses(interface, family)
    }

    fn add_address(&self, interface: &Interface, network: IpNet) -> io::Result<()> {
        info!("dry run: would add address interface={interface} address={network}");
        Ok(())
    }

    fn remove_address(&self, interface: &Interface, address: &Address) -> io::Result<()> {
        info!("dry run: would delete address interface={interface} address={address}");
        Ok(())
    }
}
