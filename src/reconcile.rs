//! Address and MTU reconciliation against a [`LinkControl`] backend.

use crate::{mask, Address, Error, Family, Interface, LinkControl};
use ipnet::IpNet;
use log::{debug, error};

/// Removes every address of `family` from `interface`.
///
/// Stops at the first removal the kernel rejects. Returns the number of
/// addresses removed.
pub fn flush<K: LinkControl>(
    kernel: &K,
    interface: &Interface,
    family: Family,
) -> Result<usize, Error> {
    let addresses: Vec<Address> = kernel
        .addresses(interface, family)
        .map_err(|source| {
            error!("address list failed interface={interface} family={family} error=\"{source}\"");
            Error::AddressOperationFailed {
                operation: "address list",
                interface: interface.name().to_string(),
                address: family.to_string(),
                source,
            }
        })?
        .into_iter()
        .filter(|a| family.contains(&a.network()))
        .collect();

    for address in &addresses {
        kernel
            .remove_address(interface, address)
            .map_err(|source| {
                error!("address delete failed interface={interface} address={address} error=\"{source}\"");
                Error::AddressOperationFailed {
                    operation: "address delete",
                    interface: interface.name().to_string(),
                    address: address.to_string(),
                    source,
                }
            })?;
    }

    let removed = addresses.len();
    debug!("flushed interface interface={interface} family={family} removed={removed}");
    Ok(removed)
}

/// Parses `ip/prefix_len` into a network.
pub fn address_spec(ip: &str, prefix_len: u8) -> Result<IpNet, Error> {
    let spec = format!("{ip}/{prefix_len}");
    spec.parse()
        .map_err(|source| Error::InvalidAddressSpec { spec, source })
}

/// Installs `ip/prefix_len` on `interface`.
pub fn add<K: LinkControl>(
    kernel: &K,
    interface: &Interface,
    ip: &str,
    prefix_len: u8,
) -> Result<IpNet, Error> {
    let network = address_spec(ip, prefix_len).map_err(|e| {
        error!("address parse failed interface={interface} address={ip} prefix={prefix_len} error=\"{e}\"");
        e
    })?;

    kernel.add_address(interface, network).map_err(|source| {
        error!("address add failed interface={interface} address={network} error=\"{source}\"");
        Error::AddressOperationFailed {
            operation: "address add",
            interface: interface.name().to_string(),
            address: network.to_string(),
            source,
        }
    })?;
    Ok(network)
}

/// Installs the lease's new address, deriving the prefix from `subnet_mask`.
pub fn update_address<K: LinkControl>(
    kernel: &K,
    interface: &Interface,
    ip: &str,
    subnet_mask: &str,
) -> Result<IpNet, Error> {
    let prefix_len = mask::to_prefix_len(subnet_mask).map_err(|e| {
        error!("subnet mask translation failed interface={interface} new-ip-address={ip} new-subnet-mask={subnet_mask:?} error=\"{e}\"");
        e
    })?;
    let network = add(kernel, interface, ip, prefix_len)?;
    debug!("updated interface IP interface={interface} new-ip-address={ip} new-subnet-mask={subnet_mask}");
    Ok(network)
}

/// Applies `mtu` to `interface`. An empty value leaves the MTU untouched.
pub fn set_mtu<K: LinkControl>(
    kernel: &K,
    interface: &Interface,
    mtu: &str,
) -> Result<Option<u32>, Error> {
    if mtu.is_empty() {
        return Ok(None);
    }

    let value: u32 = mtu.parse().map_err(|source| {
        error!("MTU parse failed interface={interface} mtu={mtu:?} error=\"{source}\"");
        Error::InvalidMtu {
            value: mtu.to_string(),
            source,
        }
    })?;

    kernel.set_link_mtu(interface, value).map_err(|source| {
        error!("link set MTU failed interface={interface} mtu={value} error=\"{source}\"");
        Error::InterfaceConfigFailed {
            operation: "link set MTU",
            interface: interface.name().to_string(),
            source,
        }
    })?;
    debug!("set interface MTU interface={interface} mtu={value}");
    Ok(Some(value))
}
