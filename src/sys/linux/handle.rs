use super::socket::RouteSocket;
use crate::{Address, Family, Interface, LinkControl};
use ipnet::IpNet;
use libc::{AF_INET, AF_INET6, AF_UNSPEC};
use log::debug;
use netlink_packet_route::address::Nla as AddressNla;
use netlink_packet_route::link::nlas::Nla as LinkNla;
use netlink_packet_route::{
    AddressMessage, LinkMessage, RtnlMessage, NLM_F_ACK, NLM_F_CREATE, NLM_F_DUMP, NLM_F_EXCL,
    NLM_F_REQUEST,
};
use nix::errno::Errno;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// rtnetlink backend.
///
/// Holds one route socket for the lifetime of the lease event.
pub struct Netlink {
    socket: RouteSocket,
}

impl Netlink {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            socket: RouteSocket::new()?,
        })
    }
}

impl LinkControl for Netlink {
    fn link_index(&self, name: &str) -> io::Result<Option<u32>> {
        match nix::net::if_::if_nametoindex(name) {
            Ok(index) => Ok(Some(index)),
            Err(Errno::ENODEV) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_link_up(&self, interface: &Interface) -> io::Result<()> {
        let message = make_link_up_message(interface.index());
        debug!("netlink: link set {} up", interface);
        self.socket
            .request(RtnlMessage::SetLink(message), NLM_F_REQUEST | NLM_F_ACK)
            .map(|_| ())
    }

    fn set_link_mtu(&self, interface: &Interface, mtu: u32) -> io::Result<()> {
        let message = make_link_mtu_message(interface.index(), mtu);
        debug!("netlink: link set {} mtu {}", interface, mtu);
        self.socket
            .request(RtnlMessage::SetLink(message), NLM_F_REQUEST | NLM_F_ACK)
            .map(|_| ())
    }

    fn addresses(&self, interface: &Interface, family: Family) -> io::Result<Vec<Address>> {
        let mut message = AddressMessage::default();
        message.header.family = family_to_af(family);
        message.header.index = interface.index();

        let replies = self
            .socket
            .request(RtnlMessage::GetAddress(message), NLM_F_DUMP | NLM_F_REQUEST)?;

        Ok(replies
            .into_iter()
            .filter_map(|reply| match reply {
                RtnlMessage::NewAddress(entry) if entry.header.index == interface.index() => {
                    parse_address_message(&entry)
                }
                _ => None,
            })
            .filter(|address| family.contains(&address.network()))
            .collect())
    }

    fn add_address(&self, interface: &Interface, network: IpNet) -> io::Result<()> {
        let message = make_address_message(interface.index(), network);
        debug!("netlink: address add {} dev {}", network, interface);
        self.socket
            .request(
                RtnlMessage::NewAddress(message),
                NLM_F_REQUEST | NLM_F_ACK | NLM_F_CREATE | NLM_F_EXCL,
            )
            .map(|_| ())
    }

    fn remove_address(&self, interface: &Interface, address: &Address) -> io::Result<()> {
        let message = make_delete_message(interface.index(), address);
        debug!("netlink: address del {} dev {}", address, interface);
        self.socket
            .request(RtnlMessage::DelAddress(message), NLM_F_REQUEST | NLM_F_ACK)
            .map(|_| ())
    }
}

fn family_to_af(family: Family) -> u8 {
    match family {
        Family::V4 => AF_INET as u8,
        Family::V6 => AF_INET6 as u8,
        Family::All => AF_UNSPEC as u8,
    }
}

fn make_link_up_message(index: u32) -> LinkMessage {
    let mut message = LinkMessage::default();
    message.header.index = index;
    message.header.flags = libc::IFF_UP as u32;
    message.header.change_mask = libc::IFF_UP as u32;
    message
}

fn make_link_mtu_message(index: u32, mtu: u32) -> LinkMessage {
    let mut message = LinkMessage::default();
    message.header.index = index;
    message.nlas.push(LinkNla::Mtu(mtu));
    message
}

fn make_address_message(index: u32, network: IpNet) -> AddressMessage {
    let mut message = AddressMessage::default();
    message.header.prefix_len = network.prefix_len();
    message.header.index = index;

    message.header.family = match network.addr() {
        IpAddr::V4(_) => AF_INET as u8,
        IpAddr::V6(_) => AF_INET6 as u8,
    };
    let address_vec = octets(network.addr());

    message.nlas.push(AddressNla::Address(address_vec.clone()));

    if let IpNet::V4(network_v4) = network {
        // for IPv4 the IFA_LOCAL address can be set to the same value as IFA_ADDRESS
        message.nlas.push(AddressNla::Local(address_vec));
        // IFA_BROADCAST is meaningless for /31 and /32
        if network_v4.prefix_len() < 31 {
            message.nlas.push(AddressNla::Broadcast(
                network_v4.broadcast().octets().to_vec(),
            ));
        }
    }

    message
}

/// Rebuilds the request that removes a listed address.
///
/// For point-to-point entries `IFA_ADDRESS` must carry the peer, otherwise
/// the kernel finds no matching address.
fn make_delete_message(index: u32, address: &Address) -> AddressMessage {
    let mut message = make_address_message(index, address.network());
    if let Some(peer) = address.peer() {
        for nla in message.nlas.iter_mut() {
            if let AddressNla::Address(bytes) = nla {
                *bytes = octets(peer);
            }
        }
    }
    message
}

fn octets(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(ipv4) => ipv4.octets().to_vec(),
        IpAddr::V6(ipv6) => ipv6.octets().to_vec(),
    }
}

fn parse_ip(family: u8, bytes: &[u8]) -> Option<IpAddr> {
    match family as i32 {
        AF_INET => Some(IpAddr::V4(Ipv4Addr::from(<[u8; 4]>::try_from(bytes).ok()?))),
        AF_INET6 => Some(IpAddr::V6(Ipv6Addr::from(<[u8; 16]>::try_from(bytes).ok()?))),
        _ => None,
    }
}

/// Converts a kernel address entry into an [`Address`].
///
/// For IPv4 `IFA_LOCAL` is the interface's own address. When `IFA_ADDRESS`
/// differs from it, it holds the peer of a point-to-point link.
fn parse_address_message(entry: &AddressMessage) -> Option<Address> {
    let mut address = None;
    let mut local = None;
    for nla in &entry.nlas {
        match nla {
            AddressNla::Address(bytes) => address = Some(bytes.as_slice()),
            AddressNla::Local(bytes) => local = Some(bytes.as_slice()),
            _ => {}
        }
    }

    let family = entry.header.family;
    let (ip, peer) = match (local, address) {
        (Some(local), Some(address)) if local != address => {
            (parse_ip(family, local)?, Some(parse_ip(family, address)?))
        }
        (Some(bytes), _) | (None, Some(bytes)) => (parse_ip(family, bytes)?, None),
        (None, None) => return None,
    };
    let network = IpNet::new(ip, entry.header.prefix_len).ok()?;
    Some(match peer {
        Some(peer) => Address::with_peer(network, peer),
        None => Address::from(network),
    })
}
