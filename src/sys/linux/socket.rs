use libc::NLM_F_MULTI;
use log::{trace, warn};
use netlink_packet_route::{NetlinkHeader, NetlinkMessage, NetlinkPayload, RtnlMessage};
use netlink_sys::constants::NETLINK_ROUTE;
use netlink_sys::{Socket, SocketAddr};
use std::cell::Cell;
use std::io;

const RECEIVE_BUFFER_SIZE: usize = 32768;

/// Blocking rtnetlink socket bound to the kernel.
pub(crate) struct RouteSocket {
    socket: Socket,
    sequence: Cell<u32>,
}

impl RouteSocket {
    pub(crate) fn new() -> io::Result<Self> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        socket.bind_auto()?;
        socket.connect(&SocketAddr::new(0, 0))?;
        Ok(Self {
            socket,
            sequence: Cell::new(0),
        })
    }

    /// Sends `message` and collects the replies up to the terminating
    /// `NLMSG_DONE`, acknowledgement or error.
    ///
    /// A netlink error reply is returned as the corresponding OS error.
    pub(crate) fn request(&self, message: RtnlMessage, flags: u16) -> io::Result<Vec<RtnlMessage>> {
        let sequence = self.sequence.get().wrapping_add(1);
        self.sequence.set(sequence);

        let mut req = NetlinkMessage {
            header: NetlinkHeader {
                flags,
                sequence_number: sequence,
                ..Default::default()
            },
            payload: NetlinkPayload::from(message),
        };

        req.finalize();

        let mut buf = vec![0; req.header.length as usize];
        req.serialize(&mut buf[..]);

        trace!(">>> {:?}", req);
        self.socket.send(&buf[..], 0)?;

        let mut replies = vec![];
        let mut receive_buffer = vec![0; RECEIVE_BUFFER_SIZE];

        loop {
            let size = self.socket.recv(&mut &mut receive_buffer[..], 0)?;
            let mut offset = 0;

            while offset < size {
                let bytes = &receive_buffer[offset..size];
                let msg: NetlinkMessage<RtnlMessage> = NetlinkMessage::deserialize(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
                trace!("<<< {:?}", msg);

                let length = msg.header.length as usize;
                if msg.header.sequence_number != sequence {
                    warn!("Skipping reply to another request: {:?}", msg.header);
                } else {
                    let multipart = (msg.header.flags & (NLM_F_MULTI as u16)) != 0;
                    match msg.payload {
                        NetlinkPayload::Done | NetlinkPayload::Ack(_) => return Ok(replies),
                        NetlinkPayload::Error(err) => {
                            return Err(io::Error::from_raw_os_error(-err.code))
                        }
                        NetlinkPayload::InnerMessage(inner) => replies.push(inner),
                        payload => warn!("Unexpected message: {:?}", payload),
                    }

                    // Got non-multipart message
                    if !multipart {
                        return Ok(replies);
                    }
                }

                if length == 0 {
                    break;
                }
                offset += length;
            }
        }
    }
}
