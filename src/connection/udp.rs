// UDP transport towards the AbletonOSC listener

use crate::connection::transport::{Transport, TransportError, encode};
use crate::messaging::command::LiveCommand;
use log::trace;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Owns the single outbound socket used for one run
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local socket and resolve the destination
    pub fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let destination = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            TransportError::Rejected(format!("could not resolve {}:{}", host, port))
        })?;
        let bind_addr: SocketAddr = if destination.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        Ok(Self {
            socket,
            destination,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, command: &LiveCommand) -> Result<(), TransportError> {
        let bytes = encode(command)?;
        let sent = self.socket.send_to(&bytes, self.destination)?;
        trace!("Sent {} bytes to {}: {}", sent, self.destination, command);
        Ok(())
    }
}
