use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::header::{HEADER_LEN, MAX_PAYLOAD, PACKET_LEN};
use crate::packet::Packet;

// larger than any UDP payload, so recv_from never cuts a datagram short
const RECV_BUF_LEN: usize = 65_536;

/// A datagram socket that moves whole packets, one per datagram.
pub struct Endpoint {
    socket: UdpSocket,
}

impl Endpoint {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Endpoint { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.socket.set_read_timeout(timeout)?)
    }

    pub fn send_packet<A: ToSocketAddrs>(&self, packet: &Packet, to: A) -> Result<usize> {
        if packet.payload.len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                size: packet.payload.len(),
                max: MAX_PAYLOAD,
            });
        }
        Ok(self.socket.send_to(&packet.to_bytes(), to)?)
    }

    /// Blocks until a datagram arrives (or the read timeout fires).
    ///
    /// Datagrams carrying more than [`MAX_PAYLOAD`] bytes of payload are
    /// consumed and reported as `PayloadTooLarge`.
    pub fn recv_packet(&self) -> Result<(Packet, SocketAddr)> {
        let mut buf = vec![0u8; RECV_BUF_LEN];
        let (nbytes, from) = self.socket.recv_from(&mut buf[..])?;
        if nbytes > PACKET_LEN {
            return Err(Error::PayloadTooLarge {
                size: nbytes - HEADER_LEN,
                max: MAX_PAYLOAD,
            });
        }
        let packet = Packet::from_bytes(&buf[..nbytes])?;
        Ok((packet, from))
    }
}

impl AsRawFd for Endpoint {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}
