use crate::error::Result;
use crate::flags::Flags;
use crate::header::{Header, HEADER_LEN};

/// A header followed by opaque application data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn new(header: Header, payload: Vec<u8>) -> Self {
        Packet { header, payload }
    }

    /// A data-bearing packet: no flags, no acknowledgment, no window.
    pub fn data(seq: u32, payload: Vec<u8>) -> Self {
        Packet::new(Header::new(seq, 0, Flags::empty(), 0), payload)
    }

    /// An acknowledgment-only packet. Always exactly [`HEADER_LEN`] bytes on the wire.
    pub fn ack(ack: u32, window: u16) -> Self {
        Packet::new(Header::new(0, ack, Flags::ACK, window), Vec::new())
    }

    pub fn is_ack_only(&self) -> bool {
        self.header.ack() && self.payload.is_empty()
    }

    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        buf.extend_from_slice(&self.header.to_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Everything after the header is taken as payload.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let header = Header::from_slice(buf)?;
        Ok(Packet {
            header,
            payload: buf[HEADER_LEN..].to_vec(),
        })
    }
}
