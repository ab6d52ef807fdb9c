//! Fixed 12-byte segment header.
//!
//! ```text
//! 0        4        8    10   12
//! |--seq---|--ack---|flg|win|--payload--|
//! ```
//!
//! All fields are big-endian (network byte order).

use crate::error::{Error, Result};
use crate::flags::Flags;

/// Size of an encoded header in bytes.
pub const HEADER_LEN: usize = 12;

/// Application data carried by a full data packet.
pub const MAX_PAYLOAD: usize = 1460;

/// Size of a full data packet: 1500-byte MTU minus IP and UDP headers.
pub const PACKET_LEN: usize = HEADER_LEN + MAX_PAYLOAD;

#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct Header {
    /// position of the payload in the sender's byte stream
    pub seq: u32,
    /// next sequence number expected from the peer
    pub ack: u32,
    /// raw flags field, reserved bits included
    pub flags: u16,
    /// receiver's advertised window
    pub window: u16,
}

impl Header {
    pub fn new(seq: u32, ack: u32, flags: Flags, window: u16) -> Self {
        Header {
            seq,
            ack,
            flags: flags.bits(),
            window,
        }
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.flags)
    }

    pub fn syn(&self) -> bool {
        self.flags().syn()
    }

    pub fn ack(&self) -> bool {
        self.flags().ack()
    }

    pub fn fin(&self) -> bool {
        self.flags().fin()
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.seq.to_be_bytes());
        buf[4..8].copy_from_slice(&self.ack.to_be_bytes());
        buf[8..10].copy_from_slice(&self.flags.to_be_bytes());
        buf[10..12].copy_from_slice(&self.window.to_be_bytes());
        buf
    }

    /// Reads a header from the first [`HEADER_LEN`] bytes of `buf`.
    ///
    /// Anything after the header is left alone.
    pub fn from_slice(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::TruncatedInput {
                required: HEADER_LEN,
                actual: buf.len(),
            });
        }

        Ok(Header {
            seq: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            ack: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            flags: u16::from_be_bytes([buf[8], buf[9]]),
            window: u16::from_be_bytes([buf[10], buf[11]]),
        })
    }
}

fn narrow<T: TryFrom<u64>>(field: &'static str, value: u64, bits: u32) -> Result<T> {
    T::try_from(value).map_err(|_| Error::OutOfRange { field, value, bits })
}

/// Builds `header || payload` from caller-supplied integers.
///
/// Each field is checked against its wire width before anything is
/// written. The payload length is not checked.
pub fn encode(
    sequence: u64,
    acknowledgment: u64,
    flags: u64,
    window: u64,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let header = Header {
        seq: narrow("sequence", sequence, 32)?,
        ack: narrow("acknowledgment", acknowledgment, 32)?,
        flags: narrow("flags", flags, 16)?,
        window: narrow("window", window, 16)?,
    };

    let mut packet = Vec::with_capacity(HEADER_LEN + payload.len());
    packet.extend_from_slice(&header.to_bytes());
    packet.extend_from_slice(payload);
    Ok(packet)
}

pub fn decode_header(buf: &[u8]) -> Result<Header> {
    Header::from_slice(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_packet_scenario() {
        let payload = vec![b'0'; MAX_PAYLOAD];
        let msg = encode(1, 0, 0, 0, &payload).unwrap();
        assert_eq!(msg.len(), PACKET_LEN);

        let h = decode_header(&msg[..HEADER_LEN]).unwrap();
        assert_eq!((h.seq, h.ack, h.flags, h.window), (1, 0, 0, 0));
        assert_eq!(&msg[HEADER_LEN..], &payload[..]);
    }

    #[test]
    fn ack_packet_scenario() {
        let msg = encode(0, 1, 4, 0, b"").unwrap();
        assert_eq!(msg.len(), HEADER_LEN);

        let h = decode_header(&msg).unwrap();
        assert_eq!((h.seq, h.ack, h.flags, h.window), (0, 1, 4, 0));
        assert_eq!(crate::decode_flags(h.flags), (false, true, false));
        assert!(h.ack() && !h.syn() && !h.fin());
    }

    #[test]
    fn network_byte_order() {
        let h = Header {
            seq: 0x0102_0304,
            ack: 0x0506_0708,
            flags: 0x090a,
            window: 0x0b0c,
        };
        assert_eq!(
            h.to_bytes(),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c]
        );
    }

    #[test]
    fn extremes_fit() {
        let msg = encode(u32::MAX as u64, u32::MAX as u64, 0xffff, 0xffff, b"").unwrap();
        assert_eq!(msg, vec![0xff; HEADER_LEN]);
    }

    #[test]
    fn sequence_out_of_range() {
        let err = encode(1 << 32, 0, 0, 0, b"").unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                field: "sequence",
                bits: 32,
                ..
            }
        ));
    }

    #[test]
    fn flags_out_of_range() {
        let err = encode(0, 0, 1 << 16, 0, b"").unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                field: "flags",
                value: 65536,
                bits: 16
            }
        ));
    }

    #[test]
    fn ack_and_window_out_of_range() {
        assert!(matches!(
            encode(0, 1 << 32, 0, 0, b""),
            Err(Error::OutOfRange { field: "acknowledgment", .. })
        ));
        assert!(matches!(
            encode(0, 0, 0, 1 << 16, b""),
            Err(Error::OutOfRange { field: "window", .. })
        ));
    }

    #[test]
    fn truncated() {
        let err = decode_header(&[0u8; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput {
                required: HEADER_LEN,
                actual: 11
            }
        ));
        assert!(decode_header(&[]).is_err());
    }

    #[test]
    fn only_first_twelve_bytes_read() {
        let mut msg = encode(7, 8, 0b1010, 9, b"trailing").unwrap();
        msg.extend_from_slice(&[0xff; 4]);
        let h = decode_header(&msg).unwrap();
        assert_eq!(h, Header { seq: 7, ack: 8, flags: 0b1010, window: 9 });
    }

    #[test]
    fn reserved_flag_bits_round_trip() {
        let msg = encode(0, 0, 0xffff, 0, b"").unwrap();
        let h = decode_header(&msg).unwrap();
        assert_eq!(h.flags, 0xffff);
        assert_eq!(h.flags(), Flags::all());
    }
}
