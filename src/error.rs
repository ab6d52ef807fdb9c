//! Error types shared by the codec and the socket-facing pieces.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A header field does not fit its wire width.
    #[error("{field} = {value} does not fit in {bits} bits")]
    OutOfRange {
        field: &'static str,
        value: u64,
        bits: u32,
    },

    /// Fewer bytes than a full header were supplied.
    #[error("truncated header: need {required} bytes, got {actual}")]
    TruncatedInput { required: usize, actual: usize },

    /// Payload exceeds what a single datagram may carry.
    #[error("payload of {size} bytes exceeds maximum of {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("poll failed: {0}")]
    Poll(#[from] nix::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
