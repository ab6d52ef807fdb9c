mod ack_loop;
mod endpoint;
mod error;
mod flags;
mod header;
mod packet;
mod responder;
mod responder_handle;

pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use flags::{decode_flags, Flags};
pub use header::{decode_header, encode, Header, HEADER_LEN, MAX_PAYLOAD, PACKET_LEN};
pub use packet::Packet;
pub use responder::{Responder, ResponderConfig, DEFAULT_WINDOW};
pub use responder_handle::Stats;
