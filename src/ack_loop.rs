use std::os::unix::io::AsRawFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, EventFlags, PollFd};
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::header::Header;
use crate::packet::Packet;
use crate::responder::ResponderConfig;
use crate::responder_handle::ResponderHandle;

/// The reply owed to `request`, if any.
///
/// Acknowledgments are never themselves acknowledged. SYN and FIN are
/// echoed so the peer sees them answered; nothing about the peer is
/// remembered between packets.
pub(crate) fn reply_to(request: &Packet, window: u16) -> Option<Packet> {
    if request.is_ack_only() {
        return None;
    }
    let echoed = request.header.flags() & (Flags::SYN | Flags::FIN);
    let header = Header::new(0, request.header.seq, Flags::ACK | echoed, window);
    Some(Packet::new(header, Vec::new()))
}

/// Poll timeout in milliseconds, never zero so the loop cannot spin.
fn poll_timeout(interval: Duration) -> i32 {
    interval.as_millis().max(1).min(i32::MAX as u128) as i32
}

fn interrupted(e: &nix::Error) -> bool {
    match e {
        nix::Error::Sys(Errno::EINTR) => true,
        _ => false,
    }
}

fn count_malformed(h: &ResponderHandle) {
    h.state.lock().unwrap().stats.malformed += 1;
    h.seen_var.notify_all();
}

pub(crate) fn ack_loop(endpoint: Endpoint, h: ResponderHandle, config: ResponderConfig) -> Result<()> {
    let timeout = poll_timeout(config.poll_interval);
    let addr = endpoint.local_addr()?;
    info!(%addr, window = config.window, "responder listening");

    loop {
        if h.state.lock().unwrap().terminate {
            info!("responder shutting down");
            return Ok(());
        }

        // wake up periodically so a shutdown request is noticed
        let mut pfd = [PollFd::new(endpoint.as_raw_fd(), EventFlags::POLLIN)];
        let n = match poll(&mut pfd[..], timeout) {
            Ok(n) => n,
            Err(ref e) if interrupted(e) => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            continue;
        }

        let (request, peer) = match endpoint.recv_packet() {
            Ok(r) => r,
            Err(Error::TruncatedInput { actual, .. }) => {
                warn!(nbytes = actual, "ignoring datagram shorter than a header");
                count_malformed(&h);
                continue;
            }
            Err(Error::PayloadTooLarge { size, max }) => {
                warn!(size, max, "ignoring datagram with oversized payload");
                count_malformed(&h);
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(
            %peer,
            seq = request.header.seq,
            ack = request.header.ack,
            flags = request.header.flags,
            len = request.payload.len(),
            "got packet"
        );

        let mut acknowledged = false;
        if let Some(reply) = reply_to(&request, config.window) {
            endpoint.send_packet(&reply, peer)?;
            debug!(%peer, ack = reply.header.ack, flags = reply.header.flags, "sent ack");
            acknowledged = true;
        }

        let mut state = h.state.lock().unwrap();
        state.stats.received += 1;
        if acknowledged {
            state.stats.acknowledged += 1;
        }
        drop(state);
        h.seen_var.notify_all();
    }
}
