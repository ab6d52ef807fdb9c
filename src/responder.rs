use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::error;

use crate::ack_loop::ack_loop;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::responder_handle::{ResponderHandle, Stats};

pub const DEFAULT_WINDOW: u16 = 6400;

#[derive(Clone, Copy, Debug)]
pub struct ResponderConfig {
    /// window advertised in every acknowledgment
    pub window: u16,
    /// how long the loop waits for a datagram before checking for shutdown
    pub poll_interval: Duration,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        ResponderConfig {
            window: DEFAULT_WINDOW,
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// Acknowledges every packet sent to it, from a background thread.
///
/// Dropping the responder stops the thread.
pub struct Responder {
    addr: SocketAddr,
    h: ResponderHandle,
    jh: Option<thread::JoinHandle<Result<()>>>,
}

impl Responder {
    pub fn spawn<A: ToSocketAddrs>(addr: A, config: ResponderConfig) -> Result<Self> {
        let endpoint = Endpoint::bind(addr)?;
        let addr = endpoint.local_addr()?;
        let h: ResponderHandle = Arc::default();

        let jh = {
            let h = h.clone();
            thread::spawn(move || ack_loop(endpoint, h, config))
        };

        Ok(Responder {
            addr,
            h,
            jh: Some(jh),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stats(&self) -> Stats {
        self.h.state.lock().unwrap().stats
    }

    /// Blocks until at least `n` datagrams have been handled or `timeout` passes.
    ///
    /// A timeout too large to represent as a deadline waits without limit.
    pub fn wait_for(&self, n: u64, timeout: Duration) -> Stats {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.h.state.lock().unwrap();
        while state.stats.seen() < n {
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.h.seen_var.wait_timeout(state, deadline - now).unwrap().0
                }
                None => self.h.seen_var.wait(state).unwrap(),
            };
        }
        state.stats
    }

    /// Stops the loop and reports how it ended.
    pub fn shutdown(mut self) -> Result<Stats> {
        self.stop()?;
        Ok(self.stats())
    }

    fn stop(&mut self) -> Result<()> {
        self.h.state.lock().unwrap().terminate = true;
        match self.jh.take() {
            Some(jh) => jh.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "acknowledgment loop panicked").into())
            }),
            None => Ok(()),
        }
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("acknowledgment loop failed: {}", e);
        }
    }
}
