use std::sync::{Arc, Condvar, Mutex};

/// Running totals kept by the acknowledgment loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// well-formed packets received
    pub received: u64,
    /// acknowledgments sent back
    pub acknowledged: u64,
    /// datagrams too short to hold a header
    pub malformed: u64,
}

impl Stats {
    pub(crate) fn seen(&self) -> u64 {
        self.received + self.malformed
    }
}

#[derive(Default)]
pub(crate) struct State {
    pub terminate: bool,
    pub stats: Stats,
}

#[derive(Default)]
pub(crate) struct Handle {
    pub state: Mutex<State>,
    pub seen_var: Condvar,
}

pub(crate) type ResponderHandle = Arc<Handle>;
