use crate::domain_model::RefreshOutcome;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// What a waiter learns once the in-flight refresh settles. `None` means it failed.
pub type SharedOutcome = Option<RefreshOutcome>;

#[derive(Default)]
struct GateState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<SharedOutcome>>,
}

/// Single-flight gate for token refresh, owned by one client instance.
///
/// The first caller to arrive while no refresh runs becomes the leader and performs
/// the refresh; everyone arriving before it settles gets a receiver and is woken in
/// arrival order with the leader's outcome.
#[derive(Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

pub enum Admission<'a> {
    Leader(LeaderGuard<'a>),
    Follower(oneshot::Receiver<SharedOutcome>),
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check-and-set happens under one lock, before the caller awaits anything.
    pub fn admit(&self) -> Admission<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Admission::Follower(rx)
        } else {
            state.in_flight = true;
            Admission::Leader(LeaderGuard {
                gate: self,
                settled: false,
            })
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    // Waiters are notified inside the same critical section that clears the flag,
    // so no new leader can be admitted before the queue is drained. Their replays
    // go out later and must read credentials from the store.
    fn settle(&self, outcome: SharedOutcome) -> usize {
        let mut state = self.lock();
        let waiters = std::mem::take(&mut state.waiters);
        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver means that caller went away; nothing to do.
            let _ = waiter.send(outcome.clone());
        }
        state.in_flight = false;
        count
    }
}

/// Held by the leader while it refreshes. Dropping it unsettled fails every waiter,
/// so a cancelled leader never strands the queue.
pub struct LeaderGuard<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl LeaderGuard<'_> {
    /// Wakes the queued callers with `outcome`; returns how many were waiting.
    pub fn settle(mut self, outcome: SharedOutcome) -> usize {
        self.settled = true;
        self.gate.settle(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.settle(None);
        }
    }
}
