//! Scan debouncer: a two-state latch gating lookups
//!
//! `Ready` -> `Locked` happens once per scanning session, for the first
//! accepted barcode. Only an explicit reset goes back to `Ready`. Each reset
//! starts a new session so completions from an earlier session can be told
//! apart from the current one.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Waiting for a barcode
    Ready,
    /// A barcode was accepted; no further lookups until reset
    Locked,
}

/// Proof that the holder performed the `Ready -> Locked` transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    session: u64,
}

impl ScanTicket {
    pub fn session(&self) -> u64 {
        self.session
    }
}

#[derive(Debug)]
struct Latch {
    state: ScanState,
    session: u64,
}

/// Single-flight latch shared by the analysis lane and the reset control
#[derive(Debug)]
pub struct ScanDebouncer {
    latch: Mutex<Latch>,
}

impl Default for ScanDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanDebouncer {
    pub fn new() -> Self {
        Self {
            latch: Mutex::new(Latch {
                state: ScanState::Ready,
                session: 0,
            }),
        }
    }

    fn latch(&self) -> MutexGuard<'_, Latch> {
        self.latch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ScanState {
        self.latch().state
    }

    pub fn is_locked(&self) -> bool {
        self.state() == ScanState::Locked
    }

    /// Attempt `Ready -> Locked`. Exactly one caller per session gets a ticket.
    pub fn try_lock(&self) -> Option<ScanTicket> {
        let mut latch = self.latch();
        match latch.state {
            ScanState::Ready => {
                latch.state = ScanState::Locked;
                Some(ScanTicket {
                    session: latch.session,
                })
            }
            ScanState::Locked => None,
        }
    }

    /// `Locked -> Ready`. Returns `false` (and changes nothing) when already ready.
    pub fn reset(&self) -> bool {
        let mut latch = self.latch();
        match latch.state {
            ScanState::Locked => {
                latch.state = ScanState::Ready;
                latch.session += 1;
                true
            }
            ScanState::Ready => false,
        }
    }

    /// Whether `ticket` belongs to the session that is still on screen
    pub fn is_current(&self, ticket: ScanTicket) -> bool {
        let latch = self.latch();
        latch.state == ScanState::Locked && latch.session == ticket.session
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod tests;
