//! Per-action in-flight flags
//!
//! A request kind may have at most one request outstanding. A second
//! attempt while the first is pending is dropped, not queued. Flags are
//! released by the guard's `Drop`, so every exit path clears them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Kinds of network request guarded against double submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    FetchSuggestions,
    FetchAvailability,
    CreateSuggestion,
    EditSuggestion,
    DeleteSuggestion,
    ToggleLike,
    ToggleVote,
    AvailabilitySlot,
    ProgressStage,
    Leadership,
    KickMember,
}

/// Tracks which request kinds are currently in flight
#[derive(Debug, Default)]
pub struct InFlightTracker {
    flags: HashMap<RequestKind, Arc<AtomicBool>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request kind as in flight, or None if one already is
    pub fn try_begin(&mut self, kind: RequestKind) -> Option<InFlightGuard> {
        let flag = self
            .flags
            .entry(kind)
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone();

        if flag.swap(true, Ordering::AcqRel) {
            tracing::debug!(?kind, "Dropping duplicate request");
            return None;
        }

        Some(InFlightGuard { kind, flag })
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.flags
            .get(&kind)
            .map(|flag| flag.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// True while any request is pending (loading indicator)
    pub fn any_in_flight(&self) -> bool {
        self.flags.values().any(|flag| flag.load(Ordering::Acquire))
    }
}

/// Releases its request kind when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    kind: RequestKind,
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
