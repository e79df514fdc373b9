//! Single-flight state for the grooming orchestrator.
//!
//! The orchestrator holds exactly one [`OperationSlot`]. The slot word is the
//! mutual-exclusion primitive: zero when idle, otherwise the generation of
//! the operation that owns it. Generations make every release and every
//! session access ownership-checked: after a cancellation frees the slot and
//! a new operation claims it, the superseded operation still drains, and its
//! guard drop, session take, and state writes must all be no-ops rather than
//! clobber the successor. [`FlightGuard`] ties the release to scope exit so
//! every path out of an operation — success, error, or panic — releases at
//! most once, and only while it still owns the slot.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifecycle of the (single) grooming operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroomState {
    Idle,
    Collecting,
    Grooming,
    Creating,
    Complete,
    Failed,
    Cancelled,
}

/// Transient state of the at-most-one active operation.
#[derive(Debug)]
pub(crate) struct OperationSlot {
    /// Zero when idle; otherwise the owning operation's generation.
    active: AtomicU64,
    next_generation: AtomicU64,
    /// Recorded session id, tagged with the generation that recorded it.
    session: Mutex<Option<(u64, String)>>,
    state: Mutex<GroomState>,
}

impl OperationSlot {
    pub(crate) fn new() -> Self {
        Self {
            active: AtomicU64::new(0),
            next_generation: AtomicU64::new(0),
            session: Mutex::new(None),
            state: Mutex::new(GroomState::Idle),
        }
    }

    /// Claim the slot. Returns `None` when an operation is already active.
    /// Generations start at 1, so zero never collides with a real owner.
    pub(crate) fn try_acquire(&self) -> Option<FlightGuard<'_>> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.active
            .compare_exchange(0, generation, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        Some(FlightGuard {
            slot: self,
            generation,
        })
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) != 0
    }

    /// Generation of the active operation, or zero when idle.
    pub(crate) fn current_generation(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Record the backend session id so a concurrent cancellation can reach it.
    pub(crate) fn record_session(&self, generation: u64, session_id: &str) {
        *self.session.lock().expect("session slot lock poisoned") =
            Some((generation, session_id.to_string()));
    }

    /// Take the recorded session id, if it still belongs to `generation`.
    /// At most one caller gets it, and a stale drain cannot steal a
    /// successor's session.
    pub(crate) fn take_session(&self, generation: u64) -> Option<String> {
        let mut slot = self.session.lock().expect("session slot lock poisoned");
        match &*slot {
            Some((owner, _)) if *owner == generation => slot.take().map(|(_, id)| id),
            _ => None,
        }
    }

    /// Update the lifecycle state, ignored unless `generation` owns the slot.
    pub(crate) fn set_state(&self, generation: u64, state: GroomState) {
        if self.active.load(Ordering::SeqCst) == generation {
            *self.state.lock().expect("state lock poisoned") = state;
        }
    }

    pub(crate) fn state(&self) -> GroomState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Clear the slot, only if `generation` still owns it. A stale guard or
    /// a stale cancellation releases nothing.
    pub(crate) fn release(&self, generation: u64) {
        let _ = self
            .active
            .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

/// Scoped claim on the operation slot, released on drop.
pub(crate) struct FlightGuard<'a> {
    slot: &'a OperationSlot,
    generation: u64,
}

impl FlightGuard<'_> {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.slot.release(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_is_exclusive() {
        let slot = OperationSlot::new();
        assert!(!slot.is_active());

        let guard = slot.try_acquire().expect("first acquire succeeds");
        assert!(slot.is_active());
        assert!(slot.try_acquire().is_none());

        drop(guard);
        assert!(!slot.is_active());
        assert!(slot.try_acquire().is_some());
    }

    #[test]
    fn test_session_is_taken_once() {
        let slot = OperationSlot::new();
        let guard = slot.try_acquire().unwrap();
        slot.record_session(guard.generation(), "sess-1");
        assert_eq!(slot.take_session(guard.generation()).as_deref(), Some("sess-1"));
        assert!(slot.take_session(guard.generation()).is_none());
    }

    #[test]
    fn test_stale_guard_does_not_release_successor() {
        let slot = OperationSlot::new();

        let first = slot.try_acquire().unwrap();
        // Cancellation frees the slot out from under the first operation.
        slot.release(first.generation());
        assert!(!slot.is_active());

        let second = slot.try_acquire().unwrap();
        assert!(slot.is_active());

        // The superseded operation drains; its guard drop must not clear the
        // successor's claim.
        drop(first);
        assert!(slot.is_active());

        drop(second);
        assert!(!slot.is_active());
    }

    #[test]
    fn test_stale_take_does_not_steal_successor_session() {
        let slot = OperationSlot::new();

        let first = slot.try_acquire().unwrap();
        let first_gen = first.generation();
        slot.record_session(first_gen, "sess-old");
        assert_eq!(slot.take_session(first_gen).as_deref(), Some("sess-old"));
        slot.release(first_gen);

        let second = slot.try_acquire().unwrap();
        slot.record_session(second.generation(), "sess-new");

        // The stale generation cannot take the successor's session.
        drop(first);
        assert!(slot.take_session(first_gen).is_none());
        assert_eq!(
            slot.take_session(second.generation()).as_deref(),
            Some("sess-new")
        );
    }

    #[test]
    fn test_state_writes_are_ownership_checked() {
        let slot = OperationSlot::new();
        assert_eq!(slot.state(), GroomState::Idle);

        let guard = slot.try_acquire().unwrap();
        slot.set_state(guard.generation(), GroomState::Grooming);
        assert_eq!(slot.state(), GroomState::Grooming);

        // A generation that no longer owns the slot cannot write state.
        slot.set_state(guard.generation() + 1, GroomState::Failed);
        assert_eq!(slot.state(), GroomState::Grooming);

        slot.set_state(guard.generation(), GroomState::Cancelled);
        assert_eq!(slot.state(), GroomState::Cancelled);
    }

    #[test]
    fn test_guard_releases_on_panic_path() {
        let slot = OperationSlot::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = slot.try_acquire().unwrap();
            panic!("operation blew up");
        }));
        assert!(result.is_err());
        assert!(!slot.is_active());
    }
}
