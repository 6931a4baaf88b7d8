//! In-process stand-ins for the foreign runtime.
//!
//! [`FakeNotifier`] is the callback half of a fake handle: it records
//! registrations, counts calls, and fires notifications from whatever thread
//! the test chooses. [`FakeIterator`] is a complete fake enumeration.
//!
//! Fakes count foreign references. Handing out another reference goes
//! through [`AddRef`]; releasing more references than were handed out panics,
//! so a double release fails the test that caused it.

use crate::event::EventFamily;
use crate::handle::{ForeignHandle, ForeignIterator, InterfaceId, LookupById};
use crate::sink::SinkRef;
use crate::status::Status;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Calls a fake received so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub references: usize,
    pub add_callback: usize,
    pub remove_callback: usize,
    pub release: usize,
}

/// A fake handle that can give out another reference to the same object.
pub trait AddRef: Sized {
    fn add_ref(&self) -> Self;
}

pub struct FakeNotifier<F: EventFamily> {
    sinks: Mutex<Vec<SinkRef<F>>>,
    references: AtomicUsize,
    add_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    release_calls: AtomicUsize,
    fire_on_add: Mutex<Option<u32>>,
    fail_add: Mutex<Option<Status>>,
    fail_remove: Mutex<Option<Status>>,
}

impl<F: EventFamily> FakeNotifier<F> {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            references: AtomicUsize::new(1),
            add_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            release_calls: AtomicUsize::new(0),
            fire_on_add: Mutex::new(None),
            fail_add: Mutex::new(None),
            fail_remove: Mutex::new(None),
        }
    }

    pub fn add_callback(&self, sink: &SinkRef<F>) -> Status {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_add.lock().take() {
            return status;
        }
        self.sinks.lock().push(Arc::clone(sink));
        let raw = *self.fire_on_add.lock();
        if let Some(raw) = raw {
            sink.notify(raw);
        }
        Status::OK
    }

    /// `INVALID_ARG` if `sink` was never registered.
    pub fn remove_callback(&self, sink: &SinkRef<F>) -> Status {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_remove.lock().take() {
            return status;
        }
        let mut sinks = self.sinks.lock();
        let before = sinks.len();
        sinks.retain(|s| !Arc::ptr_eq(s, sink));
        if sinks.len() == before {
            Status::INVALID_ARG
        } else {
            Status::OK
        }
    }

    /// Count one more outstanding reference.
    pub fn add_ref(&self) {
        self.references.fetch_add(1, Ordering::SeqCst);
    }

    pub fn release(&self) {
        let released = self.release_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let references = self.references.load(Ordering::SeqCst);
        assert!(
            released <= references,
            "foreign handle released {released} times with {references} references"
        );
    }

    /// Notify every registered sink, as the foreign runtime would.
    pub fn fire(&self, raw: u32) {
        // Snapshot so a handler may unregister without deadlocking.
        let sinks = self.sinks();
        for sink in sinks {
            sink.notify(raw);
        }
    }

    pub fn fire_payload(&self, payload: &F::Payload) {
        for sink in self.sinks() {
            sink.notify_payload(payload);
        }
    }

    /// Raise `raw` from inside every subsequent `add_callback`.
    pub fn fire_on_add(&self, raw: u32) {
        *self.fire_on_add.lock() = Some(raw);
    }

    /// Make the next `add_callback` fail with `status`.
    pub fn fail_next_add(&self, status: Status) {
        *self.fail_add.lock() = Some(status);
    }

    /// Make the next `remove_callback` fail with `status`. The sink stays
    /// registered.
    pub fn fail_next_remove(&self, status: Status) {
        *self.fail_remove.lock() = Some(status);
    }

    pub fn sinks(&self) -> Vec<SinkRef<F>> {
        self.sinks.lock().clone()
    }

    pub fn registered(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn counts(&self) -> CallCounts {
        CallCounts {
            references: self.references.load(Ordering::SeqCst),
            add_callback: self.add_calls.load(Ordering::SeqCst),
            remove_callback: self.remove_calls.load(Ordering::SeqCst),
            release: self.release_calls.load(Ordering::SeqCst),
        }
    }

    /// References handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.references
            .load(Ordering::SeqCst)
            .saturating_sub(self.release_calls.load(Ordering::SeqCst))
    }

    /// Every reference handed out has been given back.
    pub fn is_released(&self) -> bool {
        self.release_calls.load(Ordering::SeqCst) >= self.references.load(Ordering::SeqCst)
    }
}

impl<F: EventFamily> Default for FakeNotifier<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EventFamily> fmt::Debug for FakeNotifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeNotifier")
            .field("family", &F::NAME)
            .field("registered", &self.registered())
            .field("counts", &self.counts())
            .finish()
    }
}

struct IteratorState<T, K> {
    items: Vec<(K, T)>,
    cursor: Mutex<VecDeque<usize>>,
    next_calls: AtomicUsize,
    release_calls: AtomicUsize,
    fail_at: Mutex<Option<(usize, Status)>>,
    fail_lookup: Mutex<Option<Status>>,
}

/// A fake enumeration over `(id, handle)` pairs.
///
/// Every element it yields is a new reference obtained with [`AddRef`].
/// Clones share state: hand one clone to the code under test and keep the
/// other to inspect call counts.
pub struct FakeIterator<T, K = u64> {
    state: Arc<IteratorState<T, K>>,
}

impl<T, K> Clone for FakeIterator<T, K> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, K> FakeIterator<T, K> {
    pub fn new(items: Vec<(K, T)>) -> Self {
        let cursor = (0..items.len()).collect();
        Self {
            state: Arc::new(IteratorState {
                items,
                cursor: Mutex::new(cursor),
                next_calls: AtomicUsize::new(0),
                release_calls: AtomicUsize::new(0),
                fail_at: Mutex::new(None),
                fail_lookup: Mutex::new(None),
            }),
        }
    }

    /// Fail the `step`-th call to `next_handle` (zero-based) with `status`.
    pub fn fail_at(&self, step: usize, status: Status) {
        *self.state.fail_at.lock() = Some((step, status));
    }

    pub fn fail_lookup(&self, status: Status) {
        *self.state.fail_lookup.lock() = Some(status);
    }

    pub fn next_calls(&self) -> usize {
        self.state.next_calls.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.state.release_calls.load(Ordering::SeqCst) > 0
    }
}

impl<T, K> ForeignHandle for FakeIterator<T, K>
where
    T: ForeignHandle,
    K: Send + Sync + 'static,
{
    const INTERFACE: InterfaceId = InterfaceId::new("FakeIterator", 0);

    fn release(&self) {
        let previous = self.state.release_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(previous, 0, "foreign iterator released twice");
    }
}

impl<T, K> ForeignIterator for FakeIterator<T, K>
where
    T: ForeignHandle + AddRef,
    K: Send + Sync + 'static,
{
    type Item = T;

    fn next_handle(&self) -> Result<Option<T>, Status> {
        let step = self.state.next_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((at, status)) = *self.state.fail_at.lock() {
            if at == step {
                return Err(status);
            }
        }
        let next = self.state.cursor.lock().pop_front();
        Ok(next.map(|index| self.state.items[index].1.add_ref()))
    }
}

impl<T, K> LookupById for FakeIterator<T, K>
where
    T: ForeignHandle + AddRef,
    K: Copy + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    type Id = K;

    fn handle_by_id(&self, id: K) -> Result<Option<T>, Status> {
        if let Some(status) = *self.state.fail_lookup.lock() {
            return Err(status);
        }
        Ok(self
            .state
            .items
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, item)| item.add_ref()))
    }
}
