//! Callback sink: the identity a wrapper registers with its handle.
//!
//! The foreign runtime calls [`Sink::notify`] / [`Sink::notify_payload`] from
//! its own threads at any time between registration and unregistration.
//! Dispatch takes no locks. Each call passes through a gate so teardown can
//! stop new deliveries and wait for the ones already running.

use crate::config::BridgeConfig;
use crate::event::{Discriminant, EventFamily, EventTable, ObjectId};
use crossbeam::utils::Backoff;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared sink, as held by both the wrapper and the foreign side.
pub type SinkRef<F> = Arc<Sink<F>>;

thread_local! {
    /// Owners whose dispatch is running on this thread, innermost last.
    static DISPATCHING: RefCell<SmallVec<[ObjectId; 4]>> = RefCell::new(SmallVec::new());
}

struct DispatchGate {
    in_flight: AtomicUsize,
    closed: AtomicBool,
}

struct GateEntry<'a> {
    gate: &'a DispatchGate,
    owner: ObjectId,
}

impl DispatchGate {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    fn enter(&self, owner: ObjectId) -> Option<GateEntry<'_>> {
        // SeqCst pairs with close_and_drain: either we see `closed`, or the
        // closer sees our increment.
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.closed.load(Ordering::SeqCst) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        DISPATCHING.with(|stack| stack.borrow_mut().push(owner));
        Some(GateEntry { gate: self, owner })
    }

    fn close_and_drain(&self, owner: ObjectId, timeout: Duration) -> bool {
        self.closed.store(true, Ordering::SeqCst);

        // Deliveries for this owner already running on the current thread
        // (a handler tearing down its own wrapper) cannot finish until we
        // return.
        let own =
            DISPATCHING.with(|stack| stack.borrow().iter().filter(|id| **id == owner).count());

        let start = Instant::now();
        let backoff = Backoff::new();
        while self.in_flight.load(Ordering::SeqCst) > own {
            if start.elapsed() >= timeout {
                return false;
            }
            if backoff.is_completed() {
                std::thread::sleep(Duration::from_micros(100));
            } else {
                backoff.snooze();
            }
        }
        true
    }
}

impl Drop for GateEntry<'_> {
    fn drop(&mut self) {
        DISPATCHING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|id| *id == self.owner) {
                stack.remove(pos);
            }
        });
        self.gate.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Receiving end of a foreign notification registration.
pub struct Sink<F: EventFamily> {
    owner: ObjectId,
    events: Arc<EventTable<F>>,
    gate: DispatchGate,
    log_unknown: bool,
}

impl<F: EventFamily> Sink<F> {
    pub(crate) fn new(
        owner: ObjectId,
        events: Arc<EventTable<F>>,
        config: &BridgeConfig,
    ) -> SinkRef<F> {
        Arc::new(Self {
            owner,
            events,
            gate: DispatchGate::new(),
            log_unknown: config.log_unknown_discriminants,
        })
    }

    /// The wrapper this sink delivers for.
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Deliver a "property changed" notification.
    ///
    /// Unknown discriminants are dropped. Never fails.
    pub fn notify(&self, raw: u32) {
        let Some(_entry) = self.gate.enter(self.owner) else {
            tracing::trace!(
                family = F::NAME,
                owner = %self.owner,
                "notification after unregister dropped"
            );
            return;
        };

        match F::Discriminant::from_raw(raw) {
            Some(discriminant) => {
                let fired = self.events.fire(self.owner, discriminant);
                tracing::trace!(
                    family = F::NAME,
                    owner = %self.owner,
                    event = discriminant.name(),
                    observers = fired,
                    "dispatched"
                );
            }
            None => {
                if self.log_unknown {
                    tracing::trace!(
                        family = F::NAME,
                        owner = %self.owner,
                        "ignoring unknown discriminant {:#x}",
                        raw
                    );
                }
            }
        }
    }

    /// Deliver a multi-field notification (e.g. level metering) as one event.
    pub fn notify_payload(&self, payload: &F::Payload) {
        let Some(_entry) = self.gate.enter(self.owner) else {
            return;
        };
        self.events.fire_payload(self.owner, payload);
    }

    pub fn is_closed(&self) -> bool {
        self.gate.closed.load(Ordering::SeqCst)
    }

    /// Deliveries currently running.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight.load(Ordering::SeqCst)
    }

    /// Stop accepting deliveries and wait for running ones. Returns false if
    /// `timeout` elapsed first.
    pub(crate) fn close_and_drain(&self, timeout: Duration) -> bool {
        self.gate.close_and_drain(self.owner, timeout)
    }
}

impl<F: EventFamily> std::fmt::Debug for Sink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("family", &F::NAME)
            .field("owner", &self.owner)
            .field("closed", &self.is_closed())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
