//! Change events and discriminant tables.
//!
//! A foreign notification carries a raw discriminant ("which property
//! changed"). [`EventTable`] maps each known discriminant to its own
//! [`ChangeEvent`], plus one payload event for multi-field callbacks such as
//! level metering.
//!
//! Firing reads an [`ArcSwap`] snapshot of the observer list, so the foreign
//! notification thread never waits on a lock. Subscribing and unsubscribing
//! copy the list under a writer mutex and publish the new snapshot.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generate a discriminant enum and its [`Discriminant`] impl.
///
/// # Example
/// ```
/// use switchbridge_core::{discriminants, Discriminant};
///
/// discriminants! {
///     pub enum BandEvent {
///         GainChanged = 0x6761_696e,
///         EnabledChanged = 0x656e_626c,
///     }
/// }
///
/// assert_eq!(BandEvent::from_raw(0x6761_696e), Some(BandEvent::GainChanged));
/// assert_eq!(BandEvent::from_raw(7), None);
/// ```
#[macro_export]
macro_rules! discriminants {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::Discriminant for $name {
            const ALL: &'static [Self] = &[$( $name::$variant ),+];

            fn from_raw(raw: u32) -> ::core::option::Option<Self> {
                $(
                    if raw == $raw {
                        return ::core::option::Option::Some($name::$variant);
                    }
                )+
                ::core::option::Option::None
            }

            fn raw(self) -> u32 {
                match self {
                    $( $name::$variant => $raw ),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }
    };
}

/// Enumerated "which property changed" code of one interface family.
///
/// The table is a strict subset of what the foreign runtime may send, so
/// [`from_raw`](Discriminant::from_raw) returns `None` for codes the binding
/// does not know.
pub trait Discriminant: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn from_raw(raw: u32) -> Option<Self>;

    fn raw(self) -> u32;

    /// Position in [`ALL`](Discriminant::ALL).
    fn index(self) -> usize;

    fn name(self) -> &'static str;
}

/// The callback contract of one foreign interface family.
pub trait EventFamily: Send + Sync + 'static {
    const NAME: &'static str;

    type Discriminant: Discriminant;

    /// Payload of the family's multi-field callback. `()` when it has none.
    type Payload: Send + Sync + 'static;
}

/// Process-unique identity of a wrapper. Handlers receive it as the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ObjectId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SubscriptionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observer callback: `(sender, args)`.
///
/// Runs on whichever thread delivered the notification. Keep it short and
/// non-blocking.
pub type Handler<A> = Arc<dyn Fn(ObjectId, &A) + Send + Sync>;

struct Observer<A> {
    id: SubscriptionId,
    handler: Handler<A>,
}

impl<A> Clone for Observer<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

/// A named, independently subscribable notification stream.
pub struct ChangeEvent<A: 'static> {
    name: &'static str,
    observers: ArcSwap<Vec<Observer<A>>>,
    writer: Mutex<()>,
}

impl<A: 'static> ChangeEvent<A> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            observers: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(ObjectId, &A) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        let _guard = self.writer.lock();
        let mut next = (**self.observers.load()).clone();
        next.push(Observer {
            id,
            handler: Arc::new(handler),
        });
        self.observers.store(Arc::new(next));
        id
    }

    /// Returns false if `id` was not subscribed to this event.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let _guard = self.writer.lock();
        let current = self.observers.load();
        if !current.iter().any(|o| o.id == id) {
            return false;
        }
        let next: Vec<_> = current.iter().filter(|o| o.id != id).cloned().collect();
        self.observers.store(Arc::new(next));
        true
    }

    pub fn clear(&self) {
        let _guard = self.writer.lock();
        self.observers.store(Arc::new(Vec::new()));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.load().len()
    }

    /// Invoke every current observer in subscription order. Returns how many
    /// ran. Changes made by a handler apply from the next firing.
    pub fn fire(&self, sender: ObjectId, args: &A) -> usize {
        let observers = self.observers.load_full();
        for observer in observers.iter() {
            (observer.handler)(sender, args);
        }
        observers.len()
    }
}

impl<A: 'static> fmt::Debug for ChangeEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("name", &self.name)
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// One [`ChangeEvent`] per discriminant of a family, plus its payload event.
pub struct EventTable<F: EventFamily> {
    events: Vec<ChangeEvent<F::Discriminant>>,
    payload: ChangeEvent<F::Payload>,
}

impl<F: EventFamily> EventTable<F> {
    pub fn new() -> Self {
        let events = F::Discriminant::ALL
            .iter()
            .map(|d| ChangeEvent::new(d.name()))
            .collect();
        Self {
            events,
            payload: ChangeEvent::new(F::NAME),
        }
    }

    pub fn event(&self, discriminant: F::Discriminant) -> &ChangeEvent<F::Discriminant> {
        &self.events[discriminant.index()]
    }

    pub fn payload_event(&self) -> &ChangeEvent<F::Payload> {
        &self.payload
    }

    pub fn subscribe<H>(&self, discriminant: F::Discriminant, handler: H) -> SubscriptionId
    where
        H: Fn(ObjectId, &F::Discriminant) + Send + Sync + 'static,
    {
        self.event(discriminant).subscribe(handler)
    }

    pub fn unsubscribe(&self, discriminant: F::Discriminant, id: SubscriptionId) -> bool {
        self.event(discriminant).unsubscribe(id)
    }

    pub fn subscribe_payload<H>(&self, handler: H) -> SubscriptionId
    where
        H: Fn(ObjectId, &F::Payload) + Send + Sync + 'static,
    {
        self.payload.subscribe(handler)
    }

    pub fn unsubscribe_payload(&self, id: SubscriptionId) -> bool {
        self.payload.unsubscribe(id)
    }

    pub fn fire(&self, sender: ObjectId, discriminant: F::Discriminant) -> usize {
        self.event(discriminant).fire(sender, &discriminant)
    }

    pub fn fire_payload(&self, sender: ObjectId, payload: &F::Payload) -> usize {
        self.payload.fire(sender, payload)
    }

    /// Total observers across every event of the table.
    pub fn observer_count(&self) -> usize {
        self.events.iter().map(|e| e.observer_count()).sum::<usize>()
            + self.payload.observer_count()
    }
}

impl<F: EventFamily> Default for EventTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EventFamily> fmt::Debug for EventTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTable")
            .field("family", &F::NAME)
            .field("events", &self.events)
            .finish()
    }
}
