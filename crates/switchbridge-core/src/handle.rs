//! Contracts of the foreign interface family.
//!
//! A binding implements these traits once per foreign interface, at the
//! boundary. Everything above them (ownership, notification fan-out,
//! iteration, status translation) is generic.
//!
//! Foreign reference counting is not modelled beyond [`ForeignHandle::release`]:
//! a value implementing these traits carries exactly one foreign reference,
//! which the owning wrapper gives back exactly once.

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::event::EventFamily;
use crate::sink::SinkRef;
use crate::status::Status;
use std::fmt;

/// Identifier of a foreign interface type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId {
    pub name: &'static str,
    pub guid: u128,
}

impl InterfaceId {
    pub const fn new(name: &'static str, guid: u128) -> Self {
        Self { name, guid }
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{:032x}}}", self.name, self.guid)
    }
}

/// An opaque, reference-counted foreign object.
///
/// Implementations must not release on their own `Drop`; the owning
/// [`NativeHandle`](crate::NativeHandle) calls [`release`](Self::release).
pub trait ForeignHandle: Send + Sync + 'static {
    const INTERFACE: InterfaceId;

    /// Give back the one foreign reference this value carries.
    fn release(&self);
}

/// A handle that accepts a callback sink.
pub trait Notifier: ForeignHandle {
    type Family: EventFamily;

    fn add_callback(&self, sink: &SinkRef<Self::Family>) -> Status;

    fn remove_callback(&self, sink: &SinkRef<Self::Family>) -> Status;
}

/// A foreign pull-based enumeration.
pub trait ForeignIterator: ForeignHandle {
    type Item: ForeignHandle;

    /// `Ok(None)` once the enumeration is exhausted.
    fn next_handle(&self) -> std::result::Result<Option<Self::Item>, Status>;
}

/// A foreign iterator that can look elements up directly.
pub trait LookupById: ForeignIterator {
    type Id: Copy + fmt::Debug + Send + Sync + 'static;

    /// `Ok(None)` if no element has `id`.
    fn handle_by_id(&self, id: Self::Id) -> std::result::Result<Option<Self::Item>, Status>;
}

/// A parent handle that manufactures iterators over its children, keyed by
/// the iterator's [`ForeignHandle::INTERFACE`].
pub trait CreateIterator<I: ForeignIterator>: ForeignHandle {
    fn create_iterator(&self) -> std::result::Result<Option<I>, Status>;
}

/// A handle that may also be viewed through a narrower interface `T`.
pub trait QueryCapability<T: ForeignHandle>: ForeignHandle {
    /// `None` when the object does not implement `T`.
    fn query_capability(&self) -> Option<T>;
}

/// Build a managed wrapper around a freshly obtained foreign handle.
pub trait FromHandle<H>: Sized {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self>;
}
