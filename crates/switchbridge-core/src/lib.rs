//! Bridge kernel for foreign, reference-counted switcher handles.
//!
//! Provides exclusive handle ownership, callback registration with lock-free
//! fan-out to observers, pull-iterator adaptation, and status translation.
//! Entity crates build typed objects on top of [`Wrapper`] and
//! [`IteratorAdapter`] by implementing the contracts in [`handle`].
//!
//! Feature gates: `testing` (fake foreign handles for tests).

pub mod status;
pub use status::Status;

pub mod error;
pub use error::{translate, translate_value, Error, PlatformError, Result};

pub mod config;
pub use config::{BridgeConfig, ErrorPolicy};

pub mod handle;
pub use handle::{
    CreateIterator, ForeignHandle, ForeignIterator, FromHandle, InterfaceId, LookupById, Notifier,
    QueryCapability,
};

pub mod event;
pub use event::{
    ChangeEvent, Discriminant, EventFamily, EventTable, Handler, ObjectId, SubscriptionId,
};

pub mod sink;
pub use sink::{Sink, SinkRef};

mod wrapper;
pub use wrapper::{NativeHandle, Wrapper};

mod iter;
pub use iter::IteratorAdapter;

pub mod ffi;
pub use ffi::RawSink;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
