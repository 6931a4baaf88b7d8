//! Native resource wrapper.
//!
//! [`NativeHandle`] owns one foreign reference and gives it back exactly once.
//! [`Wrapper`] adds the callback registration: the sink is registered after
//! the wrapper is fully built, and unregistered (with in-flight deliveries
//! drained) before the handle is released.

use crate::config::BridgeConfig;
use crate::error::{translate, translate_value, Error, Result};
use crate::event::{EventTable, ObjectId, SubscriptionId};
use crate::handle::{
    CreateIterator, ForeignHandle, ForeignIterator, FromHandle, Notifier, QueryCapability,
};
use crate::iter::IteratorAdapter;
use crate::sink::{Sink, SinkRef};
use crate::status::Status;
use std::fmt;
use std::sync::Arc;

/// Exclusive owner of one foreign handle.
pub struct NativeHandle<H: ForeignHandle> {
    handle: H,
    released: bool,
}

impl<H: ForeignHandle> NativeHandle<H> {
    /// Fails with `InvalidArgument` when the foreign side handed out null.
    pub fn new(handle: Option<H>) -> Result<Self> {
        let handle = handle.ok_or_else(|| {
            Error::InvalidArgument(format!("null {} handle", H::INTERFACE.name))
        })?;
        Ok(Self {
            handle,
            released: false,
        })
    }

    /// Borrow the handle for a foreign call.
    pub fn get(&self) -> &H {
        &self.handle
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.handle.release();
        tracing::debug!(interface = H::INTERFACE.name, "released foreign handle");
    }
}

impl<H: ForeignHandle> Drop for NativeHandle<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: ForeignHandle> fmt::Debug for NativeHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("interface", &H::INTERFACE.name)
            .field("released", &self.released)
            .finish()
    }
}

/// A foreign handle bound to a managed object, registered for notifications.
///
/// Entity types keep their `Wrapper` private and expose typed accessors built
/// on [`get`](Self::get) and [`invoke`](Self::invoke), which are the only
/// places foreign statuses are translated.
pub struct Wrapper<H: Notifier> {
    id: ObjectId,
    handle: NativeHandle<H>,
    events: Arc<EventTable<H::Family>>,
    sink: Option<SinkRef<H::Family>>,
    config: BridgeConfig,
}

impl<H: Notifier> Wrapper<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    /// Like [`new`](Self::new), with observers attached before registration
    /// so notifications raised while the sink is being added are delivered.
    pub fn with_events(
        handle: Option<H>,
        events: EventTable<H::Family>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        let handle = NativeHandle::new(handle)?;
        let id = ObjectId::next();
        let events = Arc::new(events);
        let sink = Sink::new(id, Arc::clone(&events), config);

        let mut wrapper = Self {
            id,
            handle,
            events,
            sink: None,
            config: *config,
        };

        let status = wrapper.handle.get().add_callback(&sink);
        if let Err(e) = translate(status, "add_callback", config.error_policy) {
            tracing::debug!(
                interface = H::INTERFACE.name,
                id = %id,
                "callback registration failed: {}",
                e
            );
            // Not registered, so nothing to remove; dropping `wrapper`
            // releases the handle.
            sink.close_and_drain(config.drain_timeout());
            return Err(e);
        }

        wrapper.sink = Some(sink);
        tracing::debug!(interface = H::INTERFACE.name, id = %id, "registered callback sink");
        Ok(wrapper)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn events(&self) -> &EventTable<H::Family> {
        &self.events
    }

    pub fn subscribe<F>(
        &self,
        discriminant: <H::Family as crate::EventFamily>::Discriminant,
        handler: F,
    ) -> SubscriptionId
    where
        F: Fn(ObjectId, &<H::Family as crate::EventFamily>::Discriminant) + Send + Sync + 'static,
    {
        self.events.subscribe(discriminant, handler)
    }

    pub fn is_registered(&self) -> bool {
        self.sink.is_some()
    }

    /// Read through the handle, translating a failure status.
    pub fn get<T>(
        &self,
        operation: &'static str,
        call: impl FnOnce(&H) -> std::result::Result<T, Status>,
    ) -> Result<T> {
        translate_value(call(self.handle.get()), operation, self.config.error_policy)
    }

    /// Call a status-returning operation (setters, actions) and translate the
    /// result. Failures are reported once and never retried.
    pub fn invoke(&self, operation: &'static str, call: impl FnOnce(&H) -> Status) -> Result<()> {
        let status = call(self.handle.get());
        translate(status, operation, self.config.error_policy).inspect_err(|e| {
            tracing::debug!(interface = H::INTERFACE.name, id = %self.id, "{}", e);
        })
    }

    /// View this object through a narrower interface, if it implements one.
    pub fn try_capability<T, W>(&self) -> Result<Option<W>>
    where
        T: ForeignHandle,
        H: QueryCapability<T>,
        W: FromHandle<T>,
    {
        match self.handle.get().query_capability() {
            Some(handle) => W::from_handle(handle, &self.config).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`try_capability`](Self::try_capability), but absence is
    /// `NotSupported`.
    pub fn require_capability<T, W>(&self) -> Result<W>
    where
        T: ForeignHandle,
        H: QueryCapability<T>,
        W: FromHandle<T>,
    {
        self.try_capability::<T, W>()?.ok_or(Error::NotSupported {
            interface: T::INTERFACE.name,
        })
    }

    /// Ask the handle for a fresh iterator over its `I` children.
    pub fn iterate<I, W>(&self) -> Result<IteratorAdapter<I, W>>
    where
        I: ForeignIterator,
        H: CreateIterator<I>,
        W: FromHandle<I::Item>,
    {
        let iterator = translate_value(
            self.handle.get().create_iterator(),
            "create_iterator",
            self.config.error_policy,
        )?
        .ok_or(Error::NotSupported {
            interface: I::INTERFACE.name,
        })?;
        IteratorAdapter::new(Some(iterator), &self.config)
    }

    /// Stop receiving notifications. Safe to call when not registered.
    ///
    /// Returns once no handler of this wrapper is running on another thread,
    /// or after the configured drain timeout.
    pub fn unregister(&mut self) {
        let Some(sink) = self.sink.take() else {
            return;
        };

        let status = self.handle.get().remove_callback(&sink);
        if status.is_failure() {
            tracing::warn!(
                interface = H::INTERFACE.name,
                id = %self.id,
                "remove_callback returned {}",
                status
            );
        }

        if !sink.close_and_drain(self.config.drain_timeout()) {
            tracing::warn!(
                interface = H::INTERFACE.name,
                id = %self.id,
                in_flight = sink.in_flight(),
                "notifications still running after {}ms",
                self.config.drain_timeout_ms
            );
        }

        tracing::debug!(interface = H::INTERFACE.name, id = %self.id, "unregistered callback sink");
    }

    /// Unregister and release now instead of at drop.
    pub fn dispose(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.unregister();
        self.handle.release();
    }
}

impl<H: Notifier> Drop for Wrapper<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<H: Notifier> fmt::Debug for Wrapper<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("interface", &H::INTERFACE.name)
            .field("id", &self.id)
            .field("registered", &self.is_registered())
            .finish()
    }
}
