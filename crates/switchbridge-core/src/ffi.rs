//! C-ABI view of a callback sink.
//!
//! Bindings that talk to a real foreign runtime hand it a [`RawSink`]: a
//! context pointer plus `extern "C"` trampolines. The context owns one strong
//! reference to the sink, given back by the `release` trampoline.

use crate::event::EventFamily;
use crate::sink::{Sink, SinkRef};
use crate::status::Status;
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Foreign-callable notification entry point.
#[repr(C)]
pub struct RawSink {
    pub context: *const c_void,
    /// `(context, discriminant) -> status`
    pub notify: unsafe extern "C" fn(*const c_void, u32) -> i32,
    /// Drops the reference held by `context`. Call at most once.
    pub release: unsafe extern "C" fn(*const c_void),
}

// SAFETY: `context` points at a `Sink<F>`, which is Send + Sync.
unsafe impl Send for RawSink {}
unsafe impl Sync for RawSink {}

impl RawSink {
    pub fn new<F: EventFamily>(sink: &SinkRef<F>) -> Self {
        Self {
            context: Arc::into_raw(Arc::clone(sink)) as *const c_void,
            notify: notify_trampoline::<F>,
            release: release_trampoline::<F>,
        }
    }
}

impl std::fmt::Debug for RawSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSink").field("context", &self.context).finish()
    }
}

unsafe extern "C" fn notify_trampoline<F: EventFamily>(
    context: *const c_void,
    discriminant: u32,
) -> i32 {
    if context.is_null() {
        return Status::POINTER.code();
    }
    // SAFETY: `context` came from `RawSink::new::<F>` and has not been
    // released, so the Arc keeps the sink alive.
    let sink = unsafe { &*(context as *const Sink<F>) };

    // Unwinding across the C boundary is undefined.
    match panic::catch_unwind(AssertUnwindSafe(|| sink.notify(discriminant))) {
        Ok(()) => Status::OK.code(),
        Err(_) => {
            tracing::error!(
                family = F::NAME,
                owner = %sink.owner(),
                "observer panicked during notification"
            );
            Status::UNEXPECTED.code()
        }
    }
}

unsafe extern "C" fn release_trampoline<F: EventFamily>(context: *const c_void) {
    if context.is_null() {
        return;
    }
    // SAFETY: balances the `into_raw` in `RawSink::new::<F>`.
    drop(unsafe { Arc::from_raw(context as *const Sink<F>) });
}
