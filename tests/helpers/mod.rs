//! Fixtures shared by the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use switchbridge::mixer::fake::FakeSwitcher;
use switchbridge::prelude::*;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn session(policy: ErrorPolicy) -> Session {
    Session::builder()
        .error_policy(policy)
        .drain_timeout_ms(2000)
        .build()
        .expect("valid session config")
}

/// The fake studio and a switcher attached to it with the default policy.
pub fn studio() -> (FakeSwitcher, Switcher<FakeSwitcher>) {
    studio_with(ErrorPolicy::Narrow)
}

pub fn studio_with(policy: ErrorPolicy) -> (FakeSwitcher, Switcher<FakeSwitcher>) {
    init_tracing();
    let fake = FakeSwitcher::studio();
    let switcher = session(policy)
        .attach(fake.clone())
        .expect("attach studio switcher");
    (fake, switcher)
}

/// A shared counter and a handler that bumps it.
pub fn counter() -> (Arc<AtomicUsize>, impl Fn(ObjectId) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    (count, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    })
}

pub fn load(count: &AtomicUsize) -> usize {
    count.load(Ordering::SeqCst)
}
