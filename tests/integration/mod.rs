//! Integration test modules for switchbridge
//!
//! - lifecycle: Reference ownership across the object tree
//! - notifications: Delivery, routing and teardown against foreign threads
//! - iteration: Enumeration and lookup of child objects
//! - errors: Status translation under both error policies

pub mod errors;
pub mod iteration;
pub mod lifecycle;
pub mod notifications;
