//! Types and rules shared by the payment provider and the notification subscribers.
//!
//! Nothing here performs I/O; the traits in [`ports`] are implemented by the
//! infrastructure layer.

pub mod money;
pub mod notification;
pub mod order;
pub mod policy;
pub mod ports;
pub mod session;
pub mod webhook;
