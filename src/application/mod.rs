//! Application layer: the Revolut payment provider and the notification subscribers.
//!
//! Both are driven by the host platform, one call or event at a time, and reach
//! the outside world only through the traits in `domain::ports`.

pub mod revolut;
pub mod subscribers;
