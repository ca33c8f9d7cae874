//! Service layer.
//!
//! Services hold the crate's behaviour; the CLI handlers only parse input
//! and call into them.

pub mod notifications;

pub use notifications::{DeliveryResolver, Notifier};
