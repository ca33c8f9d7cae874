//! Webhook notifications with pluggable delivery.
//!
//! [`Notifier`] builds and serializes payloads; a [`DeliveryResolver`] picks
//! how they are posted. Two deliveries are built in: [`NativeHttpDelivery`]
//! (reqwest) and [`BinaryShimDelivery`] (an external curl located by
//! [`BinaryLocator`]). Anything implementing [`Delivery`] can replace them.

mod binary_delivery;
mod delivery;
mod locator;
mod native_delivery;
mod notifier;
mod resolver;

pub use binary_delivery::BinaryShimDelivery;
pub use delivery::{Delivery, DeliveryOutcome, FnDelivery, delivery_fn};
pub use locator::{BinaryLocator, FALLBACK_SEARCH_DIRS, find_in_dirs, search_dirs};
pub use native_delivery::NativeHttpDelivery;
pub use notifier::{DEFAULT_PLATFORM_DOMAIN, Notifier, NotifierBuilder};
pub use resolver::{
    BinaryProbe, COMMAND_STRATEGY_PREFIX, DeliveryProbe, DeliveryResolver, NativeHttpProbe,
};
