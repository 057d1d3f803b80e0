//! `pedalshare-events`: real-time fan-out to live subscribers.

pub mod hub;
pub mod subscriber;

pub use hub::{BroadcastReport, NotificationHub, SubscriberId};
pub use subscriber::{DeliveryError, Subscriber, Subscription};
