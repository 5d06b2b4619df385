//! Live change notifications: topics, envelopes, and the in-process bus.

pub mod bus;
pub mod envelope;
pub mod in_memory_bus;
pub mod notification;
pub mod topic;

pub use bus::{Filter, NotificationBus, Subscription};
pub use envelope::NotificationEnvelope;
pub use in_memory_bus::{BusError, InMemoryNotificationBus};
pub use notification::Notification;
pub use topic::{Topic, UnknownTopic};
