//! In-memory notification bus (single process).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::bus::{Filter, NotificationBus, Subscription};
use crate::{Notification, NotificationEnvelope, Topic};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Publish failed due to internal lock poisoning.
    #[error("notification bus lock poisoned")]
    Poisoned,
}

struct Subscriber<M> {
    id: u64,
    topic: Topic,
    filter: Filter<M>,
    sender: mpsc::Sender<NotificationEnvelope<M>>,
}

/// Per-subscriber queue depth unless configured otherwise.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1024;

struct Registry<M> {
    next_id: AtomicU64,
    capacity: usize,
    subscribers: Mutex<Vec<Subscriber<M>>>,
}

/// In-memory pub/sub bus.
///
/// - One bounded queue per subscriber; publish never awaits, and a full queue
///   drops the notification for that subscriber only
/// - Filters run at publish time against the payload
/// - Subscribers whose receiver is gone are pruned while publishing
pub struct InMemoryNotificationBus<M> {
    registry: Arc<Registry<M>>,
}

impl<M> core::fmt::Debug for InMemoryNotificationBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryNotificationBus").finish_non_exhaustive()
    }
}

impl<M> InMemoryNotificationBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus whose subscribers each buffer at most `capacity` notifications.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Number of live registrations on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        match self.registry.subscribers.lock() {
            Ok(subs) => subs.iter().filter(|s| s.topic == topic && !s.sender.is_closed()).count(),
            Err(_) => 0,
        }
    }
}

impl<M> Default for InMemoryNotificationBus<M> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

fn unregister<M>(registry: Weak<Registry<M>>, id: u64) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    if let Ok(mut subs) = registry.subscribers.lock() {
        subs.retain(|s| s.id != id);
    }
}

impl<M> NotificationBus<M> for InMemoryNotificationBus<M>
where
    M: Notification,
{
    type Error = BusError;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        let topic = message.topic();
        let envelope = NotificationEnvelope::new(topic, Utc::now(), message);

        let mut subs = self.registry.subscribers.lock().map_err(|_| BusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|s| !s.sender.is_closed());

        let mut delivered = 0;
        for sub in subs.iter().filter(|s| s.topic == topic) {
            if !(sub.filter)(envelope.payload()) {
                continue;
            }
            match sub.sender.try_send(envelope.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(%topic, subscriber = sub.id, "subscriber queue full, notification dropped");
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }

        tracing::debug!(%topic, delivered, "notification published");
        Ok(delivered)
    }

    fn subscribe(&self, topic: Topic, filter: Filter<M>) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel(self.registry.capacity);
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut subs) = self.registry.subscribers.lock() {
            subs.push(Subscriber {
                id,
                topic,
                filter,
                sender,
            });
        }

        let registry = Arc::downgrade(&self.registry);
        Subscription::new(topic, receiver, move || unregister(registry, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unshift_core::UserId;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping {
        topic: Topic,
        owner: Option<UserId>,
        n: u32,
    }

    impl Notification for Ping {
        fn topic(&self) -> Topic {
            self.topic
        }

        fn owner(&self) -> Option<UserId> {
            self.owner
        }
    }

    fn ping(topic: Topic, owner: Option<UserId>, n: u32) -> Ping {
        Ping { topic, owner, n }
    }

    fn accept_all() -> Filter<Ping> {
        Arc::new(|_| true)
    }

    #[test]
    fn delivers_only_to_matching_topic() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let mut created = bus.subscribe(Topic::EventCreated, accept_all());
        let mut deleted = bus.subscribe(Topic::EventDeleted, accept_all());

        let delivered = bus.publish(ping(Topic::EventCreated, None, 1)).unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(created.try_recv().unwrap().payload().n, 1);
        assert!(deleted.try_recv().is_err());
    }

    #[test]
    fn filter_is_applied_per_subscriber() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let mut alice_sub = bus.subscribe(Topic::EventUpdated, Arc::new(move |p: &Ping| p.owner == Some(alice)));
        let mut everyone = bus.subscribe(Topic::EventUpdated, accept_all());

        bus.publish(ping(Topic::EventUpdated, Some(bob), 1)).unwrap();
        bus.publish(ping(Topic::EventUpdated, Some(alice), 2)).unwrap();

        assert_eq!(alice_sub.try_recv().unwrap().payload().n, 2);
        assert!(alice_sub.try_recv().is_err());
        assert_eq!(everyone.try_recv().unwrap().payload().n, 1);
        assert_eq!(everyone.try_recv().unwrap().payload().n, 2);
    }

    #[test]
    fn dropping_subscription_unregisters_immediately() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let sub = bus.subscribe(Topic::CustomerCreated, accept_all());
        assert_eq!(bus.subscriber_count(Topic::CustomerCreated), 1);

        drop(sub);

        assert_eq!(bus.subscriber_count(Topic::CustomerCreated), 0);
        assert_eq!(bus.publish(ping(Topic::CustomerCreated, None, 1)).unwrap(), 0);
    }

    #[test]
    fn idle_subscriber_does_not_hold_back_others() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let _idle = bus.subscribe(Topic::EventCreated, accept_all());
        let mut active = bus.subscribe(Topic::EventCreated, accept_all());

        for n in 0..1_000 {
            assert_eq!(bus.publish(ping(Topic::EventCreated, None, n)).unwrap(), 2);
        }

        for n in 0..1_000 {
            assert_eq!(active.try_recv().unwrap().payload().n, n);
        }
    }

    #[test]
    fn full_queue_drops_for_that_subscriber_only() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::with_capacity(4);
        let mut idle = bus.subscribe(Topic::EventUpdated, accept_all());
        let mut active = bus.subscribe(Topic::EventUpdated, accept_all());

        for n in 0..10 {
            let delivered = bus.publish(ping(Topic::EventUpdated, None, n)).unwrap();
            assert_eq!(delivered, if n < 4 { 2 } else { 1 });
            assert_eq!(active.try_recv().unwrap().payload().n, n);
        }

        let kept: Vec<u32> = std::iter::from_fn(|| idle.try_recv().ok()).map(|e| e.payload().n).collect();
        assert_eq!(kept, vec![0, 1, 2, 3]);
        assert_eq!(bus.subscriber_count(Topic::EventUpdated), 2);
    }

    #[test]
    fn recipients_share_one_envelope_id() {
        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let mut a = bus.subscribe(Topic::UserCreated, accept_all());
        let mut b = bus.subscribe(Topic::UserCreated, accept_all());

        bus.publish(ping(Topic::UserCreated, None, 7)).unwrap();

        let ea = a.try_recv().unwrap();
        let eb = b.try_recv().unwrap();
        assert_eq!(ea.notification_id(), eb.notification_id());
        assert_eq!(ea.topic(), Topic::UserCreated);
    }

    #[tokio::test]
    async fn subscription_is_a_stream() {
        use tokio_stream::StreamExt;

        let bus: InMemoryNotificationBus<Ping> = InMemoryNotificationBus::new();
        let mut sub = bus.subscribe(Topic::EventDeleted, accept_all());
        bus.publish(ping(Topic::EventDeleted, None, 3)).unwrap();

        let env = sub.next().await.unwrap();
        assert_eq!(env.into_payload().n, 3);
    }
}
