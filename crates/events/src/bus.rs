//! Notification publishing/subscription abstraction (mechanics only).
//!
//! The bus distributes change notifications to live subscribers. It makes
//! minimal assumptions:
//!
//! - **Topic routed**: a subscriber only sees the topic it registered for.
//! - **Filtered per subscriber**: each registration carries a predicate bound
//!   to the subscriber's identity at subscribe time.
//! - **Non-blocking fan-out**: every subscriber owns its own bounded queue, so
//!   a slow consumer never delays publication to the others; once its queue
//!   is full it misses notifications instead.
//! - **No persistence**: a subscriber only sees what is published while it is
//!   registered.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc::{Receiver, error::TryRecvError};
use tokio_stream::Stream;

use crate::{Notification, NotificationEnvelope, Topic};

/// Delivery predicate evaluated against each published payload.
pub type Filter<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

type Unregister = Box<dyn FnOnce() + Send>;

/// A live registration on a bus.
///
/// Dropping the subscription unregisters it immediately. It can be consumed
/// with [`Subscription::recv`] or used directly as a [`Stream`].
pub struct Subscription<M> {
    topic: Topic,
    receiver: Receiver<NotificationEnvelope<M>>,
    unregister: Option<Unregister>,
}

impl<M> core::fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription").field("topic", &self.topic).finish_non_exhaustive()
    }
}

impl<M> Subscription<M> {
    pub fn new(
        topic: Topic,
        receiver: Receiver<NotificationEnvelope<M>>,
        unregister: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            topic,
            receiver,
            unregister: Some(Box::new(unregister)),
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Wait for the next delivered notification.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<NotificationEnvelope<M>> {
        self.receiver.recv().await
    }

    /// Take a delivered notification without waiting.
    pub fn try_recv(&mut self) -> Result<NotificationEnvelope<M>, TryRecvError> {
        self.receiver.try_recv()
    }
}

impl<M> Stream for Subscription<M> {
    type Item = NotificationEnvelope<M>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl<M> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

/// Topic-routed, filtered publish/subscribe.
///
/// Implementations must be safe to share across request tasks; publishing
/// must never wait on a subscriber.
pub trait NotificationBus<M: Notification>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    /// Publish to every live subscriber of `message.topic()` whose filter
    /// accepts it. Returns the number of deliveries.
    fn publish(&self, message: M) -> Result<usize, Self::Error>;

    fn subscribe(&self, topic: Topic, filter: Filter<M>) -> Subscription<M>;
}

impl<M, B> NotificationBus<M> for Arc<B>
where
    M: Notification,
    B: NotificationBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self, topic: Topic, filter: Filter<M>) -> Subscription<M> {
        (**self).subscribe(topic, filter)
    }
}
