//! Application services: authorization, storage, and notification publishing
//! composed around the pure scheduling domain.
//!
//! Every mutation follows the same shape:
//!
//! ```text
//! authorize + validate (fail before any write)
//!   ↓
//! read / compute with the domain types
//!   ↓
//! write through the DocumentStore
//!   ↓
//! publish a resolved Notification
//! ```

pub mod customers;
pub mod events;
pub mod users;

use std::sync::Arc;

use unshift_auth::{Hs256Jwt, Principal, can_receive};
use unshift_core::{DomainError, DomainResult};
use unshift_events::{Filter, InMemoryNotificationBus, NotificationBus, Subscription, Topic};
use unshift_scheduling::{Customer, CustomerView, Event, EventView, Notification, ResolvedEvent, User};

use crate::store::{DocumentStore, InMemoryDocumentStore};

pub use customers::CustomerDirectory;
pub use events::EventService;
pub use users::{AuthPayload, UserService};

/// Process-wide notification bus carrying scheduling notifications.
pub type SchedulerBus = InMemoryNotificationBus<Notification>;

/// One store per collection.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn DocumentStore<User>>,
    pub customers: Arc<dyn DocumentStore<Customer>>,
    pub events: Arc<dyn DocumentStore<Event>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryDocumentStore::<User>::new()),
            customers: Arc::new(InMemoryDocumentStore::<Customer>::new()),
            events: Arc::new(InMemoryDocumentStore::<Event>::new()),
        }
    }

    async fn user(&self, id: unshift_core::UserId) -> DomainResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub(crate) async fn customer_view(&self, customer: Customer) -> DomainResult<CustomerView> {
        let owner = self.user(customer.owner).await?;
        Ok(CustomerView::new(customer, owner.as_ref()))
    }

    /// Event with live owner and cached snapshot.
    pub(crate) async fn event_view(&self, event: Event) -> DomainResult<EventView> {
        let owner = self.user(event.owner).await?;
        Ok(EventView::new(event, owner.as_ref()))
    }

    /// Event with live owner and live customer detail.
    pub(crate) async fn resolve_event(&self, event: Event) -> DomainResult<ResolvedEvent> {
        let owner = self.user(event.owner).await?;
        let customer = self.customers.find_by_id(event.customer.cus_id).await?;
        Ok(ResolvedEvent::new(event, owner.as_ref(), customer))
    }
}

/// Publishing handle shared by the services.
#[derive(Debug, Clone)]
pub(crate) struct Publisher {
    bus: Arc<SchedulerBus>,
}

impl Publisher {
    pub(crate) fn publish(&self, notification: Notification) -> DomainResult<()> {
        let topic = unshift_events::Notification::topic(&notification);
        match self.bus.publish(notification) {
            Ok(delivered) => {
                tracing::debug!(%topic, delivered, "published");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%topic, error = %e, "publish failed after write");
                Err(DomainError::internal(format!("publish {topic}: {e}")))
            }
        }
    }
}

/// The full service surface handed to the transport layer.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub customers: CustomerDirectory,
    pub events: EventService,
    bus: Arc<SchedulerBus>,
}

impl Services {
    pub fn new(stores: Stores, bus: Arc<SchedulerBus>, tokens: Arc<Hs256Jwt>) -> Self {
        let publisher = Publisher { bus: bus.clone() };
        let customers = CustomerDirectory::new(stores.clone(), publisher.clone());
        Self {
            users: UserService::new(stores.clone(), publisher.clone(), tokens),
            events: EventService::new(stores, publisher, customers.clone()),
            customers,
            bus,
        }
    }

    /// In-memory stores and a fresh bus.
    pub fn in_memory(tokens: Hs256Jwt) -> Self {
        Self::new(Stores::in_memory(), Arc::new(SchedulerBus::new()), Arc::new(tokens))
    }

    pub fn bus(&self) -> &Arc<SchedulerBus> {
        &self.bus
    }

    /// Register `principal` for live notifications on `topic`.
    ///
    /// Managers receive every notification; staff only those about records
    /// they own. Dropping the subscription unregisters it.
    pub fn subscribe(&self, principal: &Principal, topic: Topic) -> Subscription<Notification> {
        let principal = principal.clone();
        let filter: Filter<Notification> =
            Arc::new(move |n: &Notification| can_receive(&principal, unshift_events::Notification::owner(n)));
        self.bus.subscribe(topic, filter)
    }
}

fn principal_of(user: &User) -> Principal {
    Principal {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        is_manager: user.is_manager,
    }
}
