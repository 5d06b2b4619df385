//! Denormalized result shapes returned by queries and carried by notifications.

use serde::{Deserialize, Serialize};

use unshift_core::UserId;

use crate::customer::Customer;
use crate::event::Event;
use crate::user::{User, UserView};

/// Customer plus its resolved owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    /// `None` when the owning user no longer exists.
    pub user: Option<UserView>,
}

impl CustomerView {
    pub fn new(customer: Customer, owner: Option<&User>) -> Self {
        Self {
            customer,
            user: owner.map(User::view),
        }
    }

    pub fn owner(&self) -> UserId {
        self.customer.owner
    }
}

/// Event with its resolved owner and the cached customer snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub user: Option<UserView>,
}

impl EventView {
    pub fn new(event: Event, owner: Option<&User>) -> Self {
        Self {
            event,
            user: owner.map(User::view),
        }
    }

    pub fn owner(&self) -> UserId {
        self.event.owner
    }
}

/// Event with live owner and live customer detail.
///
/// The embedded snapshot is always present; `customer_detail` is `None` once
/// the referenced customer has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEvent {
    #[serde(flatten)]
    pub view: EventView,
    pub customer_detail: Option<Customer>,
}

impl ResolvedEvent {
    pub fn new(event: Event, owner: Option<&User>, customer: Option<Customer>) -> Self {
        Self {
            view: EventView::new(event, owner),
            customer_detail: customer,
        }
    }

    pub fn event(&self) -> &Event {
        &self.view.event
    }

    pub fn owner(&self) -> UserId {
        self.view.owner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::customer::CreateCustomerInput;
    use crate::event::EventDraft;
    use crate::user::RegisterInput;

    fn owner() -> User {
        let input = RegisterInput {
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            is_manager: false,
        };
        User::register(&input, "hash".to_string(), Utc::now())
    }

    #[test]
    fn resolved_event_flattens_into_one_object() {
        let user = owner();
        let customer = Customer::create(
            user.id,
            &CreateCustomerInput {
                personal: "Jane".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        let draft = EventDraft {
            title: "Visit".to_string(),
            description: String::new(),
            plan_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            is_completed: false,
        };
        let event = Event::create(user.id, customer.snapshot(), draft, Utc::now());

        let resolved = ResolvedEvent::new(event.clone(), Some(&user), Some(customer.clone()));
        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["id"], serde_json::json!(event.id));
        assert_eq!(json["title"], "Visit");
        assert_eq!(json["user"]["username"], "ann");
        assert!(json["user"].get("passwordHash").is_none());
        assert_eq!(json["customerDetail"]["personal"], "Jane");
        assert_eq!(json["customer"]["cusId"], serde_json::json!(customer.id));
        assert_eq!(resolved.owner(), user.id);
    }

    #[test]
    fn missing_customer_still_carries_snapshot() {
        let user = owner();
        let snapshot = Customer::placeholder(user.id, Utc::now()).snapshot();
        let draft = EventDraft {
            title: "Visit".to_string(),
            description: String::new(),
            plan_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            is_completed: false,
        };
        let event = Event::create(user.id, snapshot, draft, Utc::now());

        let resolved = ResolvedEvent::new(event, None, None);
        let json = serde_json::to_value(&resolved).unwrap();

        assert!(json["customerDetail"].is_null());
        assert!(json["user"].is_null());
        assert_eq!(json["customer"]["personal"], "Info Needed");
    }
}
