use serde::Serialize;

use unshift_core::UserId;
use unshift_events::Topic;

use crate::user::UserView;
use crate::views::{CustomerView, ResolvedEvent};

/// Change notification published by the scheduling services.
///
/// Payloads are fully resolved so subscribers can render them without
/// further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Notification {
    UserCreated(UserView),
    UserUpdated(UserView),
    CustomerCreated(CustomerView),
    EventCreated(ResolvedEvent),
    EventUpdated(ResolvedEvent),
    EventDeleted(ResolvedEvent),
}

impl unshift_events::Notification for Notification {
    fn topic(&self) -> Topic {
        match self {
            Notification::UserCreated(_) => Topic::UserCreated,
            Notification::UserUpdated(_) => Topic::UserUpdated,
            Notification::CustomerCreated(_) => Topic::CustomerCreated,
            Notification::EventCreated(_) => Topic::EventCreated,
            Notification::EventUpdated(_) => Topic::EventUpdated,
            Notification::EventDeleted(_) => Topic::EventDeleted,
        }
    }

    fn owner(&self) -> Option<UserId> {
        match self {
            Notification::UserCreated(_) | Notification::UserUpdated(_) => None,
            Notification::CustomerCreated(c) => Some(c.owner()),
            Notification::EventCreated(e) | Notification::EventUpdated(e) | Notification::EventDeleted(e) => {
                Some(e.owner())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use unshift_events::Notification as _;

    use crate::customer::Customer;

    #[test]
    fn customer_notification_is_attributed_to_owner() {
        let owner = UserId::new();
        let n = Notification::CustomerCreated(CustomerView::new(Customer::placeholder(owner, Utc::now()), None));

        assert_eq!(n.topic(), Topic::CustomerCreated);
        assert_eq!(n.owner(), Some(owner));
    }

    #[test]
    fn payload_serializes_without_a_tag() {
        let owner = UserId::new();
        let n = Notification::CustomerCreated(CustomerView::new(Customer::placeholder(owner, Utc::now()), None));
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["companycontact"], "07 0001111");
    }
}
