//! Query predicates and orderings per document type.

use std::cmp::Ordering;

use unshift_auth::OwnerFilter;
use unshift_core::UserId;
use unshift_scheduling::{Customer, DateRange, Event, User};

use super::document::Document;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Exact match, case-insensitive.
    pub email: Option<String>,
    pub exclude: Option<UserId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recency {
    #[default]
    NewestFirst,
}

impl Document for User {
    type Query = UserQuery;
    type Sort = Recency;

    fn matches(&self, query: &UserQuery) -> bool {
        query.email.as_deref().is_none_or(|e| self.email.eq_ignore_ascii_case(e.trim()))
            && query.exclude.is_none_or(|id| self.id != id)
    }

    fn compare(&self, other: &Self, sort: Recency) -> Ordering {
        match sort {
            Recency::NewestFirst => other.created_at.cmp(&self.created_at),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    pub owner: Option<OwnerFilter>,
}

impl Document for Customer {
    type Query = CustomerQuery;
    type Sort = Recency;

    fn matches(&self, query: &CustomerQuery) -> bool {
        query.owner.is_none_or(|f| f.matches(self.owner))
    }

    fn compare(&self, other: &Self, sort: Recency) -> Ordering {
        match sort {
            Recency::NewestFirst => other.created_at.cmp(&self.created_at),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub owner: Option<OwnerFilter>,
    pub plan_dates: DateRange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSort {
    /// Planned date descending, then creation time descending.
    #[default]
    PlanDateDesc,
}

impl Document for Event {
    type Query = EventQuery;
    type Sort = EventSort;

    fn matches(&self, query: &EventQuery) -> bool {
        query.owner.is_none_or(|f| f.matches(self.owner))
            && query.plan_dates.contains(self.plan_date)
    }

    fn compare(&self, other: &Self, sort: EventSort) -> Ordering {
        match sort {
            EventSort::PlanDateDesc => other
                .plan_date
                .cmp(&self.plan_date)
                .then_with(|| other.created_at.cmp(&self.created_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unshift_core::CustomerId;
    use chrono::{Duration, NaiveDate, Utc};
    use unshift_scheduling::{CustomerSnapshot, EventDraft};

    fn event(owner: UserId, plan_date: NaiveDate) -> Event {
        let snapshot = CustomerSnapshot {
            cus_id: CustomerId::new(),
            personal: "P".to_string(),
            position: String::new(),
            company: String::new(),
        };
        let draft = EventDraft {
            title: "t".to_string(),
            description: String::new(),
            plan_date,
            is_completed: false,
        };
        Event::create(owner, snapshot, draft, Utc::now())
    }

    #[test]
    fn event_order_is_plan_date_then_creation_descending() {
        let owner = UserId::new();
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut early = event(owner, day);
        let mut late = event(owner, day);
        early.created_at = Utc::now() - Duration::hours(1);
        late.created_at = Utc::now();
        let later_day = event(owner, day + Duration::days(1));

        let mut events = vec![early.clone(), later_day.clone(), late.clone()];
        events.sort_by(|a, b| a.compare(b, EventSort::PlanDateDesc));

        assert_eq!(events, vec![later_day, late, early]);
    }

    #[test]
    fn event_query_combines_owner_and_range() {
        let owner = UserId::new();
        let e = event(owner, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let own_june = EventQuery {
            owner: Some(OwnerFilter::Eq(owner)),
            plan_dates: DateRange::parse(Some("2024-06-01"), Some("2024-06-30")).unwrap(),
        };
        assert!(e.matches(&own_june));

        let peers = EventQuery {
            owner: Some(OwnerFilter::Ne(owner)),
            ..Default::default()
        };
        assert!(!e.matches(&peers));

        let july = EventQuery {
            plan_dates: DateRange::parse(Some("2024-07-01"), None).unwrap(),
            ..Default::default()
        };
        assert!(!e.matches(&july));
    }

    #[test]
    fn user_email_lookup_ignores_case() {
        let input = unshift_scheduling::RegisterInput {
            username: "ann".to_string(),
            email: "Ann@Example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            is_manager: false,
        };
        let user = User::register(&input, "hash".to_string(), Utc::now());

        let by_email = UserQuery {
            email: Some("ann@example.com".to_string()),
            exclude: None,
        };
        assert!(user.matches(&by_email));
        assert!(!user.matches(&UserQuery {
            email: None,
            exclude: Some(user.id),
        }));
    }
}
