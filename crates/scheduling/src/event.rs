//! Event records and their lifecycle transitions.
//!
//! Lifecycle state is three independent flags rather than one enum:
//!
//! - `is_completed` (with `comp_date`) toggled by complete / reopen
//! - `is_rescheduled` freezes a row once a successor has been booked
//! - `is_cancelled` (with `remark`, and `comp_date` stamped) set by cancel
//!
//! Every change goes through [`Event::apply`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use unshift_core::{CustomerId, DomainError, DomainResult, Entity, EventId, FieldErrors, UserId};

use crate::customer::CustomerSnapshot;
use crate::date_range::parse_plan_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "userId")]
    pub owner: UserId,
    pub customer: CustomerSnapshot,
    pub title: String,
    pub description: String,
    pub plan_date: NaiveDate,
    pub comp_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub is_rescheduled: bool,
    pub is_cancelled: bool,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> EventId {
        self.id
    }
}

/// A lifecycle change requested on an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Mark done. Carries the live customer snapshot when it could be re-read.
    Complete { resynced: Option<CustomerSnapshot> },
    /// Forecast: back to not completed.
    Reopen,
    /// Freeze this row and book a successor on `plan_date`.
    Reschedule { plan_date: NaiveDate },
    Cancel { remark: String },
}

impl Transition {
    /// Whether the transition re-reads the live customer and re-embeds it.
    pub fn resyncs_snapshot(&self) -> bool {
        matches!(self, Transition::Complete { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::Complete { .. } => "complete",
            Transition::Reopen => "reopen",
            Transition::Reschedule { .. } => "reschedule",
            Transition::Cancel { .. } => "cancel",
        }
    }
}

/// Result of applying a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// New row to insert (only for reschedule).
    pub successor: Option<Event>,
}

impl Event {
    pub fn create(owner: UserId, customer: CustomerSnapshot, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            owner,
            customer,
            title: draft.title,
            description: draft.description,
            plan_date: draft.plan_date,
            comp_date: draft.is_completed.then_some(now),
            is_completed: draft.is_completed,
            is_rescheduled: false,
            is_cancelled: false,
            remark: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply `transition` in place.
    ///
    /// Flag combinations are not guarded: a cancelled event may still be
    /// completed and vice versa, and a row frozen by a reschedule still
    /// accepts every transition. Ownership is never touched.
    pub fn apply(&mut self, transition: Transition, now: DateTime<Utc>) -> DomainResult<TransitionOutcome> {
        let mut successor = None;

        match transition {
            Transition::Complete { resynced } => {
                self.is_completed = true;
                self.comp_date = Some(now);
                if let Some(snapshot) = resynced {
                    self.customer = snapshot;
                }
            }
            Transition::Reopen => {
                self.is_completed = false;
                self.comp_date = None;
            }
            Transition::Reschedule { plan_date } => {
                let mut next = self.clone();
                next.id = EventId::new();
                next.plan_date = plan_date;
                next.is_rescheduled = false;
                next.created_at = now;
                next.updated_at = now;

                self.is_rescheduled = true;
                successor = Some(next);
            }
            Transition::Cancel { remark } => {
                self.is_cancelled = true;
                self.remark = remark;
                self.comp_date = Some(now);
            }
        }

        self.updated_at = now;
        Ok(TransitionOutcome { successor })
    }
}

/// Customer block of the create-event input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfoInput {
    #[serde(default)]
    pub cus_id: String,
    #[serde(default)]
    pub personal: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    pub title: String,
    #[serde(default)]
    pub customer: CustomerInfoInput,
    #[serde(default)]
    pub description: String,
    pub plan_date: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// How the new event refers to its customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    /// No id given; a placeholder customer must be provisioned.
    Missing,
    /// An id was given. If it does not resolve, a placeholder is provisioned.
    Existing(CustomerSnapshot),
}

/// Validated event fields, minus owner and customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub plan_date: NaiveDate,
    pub is_completed: bool,
}

impl CreateEventInput {
    pub fn validate(&self) -> DomainResult<(EventDraft, CustomerRef)> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title".into(), "Title must not be empty".into());
        }
        let plan_date = match parse_plan_date(&self.plan_date) {
            Ok(d) => Some(d),
            Err(e) => {
                merge_fields(&mut errors, e);
                None
            }
        };
        let customer = match self.customer.cus_id.trim() {
            "" => Some(CustomerRef::Missing),
            raw => match raw.parse::<CustomerId>() {
                Ok(cus_id) => Some(CustomerRef::Existing(CustomerSnapshot {
                    cus_id,
                    personal: self.customer.personal.clone(),
                    position: self.customer.position.clone(),
                    company: self.customer.company.clone(),
                })),
                Err(e) => {
                    merge_fields(&mut errors, e);
                    None
                }
            },
        };

        DomainError::check_fields(errors)?;
        match (plan_date, customer) {
            (Some(plan_date), Some(customer)) => Ok((
                EventDraft {
                    title: self.title.trim().to_string(),
                    description: self.description.clone(),
                    plan_date,
                    is_completed: self.is_completed,
                },
                customer,
            )),
            _ => Err(DomainError::internal("event input validated without a plan date or customer")),
        }
    }
}

fn merge_fields(into: &mut FieldErrors, err: DomainError) {
    if let Some(fields) = err.fields() {
        into.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
