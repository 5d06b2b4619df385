//! Scheduling domain module (users, customers, events).
//!
//! This crate contains the record types, input validation, and the event
//! lifecycle rules, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage). Timestamps are always passed in.

pub mod customer;
pub mod date_range;
pub mod event;
pub mod notification;
pub mod user;
pub mod views;

pub use customer::{
    CreateCustomerInput, Customer, CustomerSnapshot, PLACEHOLDER_COMPANY_CONTACT, PLACEHOLDER_TEXT,
    UpdateCustomerInput,
};
pub use date_range::{DateRange, parse_plan_date};
pub use event::{CreateEventInput, CustomerInfoInput, CustomerRef, Event, EventDraft, Transition, TransitionOutcome};
pub use notification::Notification;
pub use user::{LoginInput, ProfileUpdate, RegisterInput, User, UserView};
pub use views::{CustomerView, EventView, ResolvedEvent};

/// A merge-input field counts as "provided" only when it has non-blank text.
///
/// `None`, `""`, and whitespace-only all mean "leave the stored value alone".
pub(crate) fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
