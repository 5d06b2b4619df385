//! `unshift-core` - shared building blocks for the scheduler.
//!
//! This crate contains **pure** primitives (no storage, no transport).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind, FieldErrors};
pub use id::{CustomerId, EventId, UserId};
pub use value_object::ValueObject;
