//! Document storage boundary.
//!
//! Services only see the narrow [`DocumentStore`] trait: lookup by id, filtered
//! and sorted listing, insert, closure-based update, and delete. There is no
//! concurrency control; the last write wins.

pub mod document;
pub mod in_memory;
pub mod query;

pub use document::{Document, DocumentStore, Mutation, StoreError};
pub use in_memory::InMemoryDocumentStore;
pub use query::{CustomerQuery, EventQuery, EventSort, Recency, UserQuery};
