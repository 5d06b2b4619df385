//! Infrastructure layer: document storage and the application services.

pub mod services;
pub mod store;


pub use services::{AuthPayload, CustomerDirectory, EventService, SchedulerBus, Services, Stores, UserService};
pub use store::{Document, DocumentStore, InMemoryDocumentStore, StoreError};
