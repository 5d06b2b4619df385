use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

use unshift_core::{DomainError, Entity};

/// A record type the store can hold.
///
/// The associated query and sort types describe the only predicates the
/// services need (owner equality/negation, planned-date range, email), so a
/// backend can translate them into its own query language.
pub trait Document: Entity + Clone + Send + Sync + 'static {
    type Query: Default + Send + Sync + 'static;
    type Sort: Copy + Default + Send + Sync + 'static;

    fn matches(&self, query: &Self::Query) -> bool;

    fn compare(&self, other: &Self, sort: Self::Sort) -> Ordering;
}

/// In-place edit applied by [`DocumentStore::update`].
pub type Mutation<D> = Box<dyn FnOnce(&mut D) + Send>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document store lock poisoned")]
    Poisoned,

    #[error("duplicate document id: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::internal(value.to_string())
    }
}

#[async_trait::async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError>;

    /// All documents matching `query`, ordered by `sort`.
    async fn find(&self, query: D::Query, sort: D::Sort) -> Result<Vec<D>, StoreError>;

    async fn insert(&self, doc: D) -> Result<D, StoreError>;

    /// Apply `mutation` to the stored document and return the new version.
    ///
    /// Returns `Ok(None)` when no document has that id.
    async fn update(&self, id: D::Id, mutation: Mutation<D>) -> Result<Option<D>, StoreError>;

    /// Remove and return the document, if present.
    async fn delete(&self, id: D::Id) -> Result<Option<D>, StoreError>;
}

#[async_trait::async_trait]
impl<D, S> DocumentStore<D> for Arc<S>
where
    D: Document,
    S: DocumentStore<D> + ?Sized,
{
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find(&self, query: D::Query, sort: D::Sort) -> Result<Vec<D>, StoreError> {
        (**self).find(query, sort).await
    }

    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        (**self).insert(doc).await
    }

    async fn update(&self, id: D::Id, mutation: Mutation<D>) -> Result<Option<D>, StoreError> {
        (**self).update(id, mutation).await
    }

    async fn delete(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        (**self).delete(id).await
    }
}
