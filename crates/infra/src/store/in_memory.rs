use std::collections::HashMap;
use std::sync::RwLock;

use super::document::{Document, DocumentStore, Mutation, StoreError};

/// In-memory document store for tests/dev.
///
/// The lock is held only for the duration of one call.
#[derive(Debug)]
pub struct InMemoryDocumentStore<D: Document> {
    inner: RwLock<HashMap<D::Id, D>>,
}

impl<D: Document> InMemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D: Document> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<D: Document> DocumentStore<D> for InMemoryDocumentStore<D> {
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn find(&self, query: D::Query, sort: D::Sort) -> Result<Vec<D>, StoreError> {
        let mut docs: Vec<D> = {
            let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
            map.values().filter(|d| d.matches(&query)).cloned().collect()
        };
        docs.sort_by(|a, b| a.compare(b, sort));
        Ok(docs)
    }

    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = doc.id();
        if map.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("{id:?}")));
        }
        map.insert(id, doc.clone());
        Ok(doc)
    }

    async fn update(&self, id: D::Id, mutation: Mutation<D>) -> Result<Option<D>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(doc) = map.get_mut(&id) else {
            return Ok(None);
        };
        mutation(doc);
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(&id))
    }
}
