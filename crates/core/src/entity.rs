//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stored documents (users, customers, events) implement this so storage can
/// key them without knowing their shape.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
