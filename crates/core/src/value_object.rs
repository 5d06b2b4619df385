//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity of its own; two values with the same fields
/// are the same value. The customer snapshot embedded in an event is one: it is
/// copied, never referenced.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
