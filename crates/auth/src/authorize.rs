use thiserror::Error;

use unshift_core::{DomainError, UserId};

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("manager role required")]
    ManagerRequired,

    #[error("action not allowed on a record owned by another user")]
    NotOwner,
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::forbidden(value.to_string())
    }
}

/// Manager-only operations.
///
/// - No IO
/// - No panics
pub fn require_manager(principal: &Principal) -> Result<(), AuthzError> {
    if principal.is_manager {
        Ok(())
    } else {
        Err(AuthzError::ManagerRequired)
    }
}

/// Strict ownership: only the owner may act (e.g. deleting a customer).
pub fn ensure_owner(principal: &Principal, owner: UserId) -> Result<(), AuthzError> {
    if principal.is(owner) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

/// Owner, or any manager acting on a peer's record.
pub fn ensure_owner_or_manager(principal: &Principal, owner: UserId) -> Result<(), AuthzError> {
    if principal.is(owner) || principal.is_manager {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}
