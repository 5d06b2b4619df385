//! Role-scoped visibility.
//!
//! One rule, applied in two places: when building a storage query (which
//! owners' rows to load) and when deciding whether a live notification reaches
//! a subscriber.

use serde::{Deserialize, Serialize};

use unshift_core::UserId;

use crate::{AuthzError, Principal};

/// Which owners' records a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The caller's own records.
    Own,
    /// Everyone else's records (managers only). Never includes the caller.
    Peers,
}

/// Whether `principal` may see a record owned by `owner` under `scope`.
pub fn can_see(principal: &Principal, owner: UserId, scope: Scope) -> bool {
    match scope {
        Scope::Own => principal.is(owner),
        Scope::Peers => principal.is_manager && !principal.is(owner),
    }
}

/// Delivery rule for live notifications.
///
/// Managers receive everything. Staff receive only notifications about their
/// own records; notifications with no owner (user topics) are manager-only.
pub fn can_receive(principal: &Principal, owner: Option<UserId>) -> bool {
    if principal.is_manager {
        return true;
    }
    owner.is_some_and(|owner| can_see(principal, owner, Scope::Own))
}

/// Storage-side owner predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerFilter {
    Eq(UserId),
    Ne(UserId),
}

impl OwnerFilter {
    /// Build the storage predicate for a scoped query.
    pub fn for_scope(principal: &Principal, scope: Scope) -> Result<Self, AuthzError> {
        match scope {
            Scope::Own => Ok(OwnerFilter::Eq(principal.id)),
            Scope::Peers => {
                crate::require_manager(principal)?;
                Ok(OwnerFilter::Ne(principal.id))
            }
        }
    }

    pub fn matches(&self, owner: UserId) -> bool {
        match self {
            OwnerFilter::Eq(id) => *id == owner,
            OwnerFilter::Ne(id) => *id != owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn principal(is_manager: bool) -> Principal {
        Principal {
            id: UserId::new(),
            email: "v@example.com".to_string(),
            username: "v".to_string(),
            is_manager,
        }
    }

    #[test]
    fn staff_peer_query_is_forbidden() {
        assert_eq!(
            OwnerFilter::for_scope(&principal(false), Scope::Peers),
            Err(AuthzError::ManagerRequired)
        );
    }

    #[test]
    fn manager_peer_scope_excludes_self() {
        let m = principal(true);
        let filter = OwnerFilter::for_scope(&m, Scope::Peers).unwrap();
        assert!(!filter.matches(m.id));
        assert!(filter.matches(UserId::new()));
        assert!(!can_see(&m, m.id, Scope::Peers));
    }

    #[test]
    fn staff_receive_only_own_and_never_user_topics() {
        let s = principal(false);
        assert!(can_receive(&s, Some(s.id)));
        assert!(!can_receive(&s, Some(UserId::new())));
        assert!(!can_receive(&s, None));
        assert!(can_receive(&principal(true), None));
    }

    proptest! {
        // own-scope match XOR manager peer-scope match, never both.
        #[test]
        fn can_see_is_own_xor_manager_peer(is_manager: bool, own_record: bool, peers: bool) {
            let p = principal(is_manager);
            let owner = if own_record { p.id } else { UserId::new() };
            let scope = if peers { Scope::Peers } else { Scope::Own };

            let own_rule = !peers && owner == p.id;
            let peer_rule = peers && is_manager && owner != p.id;
            prop_assert_eq!(can_see(&p, owner, scope), own_rule ^ peer_rule);

            // The storage predicate agrees with the pure rule whenever it can be built.
            if let Ok(filter) = OwnerFilter::for_scope(&p, scope) {
                prop_assert_eq!(filter.matches(owner), can_see(&p, owner, scope));
            }
        }
    }
}
