use serde::{Deserialize, Serialize};

use unshift_core::UserId;

/// The authenticated caller: identity plus role, derived from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_manager: bool,
}

impl Principal {
    /// Whether this principal is the given user.
    pub fn is(&self, user_id: UserId) -> bool {
        self.id == user_id
    }
}
