use unshift_core::UserId;

use crate::Topic;

/// A publishable change notification.
///
/// Notifications are:
/// - **immutable** (treat them as facts)
/// - **routed by topic**
/// - **attributed** to the user owning the changed record, when there is one
pub trait Notification: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn topic(&self) -> Topic;

    /// Owner of the record this notification is about.
    ///
    /// `None` for notifications that are not about an owned record (users).
    fn owner(&self) -> Option<UserId>;
}
