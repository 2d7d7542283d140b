//! Session scoping.

use crate::uuids::UserUuid;

/// The storage scope a cart or wishlist operation runs against.
///
/// Callers pass the session explicitly on every operation; services never
/// consult ambient state. The anonymous→user transition happens once, at
/// login, through the explicit merge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// No authenticated user; data lives in the key-value scope.
    Anonymous,
    /// An authenticated user; data lives in the structured scope.
    User(UserUuid),
}

impl Session {
    /// The authenticated user, when present.
    #[must_use]
    pub fn user(&self) -> Option<UserUuid> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(*user),
        }
    }
}
