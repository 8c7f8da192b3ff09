//! The bot's own user identity.

use std::sync::OnceLock;

use crate::error::IdentityError;

/// The bot's own Slack user ID, assigned once per process.
///
/// The transport loop writes it when the connection acknowledges identity.
/// Filters and handlers only read it. Reconnects that report the same ID are
/// accepted; a different ID is rejected.
#[derive(Debug, Default)]
pub struct BotIdentity {
    user_id: OnceLock<String>,
}

impl BotIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an identity that is already assigned.
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        let identity = Self::new();
        let _ = identity.user_id.set(user_id.into());
        identity
    }

    /// Assigns the user ID.
    pub fn assign(&self, user_id: &str) -> Result<(), IdentityError> {
        if user_id.is_empty() {
            return Err(IdentityError::Empty);
        }

        let current = self.user_id.get_or_init(|| user_id.to_string());
        if current == user_id {
            Ok(())
        } else {
            Err(IdentityError::Conflict {
                current: current.clone(),
                attempted: user_id.to_string(),
            })
        }
    }

    /// Returns the user ID, if assigned.
    pub fn get(&self) -> Option<&str> {
        self.user_id.get().map(String::as_str)
    }

    /// Returns `true` if `user` is the bot itself.
    ///
    /// Always `false` before the identity is assigned.
    pub fn is_self(&self, user: &str) -> bool {
        self.get().is_some_and(|id| id == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_once() {
        let identity = BotIdentity::new();
        assert_eq!(identity.get(), None);
        assert!(!identity.is_self("UBOT"));

        identity.assign("UBOT").unwrap();
        assert_eq!(identity.get(), Some("UBOT"));
        assert!(identity.is_self("UBOT"));
        assert!(!identity.is_self("U1"));
    }

    #[test]
    fn test_reassign_same_id_is_accepted() {
        let identity = BotIdentity::with_user_id("UBOT");
        assert_eq!(identity.assign("UBOT"), Ok(()));
    }

    #[test]
    fn test_conflicting_assignment_is_rejected() {
        let identity = BotIdentity::with_user_id("UBOT");
        assert_eq!(
            identity.assign("UOTHER"),
            Err(IdentityError::Conflict {
                current: "UBOT".into(),
                attempted: "UOTHER".into(),
            })
        );
        assert_eq!(identity.get(), Some("UBOT"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let identity = BotIdentity::new();
        assert_eq!(identity.assign(""), Err(IdentityError::Empty));
        assert_eq!(identity.get(), None);
        assert!(!identity.is_self(""));
    }
}
