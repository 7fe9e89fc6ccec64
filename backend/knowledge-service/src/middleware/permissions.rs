/// Capability checks for the listing endpoints
///
/// The permission model is a boolean capability check over the request
/// principal. Listing views reject with 403; the typeahead endpoints
/// degrade to an empty result instead (handled at the call site).
use crate::error::{AppError, Result};
use crate::middleware::Principal;

/// Require the index-view capability.
pub fn check_index_view(principal: &Principal) -> Result<()> {
    if principal.can_view_index() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to browse the knowledge index".to_string(),
        ))
    }
}

/// Require an authenticated user, returning their id.
pub fn require_user(principal: &Principal) -> Result<i64> {
    principal
        .user_id
        .ok_or_else(|| AppError::Unauthorized("Sign-in required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_view_follows_capability() {
        assert!(check_index_view(&Principal::anonymous(true)).is_ok());
        assert!(check_index_view(&Principal::anonymous(false)).is_err());
    }

    #[test]
    fn require_user_rejects_anonymous() {
        assert!(require_user(&Principal::anonymous(true)).is_err());
        let principal = Principal {
            user_id: Some(7),
            identifier: Some("ann".to_string()),
            capabilities: vec![],
        };
        assert_eq!(require_user(&principal).unwrap(), 7);
    }
}
