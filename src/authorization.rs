//! Role authorization.
//!
//! Two concerns:
//! 1. The registration-time admin allow-list — configuration-driven and
//!    keyed by email identity, never by display name (a name collision
//!    must not grant admin).
//! 2. The server-side role gate for admin endpoints — checked against
//!    the caller's **stored** role, not any client-supplied claim.
//!
//! Default-deny: anything not explicitly an admin is a doctor.

use crate::models::{UserProfile, UserRole};

/// Why an admin check passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Stored role is admin.
    StoredAdminRole,
    /// Caller's stored role does not grant the operation.
    Denied,
}

/// Result of an authorization check.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

/// Role a fresh registration receives: admin iff the (normalized) email
/// is on the configured allow-list, doctor otherwise.
pub fn initial_role(email: &str, admin_emails: &[String]) -> UserRole {
    let normalized = email.trim().to_ascii_lowercase();
    if admin_emails.iter().any(|e| e == &normalized) {
        UserRole::Admin
    } else {
        UserRole::Doctor
    }
}

/// Check whether the caller may perform admin-only operations
/// (role table, role changes, profile deletion).
pub fn check_admin(caller: &UserProfile) -> AccessDecision {
    match caller.role {
        UserRole::Admin => AccessDecision {
            allowed: true,
            reason: AccessReason::StoredAdminRole,
        },
        UserRole::Doctor => AccessDecision {
            allowed: false,
            reason: AccessReason::Denied,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            uid: "u1".to_string(),
            name: "Admin".to_string(),
            email: "someone@clinic.com".to_string(),
            specialty: String::new(),
            role,
            signature: None,
        }
    }

    #[test]
    fn allowlisted_email_becomes_admin() {
        let list = vec!["chief@clinic.com".to_string()];
        assert_eq!(initial_role("chief@clinic.com", &list), UserRole::Admin);
        assert_eq!(initial_role(" Chief@Clinic.COM ", &list), UserRole::Admin);
    }

    #[test]
    fn unlisted_email_defaults_to_doctor() {
        let list = vec!["chief@clinic.com".to_string()];
        assert_eq!(initial_role("new@clinic.com", &list), UserRole::Doctor);
        assert_eq!(initial_role("new@clinic.com", &[]), UserRole::Doctor);
    }

    #[test]
    fn allow_list_is_keyed_by_email_not_name() {
        // A profile whose display name matches an admin's name gains
        // nothing — only the email identity is consulted.
        let list = vec!["chief@clinic.com".to_string()];
        assert_eq!(initial_role("impostor@clinic.com", &list), UserRole::Doctor);
    }

    #[test]
    fn admin_check_follows_stored_role() {
        assert!(check_admin(&profile(UserRole::Admin)).allowed);
        let denied = check_admin(&profile(UserRole::Doctor));
        assert!(!denied.allowed);
        assert_eq!(denied.reason, AccessReason::Denied);
    }
}
