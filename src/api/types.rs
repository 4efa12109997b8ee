//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::models::UserProfile;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware after token validation. Carries the **stored** profile —
/// role checks never trust client-supplied claims.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub profile: UserProfile,
}
