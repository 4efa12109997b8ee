use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// A clinic user profile. `uid` is the identity provider's account id;
/// `signature` is an opaque encoded image blob (data-URI string), never
/// decoded by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub role: UserRole,
    pub signature: Option<String>,
}
