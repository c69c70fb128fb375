use serde::{Deserialize, Serialize};

/// Represents an authenticated user extracted from a verified ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Unique user identifier from the identity provider (`sub` claim).
    pub user_id: String,
    /// User email address.
    pub email: String,
}
