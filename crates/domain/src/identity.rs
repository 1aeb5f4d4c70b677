//! The authenticated user's identity.

use serde::{Deserialize, Serialize};

/// Identity as returned by the backend profile lookup (`/api/users/me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user id.
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Backend role string (e.g. "USER").
    pub role: String,
}
