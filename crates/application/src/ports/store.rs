//! Credential store port.

use aegis_domain::Credential;

/// Port for the persistent credential holder (the localStorage analog).
///
/// Get/set/clear only; no logic lives here. `set` and `clear` replace both
/// tokens together so the stored pair is never half-updated.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Stores the credential, replacing any previous one.
    fn set(&self, credential: &Credential);

    /// Removes the stored credential.
    fn clear(&self);

    /// Convenience: the stored access token.
    fn access_token(&self) -> Option<String> {
        self.get().map(|c| c.access)
    }

    /// Convenience: the stored refresh token.
    fn refresh_token(&self) -> Option<String> {
        self.get().and_then(|c| c.refresh)
    }
}
