//! Collaborator seams of the enforcement layer

use super::context::{Identity, UserRecord};
use anyhow::Result;
use http::HeaderMap;

/// Finds the authenticated subject of a request
///
/// Implement this trait to plug in another authentication upstream.
#[async_trait::async_trait]
pub trait IdentityExtractor: Send + Sync {
    /// `Ok(None)` for an anonymous request, `Err` only for internal failures
    async fn extract(&self, headers: &HeaderMap) -> Result<Option<Identity>>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}

/// User repository consulted for the caller's current role
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the user does not exist, `Err` when the store is unavailable
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>>;
}
