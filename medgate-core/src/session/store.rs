//! Session storage trait and types

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated session binding an opaque id to a subject
///
/// Sessions carry the subject only. The subject's role is looked up again
/// on every request so a role change takes effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID (cookie value or Bearer token)
    pub id: String,

    /// Authenticated subject (user id)
    pub subject: String,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    /// Last access time (for sliding expiration)
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            subject: subject.into(),
            created_at: now,
            expires_at,
            last_accessed_at: now,
        }
    }

    /// Open a session for `subject` with a random id, valid for `max_age`
    pub fn issue(subject: impl Into<String>, max_age: Duration) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), subject, Utc::now() + max_age)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Unused for longer than `max_age`, whatever `expires_at` says
    pub fn is_idle(&self, max_age: Duration) -> bool {
        Utc::now() - self.last_accessed_at > max_age
    }

    /// Record an access and slide expiry to `max_age` from now
    pub fn touch(&mut self, max_age: Duration) {
        let now = Utc::now();
        self.last_accessed_at = now;
        self.expires_at = now + max_age;
    }
}

/// Session storage trait
///
/// Implement this trait to back sessions with an external store.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    async fn set(&self, session: Session) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn cleanup_expired(&self) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

#[async_trait::async_trait]
impl<S: SessionStore> SessionStore for std::sync::Arc<S> {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        (**self).get(id).await
    }

    async fn set(&self, session: Session) -> Result<()> {
        (**self).set(session).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        (**self).cleanup_expired().await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_session() {
        let session = Session::issue("user-1", Duration::hours(1));
        assert_eq!(session.subject, "user-1");
        assert!(!session.id.is_empty());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expiration() {
        let session = Session::new("s", "user-1", Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_idle_session() {
        let mut session = Session::new("s", "user-1", Utc::now() + Duration::days(365));
        session.last_accessed_at = Utc::now() - Duration::days(30);
        assert!(!session.is_expired());
        assert!(session.is_idle(Duration::hours(8)));
        assert!(!session.is_idle(Duration::days(31)));
    }

    #[test]
    fn test_touch_slides_expiry() {
        let mut session = Session::new("s", "user-1", Utc::now() + Duration::seconds(5));
        session.last_accessed_at = Utc::now() - Duration::minutes(10);

        session.touch(Duration::hours(1));
        assert!(!session.is_idle(Duration::minutes(1)));
        assert!(session.expires_at > Utc::now() + Duration::minutes(59));
        assert!(session.expires_at <= Utc::now() + Duration::hours(1));
    }

    #[test]
    fn test_two_sessions_have_distinct_ids() {
        let a = Session::issue("user-1", Duration::hours(1));
        let b = Session::issue("user-1", Duration::hours(1));
        assert_ne!(a.id, b.id);
    }
}
