//! Identity from a server-side session

use crate::rbac::context::Identity;
use crate::rbac::traits::IdentityExtractor;
use crate::session::{SessionConfig, SessionStore, SessionTokens};
use anyhow::Result;
use http::HeaderMap;
use std::sync::Arc;

/// Resolves the session id found in a cookie or Bearer header
///
/// Expired sessions, and sessions idle for longer than the configured
/// `max_age`, are deleted and the request is treated as anonymous. Every
/// other hit slides the session's expiry to `max_age` from now.
pub struct SessionIdentity {
    store: Arc<dyn SessionStore>,
    tokens: SessionTokens,
}

impl SessionIdentity {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, tokens: SessionTokens::new(config) }
    }
}

#[async_trait::async_trait]
impl IdentityExtractor for SessionIdentity {
    async fn extract(&self, headers: &HeaderMap) -> Result<Option<Identity>> {
        let Some(id) = self.tokens.extract(headers) else {
            return Ok(None);
        };

        let Some(mut session) = self.store.get(&id).await? else {
            log::debug!("Unknown session id presented");
            return Ok(None);
        };

        let max_age = self.tokens.config().max_age;
        if session.is_expired() || session.is_idle(max_age) {
            log::debug!("Session for '{}' expired, removing it", session.subject);
            self.store.delete(&id).await?;
            return Ok(None);
        }

        session.touch(max_age);
        let subject = session.subject.clone();
        self.store.set(session).await?;

        Ok(Some(Identity::new(subject)))
    }

    fn name(&self) -> &str {
        "session"
    }
}
