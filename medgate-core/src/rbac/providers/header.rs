//! Identity from a trusted upstream header
//!
//! For deployments behind an authenticating proxy that forwards the
//! verified subject id (for example `x-user-id`). The proxy must strip the
//! header from client traffic.

use crate::rbac::context::Identity;
use crate::rbac::traits::IdentityExtractor;
use anyhow::Result;
use http::{HeaderMap, HeaderName};

pub struct HeaderIdentity {
    header: HeaderName,
}

impl HeaderIdentity {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Build from a configured header name
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(HeaderName::from_bytes(name.as_bytes())?))
    }
}

#[async_trait::async_trait]
impl IdentityExtractor for HeaderIdentity {
    async fn extract(&self, headers: &HeaderMap) -> Result<Option<Identity>> {
        let subject = headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|subject| !subject.is_empty());

        Ok(subject.map(Identity::new))
    }

    fn name(&self) -> &str {
        "header"
    }
}
