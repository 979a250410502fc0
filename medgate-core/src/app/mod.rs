//! Assembled enforcement server
//!
//! ```rust,no_run
//! use medgate_core::app::MedgateServer;
//! use medgate_core::rbac::{MemoryUserDirectory, UserRecord};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let directory = MemoryUserDirectory::with_users([UserRecord::new("u-1", "doctor")]);
//! MedgateServer::builder()
//!     .with_port(8080)
//!     .with_directory(Arc::new(directory))
//!     .build()?
//!     .serve()
//!     .await
//! # }
//! ```

mod builder;

pub use builder::MedgateServerBuilder;

use crate::config::MedgateConfig;
use crate::http::{self, ApiRouter};
use crate::session::{self, SessionStore};
use anyhow::Result;
use std::sync::Arc;

pub struct MedgateServer {
    config: MedgateConfig,
    router: Arc<ApiRouter>,
    /// Present when callers are identified by session
    session_store: Option<Arc<dyn SessionStore>>,
}

impl MedgateServer {
    pub fn builder() -> MedgateServerBuilder {
        MedgateServerBuilder::new()
    }

    pub fn config(&self) -> &MedgateConfig {
        &self.config
    }

    pub fn router(&self) -> Arc<ApiRouter> {
        self.router.clone()
    }

    pub fn session_store(&self) -> Option<Arc<dyn SessionStore>> {
        self.session_store.clone()
    }

    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_address();
        log::info!(
            "Starting medgate on {} (identity: {:?}, resolution: {:?}, audit: {})",
            addr,
            self.config.rbac.identity_source,
            self.router.resolver().policy(),
            self.config.rbac.audit_decisions
        );

        let cleanup = self.session_store.map(|store| {
            let every = std::time::Duration::from_secs(self.config.sessions.cleanup_interval_secs);
            log::debug!("Sweeping expired sessions every {:?}", every);
            session::spawn_cleanup(store, every)
        });

        let result = http::serve(&addr, self.router).await;
        if let Some(handle) = cleanup {
            handle.abort();
        }
        result
    }
}
