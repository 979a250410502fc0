//! Medgate - Core
//!
//! A declarative role-based permission engine for a clinical records
//! application. One static role table answers every question about what a
//! role may see or do; the server enforces the answers and the client uses
//! the same answers to shape its UI.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use medgate_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let directory = MemoryUserDirectory::with_users([UserRecord::new("u-1", "doctor")]);
//!
//!     MedgateServer::builder()
//!         .with_directory(Arc::new(directory))
//!         .with_routes(|router| {
//!             router.guarded(
//!                 Method::DELETE,
//!                 "/api/patients/*",
//!                 vec![PermissionGuard::permission(Module::Patients, ModuleAction::Delete)],
//!                 |_req, caller| async move { Ok(ok_json(&caller)) },
//!             )
//!         })
//!         .build()?
//!         .serve()
//!         .await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`permissions`] - the role table and the pure permission queries
//! - [`rbac`] - identity extraction and caller role resolution
//! - [`http`] - guards, the guarded router and the serve loop
//! - [`gate`] - client-side gating over the same queries
//! - [`session`] - session storage backing session-based identity
//! - [`app`] - server builder tying it together
//! - [`config`] / [`logging`] - TOML + env configuration, `log` backend

pub mod app;
pub mod config;
pub mod gate;
pub mod http;
pub mod logging;
pub mod permissions;
pub mod prelude;
pub mod rbac;
pub mod session;
