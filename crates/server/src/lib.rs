// crates/server/src/lib.rs
//! Emby-compatible server collaborators
//!
//! Everything the reconciliation engine is explicitly not: per-account
//! authentication, shared-playlist resolution, watched-state fetches and
//! the remote pushes that apply a sync plan. All HTTP lives here.

mod auth;
mod client;
mod dispatch;
mod error;
mod library;
mod watched;

pub use auth::{authenticate, AuthSession};
pub use client::ServerClient;
pub use dispatch::{dispatch_plan, DispatchReport};
pub use error::{ServerError, ServerResult};
pub use library::list_shared_item_ids;
pub use watched::fetch_watched;
