//! KidneyScan web front-end.
//!
//! A server-rendered site with two interactive pieces: a responsive
//! navigation bar and a scripted assistant that answers kidney-cancer
//! questions from a fixed set of canned responses.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving pages, HTMX fragments and a JSON API
//! - **Chat**: keyword-routed reply selection and per-visitor sessions
//! - **UI**: `format!`-rendered HTML driven by HTMX
//!
//! # Modules
//!
//! - [`chat`]: message records and the canned responder
//! - [`session`]: chat sessions and the in-memory session store
//! - [`nav`]: navigation items, active-entry detection and menu state
//! - [`ui`]: HTML rendering
//! - [`server`]: routes and handlers
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod chat;
pub mod config;
pub mod error;
pub mod nav;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store for conversation management.
    pub sessions: SessionStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Fresh state with an empty session store configured from `config`.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            sessions: SessionStore::new(config.chat.reply_delay()),
            config,
        }
    }
}
