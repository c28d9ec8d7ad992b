//! Chat session management.
//!
//! Each visitor owns one [`ChatSession`]: the message log, the loading flag,
//! and any replies scheduled but not yet delivered. Sessions live in the
//! in-memory [`SessionStore`] and are swept after a period of inactivity.
//!
//! # Architecture
//!
//! - [`ChatSession`]: message log plus idle / awaiting-response state
//! - [`SessionStore`]: thread-safe map of all live sessions
//!
//! # Example
//!
//! ```rust
//! use kidneyscan_web::session::{ChatState, SessionStore};
//!
//! let store = SessionStore::default();
//! let session = store.create();
//!
//! assert_eq!(session.message_count(), 1);
//! assert_eq!(session.state(), ChatState::Idle);
//! ```

mod thread;

pub use thread::{
    ChatSession, ChatState, DEFAULT_REPLY_DELAY, DEFAULT_SESSION_TIMEOUT, SessionSnapshot,
    SessionStore, SubmitOutcome,
};
