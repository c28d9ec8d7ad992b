//! Scripted kidney-cancer assistant.
//!
//! This module holds the pieces of the chat widget that carry no session
//! state: the message record and the canned [`responder`] that picks a
//! reply for a user question.
//!
//! # Example
//!
//! ```rust
//! use kidneyscan_web::chat::{ResponseCategory, classify, select_response};
//!
//! assert_eq!(classify("What are the symptoms?"), Some(ResponseCategory::Symptoms));
//! assert!(!select_response("anything at all").is_empty());
//! ```

mod message;
pub mod responder;

/// Longest question accepted from a visitor, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub use message::{ChatMessage, MessageRole};
pub use responder::{FALLBACK_RESPONSE, GREETING, ResponseCategory, classify, select_response};
