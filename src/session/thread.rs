//! Chat session state and session storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::{self, ChatMessage, GREETING, ResponseCategory};

/// Simulated typing latency before the assistant answers.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Whether the widget is waiting on a scripted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatState {
    /// No reply outstanding.
    Idle,
    /// At least one reply is scheduled and not yet delivered.
    AwaitingResponse,
}

impl ChatState {
    /// Wire name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingResponse => "awaiting-response",
        }
    }
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The text was logged and a reply scheduled.
    Accepted,
    /// The text was blank; nothing changed.
    Ignored,
}

/// A single visitor's conversation with the scripted assistant.
///
/// Cloning is cheap and every clone refers to the same log.
#[derive(Debug, Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// Delay before a scheduled reply lands.
    reply_delay: Duration,
    /// Seed message restored on every reset.
    greeting: ChatMessage,
    /// Conversation log and outstanding replies.
    log: RwLock<MessageLog>,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
    /// Bumped on every log change.
    revision: watch::Sender<u64>,
}

#[derive(Debug)]
struct MessageLog {
    messages: Vec<ChatMessage>,
    pending_replies: usize,
    /// Cancelled and replaced on reset so stale replies never land.
    replies: CancellationToken,
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub state: ChatState,
    pub revision: u64,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session whose log holds only the greeting.
    fn new(id: String, reply_delay: Duration) -> Self {
        let now = Utc::now();
        let greeting = ChatMessage::assistant(GREETING);
        let (revision, _) = watch::channel(0);

        Self {
            inner: Arc::new(SessionInner {
                id,
                reply_delay,
                log: RwLock::new(MessageLog {
                    messages: vec![greeting.clone()],
                    pending_replies: 0,
                    replies: CancellationToken::new(),
                }),
                greeting,
                created_at: now,
                last_activity: RwLock::new(now),
                revision,
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The seeded greeting message.
    #[must_use]
    pub fn greeting(&self) -> &ChatMessage {
        &self.inner.greeting
    }

    /// Delay applied to every scheduled reply.
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        self.inner.reply_delay
    }

    /// Get all messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.read_log().messages.clone()
    }

    /// Get the number of messages in the log.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.read_log().messages.len()
    }

    /// Current widget state.
    #[must_use]
    pub fn state(&self) -> ChatState {
        if self.read_log().pending_replies > 0 {
            ChatState::AwaitingResponse
        } else {
            ChatState::Idle
        }
    }

    /// Number of log changes since the session was created.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Watch the log revision; the receiver fires on every append or reset.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Log a visitor message and schedule the scripted reply.
    ///
    /// Blank or whitespace-only text is ignored. Must be called from within
    /// a Tokio runtime, which runs the delayed reply.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            debug!(session_id = %self.id(), "Ignoring blank submission");
            return SubmitOutcome::Ignored;
        }

        let token = {
            let mut log = self.write_log();
            log.messages.push(ChatMessage::user(text));
            log.pending_replies += 1;
            self.bump_revision();
            log.replies.clone()
        };
        self.touch();

        let category = chat::classify(text);
        info!(
            name: "chat.reply.scheduled",
            session_id = %self.id(),
            category = category.map_or("fallback", ResponseCategory::as_str),
            delay = ?self.inner.reply_delay,
            "Reply scheduled"
        );

        let session = self.clone();
        let question = text.to_owned();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!(session_id = %session.id(), "Scheduled reply cancelled");
                }
                () = tokio::time::sleep(session.inner.reply_delay) => {
                    session.deliver_reply(&token, &question);
                }
            }
        });

        SubmitOutcome::Accepted
    }

    /// Restore the log to the single greeting and drop pending replies.
    pub fn reset(&self) {
        let cancelled = {
            let mut log = self.write_log();
            log.replies.cancel();
            log.replies = CancellationToken::new();
            log.messages.clear();
            log.messages.push(self.inner.greeting.clone());
            self.bump_revision();
            std::mem::take(&mut log.pending_replies)
        };
        self.touch();

        info!(
            name: "chat.session.reset",
            session_id = %self.id(),
            cancelled_replies = cancelled,
            "Conversation reset"
        );
    }

    /// Cancel any replies still in flight. The log is left untouched.
    pub fn close(&self) {
        let mut log = self.write_log();
        log.replies.cancel();
        let cancelled = std::mem::take(&mut log.pending_replies);
        if cancelled > 0 {
            debug!(session_id = %self.id(), cancelled_replies = cancelled, "Session closed");
        }
    }

    /// Take a serializable snapshot of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let (messages, state) = {
            let log = self.read_log();
            let state = if log.pending_replies > 0 {
                ChatState::AwaitingResponse
            } else {
                ChatState::Idle
            };
            (log.messages.clone(), state)
        };

        SessionSnapshot {
            id: self.inner.id.clone(),
            state,
            revision: self.revision(),
            messages,
            created_at: self.inner.created_at,
            last_activity: self.last_activity(),
        }
    }

    /// Time of the last submission, reply or reset.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if the session has been idle for at least `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        match (Utc::now() - self.last_activity()).to_std() {
            Ok(idle) => idle >= timeout,
            // "last" is in the future: clock skew.
            Err(_) => false,
        }
    }

    /// Get the session age.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.inner.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn deliver_reply(&self, token: &CancellationToken, question: &str) {
        let reply = ChatMessage::assistant(chat::select_response(question));
        {
            let mut log = self.write_log();
            // Checked under the lock so a racing reset always wins.
            if token.is_cancelled() {
                debug!(session_id = %self.id(), "Dropping reply for a reset conversation");
                return;
            }
            log.messages.push(reply);
            log.pending_replies = log.pending_replies.saturating_sub(1);
            self.bump_revision();
        }
        self.touch();

        debug!(
            name: "chat.reply.delivered",
            session_id = %self.id(),
            "Reply delivered"
        );
    }

    fn bump_revision(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    fn read_log(&self) -> RwLockReadGuard<'_, MessageLog> {
        self.inner.log.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, MessageLog> {
        self.inner.log.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe store for sessions.
///
/// Provides methods for creating, retrieving, and cleaning up sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, ChatSession>>,
    reply_delay: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

impl SessionStore {
    /// Create a store whose sessions answer after `reply_delay`.
    #[must_use]
    pub fn new(reply_delay: Duration) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                reply_delay,
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> ChatSession {
        self.create_with_id(Uuid::new_v4().to_string())
    }

    /// Create a new session with a specific ID, replacing any existing one.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> ChatSession {
        let id = id.into();
        let session = ChatSession::new(id.clone(), self.inner.reply_delay);
        if let Some(previous) = self.write_sessions().insert(id, session.clone()) {
            previous.close();
        }
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ChatSession> {
        self.read_sessions().get(id).cloned()
    }

    /// Get a session by ID, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> ChatSession {
        if let Some(session) = self.get(id) {
            return session;
        }

        let reply_delay = self.inner.reply_delay;
        self.write_sessions()
            .entry(id.to_owned())
            .or_insert_with(|| {
                debug!(session_id = %id, "Created session on demand");
                ChatSession::new(id.to_owned(), reply_delay)
            })
            .clone()
    }

    /// Remove a session by ID, cancelling its pending replies.
    pub fn remove(&self, id: &str) -> Option<ChatSession> {
        let removed = self.write_sessions().remove(id);
        if let Some(session) = &removed {
            session.close();
        }
        removed
    }

    /// Get the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_sessions().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all live sessions.
    #[must_use]
    pub fn list(&self) -> Vec<ChatSession> {
        self.read_sessions().values().cloned().collect()
    }

    /// Remove sessions that have been inactive at least `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self, timeout: Duration) -> usize {
        let mut guard = self.write_sessions();
        let before = guard.len();
        guard.retain(|_, session| {
            let expired = session.is_expired_with_timeout(timeout);
            if expired {
                session.close();
            }
            !expired
        });
        before - guard.len()
    }

    /// Sweep expired sessions every `every` until the runtime shuts down.
    pub fn spawn_cleanup(&self, every: Duration, timeout: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired(timeout);
                if removed > 0 {
                    info!(
                        name: "session.cleanup",
                        removed,
                        remaining = store.len(),
                        "Expired sessions removed"
                    );
                }
            }
        })
    }

    fn read_sessions(&self) -> RwLockReadGuard<'_, HashMap<String, ChatSession>> {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(&self) -> RwLockWriteGuard<'_, HashMap<String, ChatSession>> {
        self.inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FALLBACK_RESPONSE, MessageRole};

    fn session() -> ChatSession {
        ChatSession::new("test-123".to_string(), DEFAULT_REPLY_DELAY)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = session();

        assert_eq!(session.id(), "test-123");
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.messages(), vec![session.greeting().clone()]);
        assert_eq!(session.greeting().role, MessageRole::Assistant);
        assert_eq!(session.greeting().content, GREETING);
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let session = session();
        let before = session.messages();

        for text in ["", "   ", "\n\t  "] {
            assert_eq!(session.submit(text), SubmitOutcome::Ignored);
        }

        assert_eq!(session.messages(), before);
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.revision(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_lands_after_delay() {
        let session = session();

        assert_eq!(session.submit("What are the symptoms?"), SubmitOutcome::Accepted);
        assert_eq!(session.state(), ChatState::AwaitingResponse);
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[1].content, "What are the symptoms?");
        assert_eq!(session.messages()[1].role, MessageRole::User);

        advance(500).await;
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.state(), ChatState::AwaitingResponse);

        advance(600).await;
        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(
            messages[2].content,
            ResponseCategory::Symptoms.response()
        );
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_text_is_kept_as_typed() {
        let session = session();

        session.submit("  kidney stones  ");
        advance(1100).await;

        let messages = session.messages();
        assert_eq!(messages[1].content, "  kidney stones  ");
        assert_eq!(messages[2].content, FALLBACK_RESPONSE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_greeting() {
        let session = session();

        session.submit("What treatment is available?");
        advance(1100).await;
        assert_eq!(session.message_count(), 3);

        session.reset();
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], *session.greeting());
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_reply() {
        let session = session();

        session.submit("Is this accurate?");
        assert_eq!(session.state(), ChatState::AwaitingResponse);

        session.reset();
        assert_eq!(session.state(), ChatState::Idle);

        advance(2000).await;
        assert_eq!(session.messages(), vec![session.greeting().clone()]);
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_submissions_get_their_own_replies() {
        let session = session();

        session.submit("symptoms?");
        advance(300).await;
        session.submit("treatment?");

        // First reply has landed, second is still pending.
        advance(800).await;
        assert_eq!(session.message_count(), 4);
        assert_eq!(session.state(), ChatState::AwaitingResponse);

        advance(400).await;
        let contents: Vec<_> = session.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(
            contents,
            vec![
                GREETING.to_string(),
                "symptoms?".to_string(),
                "treatment?".to_string(),
                ResponseCategory::Symptoms.response().to_string(),
                ResponseCategory::Treatment.response().to_string(),
            ]
        );
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_revision_tracks_log_changes() {
        let session = session();
        let mut changes = session.subscribe();

        session.submit("risk factors");
        assert_eq!(session.revision(), 1);
        assert!(changes.has_changed().unwrap());
        let _ = changes.borrow_and_update();

        advance(1100).await;
        assert_eq!(session.revision(), 2);
        assert!(changes.has_changed().unwrap());

        session.reset();
        assert_eq!(session.revision(), 3);
    }

    #[test]
    fn test_snapshot_serializes_state() {
        let session = session();
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["id"], "test-123");
        assert_eq!(json["state"], "idle");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "assistant");
    }

    #[test]
    fn test_session_store() {
        let store = SessionStore::default();

        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());

        store.remove(session.id());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_or_create_reuses_sessions() {
        let store = SessionStore::default();

        let first = store.get_or_create("abc");
        let second = store.get_or_create("abc");

        assert_eq!(store.len(), 1);
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removing_session_cancels_reply() {
        let store = SessionStore::default();
        let session = store.create();

        session.submit("How does screening work?");
        store.remove(session.id());

        assert_eq!(session.state(), ChatState::Idle);

        advance(2000).await;
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.snapshot().state, ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_session_is_idle() {
        let store = SessionStore::default();
        let first = store.create_with_id("same");

        first.submit("What are the risk factors?");
        assert_eq!(first.state(), ChatState::AwaitingResponse);

        let second = store.create_with_id("same");
        assert_eq!(first.state(), ChatState::Idle);
        assert_eq!(second.state(), ChatState::Idle);

        advance(2000).await;
        assert_eq!(first.message_count(), 2);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::default();
        let _ = store.create();
        let _ = store.create();

        assert_eq!(store.cleanup_expired(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 2);

        assert_eq!(store.cleanup_expired(Duration::ZERO), 2);
        assert!(store.is_empty());
    }
}
