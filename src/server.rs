//! HTTP surface: pages, HTMX fragments and the JSON API.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, Query, Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{
        Html, IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::WatchStream;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::chat::{ChatMessage, MAX_MESSAGE_CHARS};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::nav::{MenuState, NavController};
use crate::session::{ChatSession, ChatState, SessionSnapshot, SubmitOutcome};
use crate::ui::chat::{render_chat_poll, render_chat_widget};
use crate::ui::{navbar::render_navbar, pages};

/// Cookie carrying the visitor's chat session id.
pub const SESSION_COOKIE: &str = "kidneyscan_session";

/// Longest session id a client may pick.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config));

    let cleanup = state.sessions.spawn_cleanup(
        config.chat.cleanup_interval(),
        config.chat.session_timeout(),
    );

    let app = router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        reply_delay_ms = config.chat.reply_delay_ms,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // HTML pages
        .route("/", get(home_page))
        .route("/scan", get(scan_page))
        .route("/chat", get(chat_page))
        .route("/about", get(about_page))
        // HTMX fragments
        .route("/ui/navbar", get(navbar_fragment))
        .route("/ui/chat/{id}", get(chat_widget_fragment))
        .route("/ui/chat/{id}/log", get(chat_log_fragment))
        .route("/ui/chat/{id}/messages", post(chat_submit_fragment))
        .route("/ui/chat/{id}/reset", post(chat_reset_fragment))
        // JSON API
        .route("/api/chat", post(api_chat))
        .route("/api/sessions", get(api_list_sessions).post(api_create_session))
        .route(
            "/api/sessions/{id}",
            get(api_get_session).delete(api_delete_session),
        )
        .route("/api/sessions/{id}/messages", get(api_get_messages))
        .route("/api/sessions/{id}/reset", post(api_reset_session))
        .route("/api/sessions/{id}/events", get(api_session_events))
        .route("/health", get(|| async { "ok" }))
        // Static assets
        .nest_service("/static", static_dir)
        .fallback(not_found_page)
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Render a page reached by following a nav link to `path`.
fn page(title: &str, path: &str, content: &str) -> Html<String> {
    let mut nav = NavController::default();
    nav.activate(path);
    Html(pages::html_shell(title, &nav, content))
}

async fn home_page() -> Html<String> {
    page("Home", "/", pages::home_content())
}

async fn scan_page() -> Html<String> {
    page("Image Analysis", "/scan", pages::scan_content())
}

async fn about_page() -> Html<String> {
    page("About", "/about", pages::about_content())
}

/// Assistant page; reuses the visitor's session from the cookie when it is
/// still live.
async fn chat_page(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let session = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()))
        .unwrap_or_else(|| {
            let session = state.sessions.create();
            tracing::debug!(session_id = %session.id(), "Created session for chat page");
            session
        });

    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let body = page(
        "Assistant",
        "/chat",
        &pages::chat_content(&session.snapshot()),
    );
    (jar.add(cookie), body)
}

async fn not_found_page(uri: Uri) -> (StatusCode, Html<String>) {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        page("Not Found", uri.path(), pages::not_found_content()),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// HTMX Fragment Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for the navbar fragment.
#[derive(Debug, Deserialize)]
struct NavbarQuery {
    /// Page the navbar is rendered on.
    #[serde(default = "default_path")]
    path: String,
    /// Menu state before this request.
    #[serde(default)]
    menu: MenuState,
    /// Whether the menu button was pressed.
    #[serde(default)]
    toggle: bool,
}

fn default_path() -> String {
    "/".to_string()
}

/// GET /ui/navbar - Navbar in its next state.
async fn navbar_fragment(Query(query): Query<NavbarQuery>) -> Html<String> {
    let mut nav = NavController::new(query.path).with_menu(query.menu);
    if query.toggle {
        nav.toggle_menu();
    }
    Html(render_navbar(&nav))
}

/// Form body posted by the chat widget.
#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    message: String,
}

/// GET /ui/chat/:id - Current widget.
async fn chat_widget_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let session = client_session(&state, &id)?;
    Ok(Html(render_chat_widget(&session.snapshot())))
}

/// GET /ui/chat/:id/log - Message log and send button, polled while typing.
async fn chat_log_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let session = client_session(&state, &id)?;
    Ok(Html(render_chat_poll(&session.snapshot())))
}

/// POST /ui/chat/:id/messages - Submit a question from the widget form.
async fn chat_submit_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>> {
    let session = client_session(&state, &id)?;
    submit(&session, &form.message)?;
    Ok(Html(render_chat_widget(&session.snapshot())))
}

/// POST /ui/chat/:id/reset - Reset the conversation from the widget.
async fn chat_reset_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let session = client_session(&state, &id)?;
    session.reset();
    Ok(Html(render_chat_widget(&session.snapshot())))
}

/// Look up or create a session under an id chosen by the client.
///
/// Ids are limited to [`MAX_SESSION_ID_LEN`] ASCII letters, digits, `-` and `_`.
fn client_session(state: &AppState, id: &str) -> Result<ChatSession> {
    if id.is_empty() || id.len() > MAX_SESSION_ID_LEN {
        return Err(AppError::InvalidRequest(format!(
            "session id must be 1 to {MAX_SESSION_ID_LEN} characters"
        )));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(AppError::InvalidRequest(
            "session id may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(state.sessions.get_or_create(id))
}

fn submit(session: &ChatSession, message: &str) -> Result<SubmitOutcome> {
    let length = message.chars().count();
    if length > MAX_MESSAGE_CHARS {
        return Err(AppError::InvalidRequest(format!(
            "message is {length} characters, the limit is {MAX_MESSAGE_CHARS}"
        )));
    }
    Ok(session.submit(message))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for chat API.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// User message content.
    message: String,
    /// Optional session ID (creates new if not provided).
    #[serde(default)]
    session_id: Option<String>,
}

/// Response from chat API.
#[derive(Debug, Serialize)]
struct ChatResponse {
    /// Session ID for this conversation.
    session_id: String,
    /// False when the message was blank and nothing was logged.
    accepted: bool,
    /// Session state after the submission.
    state: ChatState,
}

/// POST /api/chat - Submit a question.
async fn api_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let session = match req.session_id.as_deref() {
        Some(id) if !id.is_empty() => client_session(&state, id)?,
        _ => {
            let session = state.sessions.create();
            tracing::debug!(session_id = %session.id(), "Created new session");
            session
        }
    };

    let outcome = submit(&session, &req.message)?;

    Ok(Json(ChatResponse {
        session_id: session.id().to_string(),
        accepted: outcome == SubmitOutcome::Accepted,
        state: session.state(),
    }))
}

/// Session info for listing.
#[derive(Debug, Serialize)]
struct SessionInfo {
    id: String,
    state: ChatState,
    message_count: usize,
}

impl From<&ChatSession> for SessionInfo {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id().to_string(),
            state: session.state(),
            message_count: session.message_count(),
        }
    }
}

fn find_session(state: &AppState, id: String) -> Result<ChatSession> {
    state
        .sessions
        .get(&id)
        .ok_or(AppError::SessionNotFound(id))
}

/// GET /api/sessions - List all sessions.
async fn api_list_sessions(State(state): State<AppState>) -> Json<Vec<SessionInfo>> {
    Json(state.sessions.list().iter().map(SessionInfo::from).collect())
}

/// POST /api/sessions - Create a new session.
async fn api_create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionInfo>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(SessionInfo::from(&session)))
}

/// GET /api/sessions/:id - Get session details.
async fn api_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    Ok(Json(find_session(&state, id)?.snapshot()))
}

/// DELETE /api/sessions/:id - Delete a session.
async fn api_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(AppError::SessionNotFound(id))
}

/// GET /api/sessions/:id/messages - Get session messages.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    Ok(Json(find_session(&state, id)?.messages()))
}

/// POST /api/sessions/:id/reset - Restore the greeting-only log.
async fn api_reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>> {
    let session = find_session(&state, id)?;
    session.reset();
    Ok(Json(SessionInfo::from(&session)))
}

/// GET /api/sessions/:id/events - SSE feed of log revisions.
///
/// Emits the current revision immediately, then one `revision` event per
/// append or reset.
async fn api_session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let session = find_session(&state, id)?;
    let stream = WatchStream::new(session.subscribe()).map(|revision| {
        Ok::<_, Infallible>(
            Event::default()
                .event("revision")
                .data(revision.to_string()),
        )
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
