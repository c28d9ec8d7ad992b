//! Assistant chat widget.
//!
//! The widget is re-rendered whole after every submit and reset, which clears
//! the input. While a reply is pending the typing indicator polls the server
//! for the message log alone, carrying the send button out of band, until the
//! session is idle again.

use std::fmt::Write as _;

use super::escape_html;
use super::icons::Icon;
use crate::chat::{ChatMessage, MAX_MESSAGE_CHARS, MessageRole};
use crate::session::{ChatState, SessionSnapshot};

/// DOM id of the widget swap target.
pub const WIDGET_ID: &str = "chat-widget";

/// Poll interval while a reply is pending.
const POLL_DELAY: &str = "400ms";

/// DOM id of the message log, the poll swap target.
pub const LOG_ID: &str = "chat-log";

/// DOM id of the send button.
pub const SEND_ID: &str = "chat-send";

/// Render the full widget: log, typing indicator, input form and reset button.
#[must_use]
pub fn render_chat_widget(session: &SessionSnapshot) -> String {
    let id = escape_html(&session.id);

    format!(
        r##"<div id="{WIDGET_ID}" class="mx-auto mt-8 flex w-full max-w-2xl flex-col" data-session-id="{id}" data-state="{state}" data-revision="{revision}">
        <div class="flex h-[500px] flex-col rounded-t-lg border border-b-0 border-primary/20 bg-background/50">
            {log}
        </div>
        <form class="flex rounded-b-lg border border-primary/20 bg-background/50 p-2"
            hx-post="/ui/chat/{id}/messages" hx-target="#{WIDGET_ID}" hx-swap="outerHTML">
            <input name="message" autocomplete="off" autofocus maxlength="{MAX_MESSAGE_CHARS}"
                placeholder="Type your question about kidney cancer..."
                class="flex h-10 w-full rounded-md border-0 bg-transparent px-3 py-2 text-sm focus-visible:outline-none"/>
            {send}
        </form>
        <div class="mt-4 flex items-center justify-center">
            <button type="button" class="inline-flex h-8 items-center justify-center rounded-lg px-3 text-xs text-muted-foreground hover:bg-panel"
                hx-post="/ui/chat/{id}/reset" hx-target="#{WIDGET_ID}" hx-swap="outerHTML">
                Reset conversation
            </button>
        </div>
    </div>"##,
        state = session.state.as_str(),
        revision = session.revision,
        log = render_log(session),
        send = render_send_button(session.state, false),
    )
}

/// Render the answer to a typing-indicator poll.
///
/// Only the message log and an out-of-band send button are returned, so
/// whatever the visitor is typing into the input survives the poll.
#[must_use]
pub fn render_chat_poll(session: &SessionSnapshot) -> String {
    format!(
        "{log}\n{send}",
        log = render_log(session),
        send = render_send_button(session.state, true),
    )
}

fn render_log(session: &SessionSnapshot) -> String {
    let id = escape_html(&session.id);

    let log = session
        .messages
        .iter()
        .fold(String::new(), |mut out, message| {
            let _ = write!(out, "\n{}", render_message(message));
            out
        });

    let typing = if session.state == ChatState::AwaitingResponse {
        format!(
            r##"
            <div class="mb-4 flex justify-start" id="typing-indicator"
                hx-get="/ui/chat/{id}/log" hx-trigger="load delay:{POLL_DELAY}" hx-target="#{LOG_ID}" hx-swap="outerHTML">
                <div class="max-w-[80%] rounded-lg bg-muted p-4 text-foreground">
                    <div class="flex items-center">
                        {spinner}
                        <p class="text-sm">KidneyScan Assistant is typing...</p>
                    </div>
                </div>
            </div>"##,
            spinner = Icon::RefreshCw.render("mr-2 animate-spin"),
        )
    } else {
        String::new()
    };

    format!(
        r#"<div id="{LOG_ID}" class="flex-1 overflow-y-auto p-4" aria-live="polite" data-state="{state}"
                hx-on::load="document.getElementById('messages-end')?.scrollIntoView({{behavior: 'smooth'}})">{log}{typing}
                <div id="messages-end"></div>
            </div>"#,
        state = session.state.as_str(),
    )
}

/// Send button; disabled while a reply is pending.
fn render_send_button(state: ChatState, out_of_band: bool) -> String {
    let oob = if out_of_band {
        r#" hx-swap-oob="true""#
    } else {
        ""
    };
    let disabled = if state == ChatState::AwaitingResponse {
        " disabled"
    } else {
        ""
    };
    format!(
        r#"<button type="submit" id="{SEND_ID}" class="ml-2 inline-flex h-10 w-10 items-center justify-center rounded-full bg-primary text-white disabled:pointer-events-none disabled:opacity-50"{oob}{disabled}>
                {send}
            </button>"#,
        send = Icon::Send.render(""),
    )
}

fn render_message(message: &ChatMessage) -> String {
    let content = escape_html(&message.content);
    let timestamp = message.timestamp.to_rfc3339();
    match message.role {
        MessageRole::Assistant => format!(
            r#"            <div class="mb-4 flex justify-start" data-role="assistant" data-message-id="{id}">
                <div class="max-w-[80%] rounded-lg bg-muted p-3 text-foreground">
                    <div class="mb-1 flex items-center">
                        <div class="mr-2 flex h-6 w-6 items-center justify-center rounded-full bg-primary/20">
                            <span class="text-xs font-semibold text-primary">AI</span>
                        </div>
                        <span class="text-xs opacity-70">KidneyScan Assistant</span>
                    </div>
                    <p class="text-left text-sm"><time datetime="{timestamp}" hidden></time>{content}</p>
                </div>
            </div>"#,
            id = escape_html(&message.id),
        ),
        MessageRole::User => format!(
            r#"            <div class="mb-4 flex justify-end" data-role="user" data-message-id="{id}">
                <div class="max-w-[80%] rounded-lg bg-primary p-3 text-white">
                    <div class="mb-1 flex items-center justify-end">
                        <span class="text-xs opacity-70">You</span>
                        <div class="ml-2 flex h-6 w-6 items-center justify-center rounded-full bg-white/20">{icon}</div>
                    </div>
                    <p class="text-right text-sm"><time datetime="{timestamp}" hidden></time>{content}</p>
                </div>
            </div>"#,
            id = escape_html(&message.id),
            icon = Icon::User.render("h-3 w-3"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;

    #[test]
    fn test_idle_widget() {
        let session = SessionStore::default().create_with_id("abc");
        let html = render_chat_widget(&session.snapshot());

        assert!(html.contains(r#"data-session-id="abc""#));
        assert!(html.contains(r#"data-state="idle""#));
        assert!(html.contains("KidneyScan Assistant</span>"));
        assert!(html.contains(r#"hx-post="/ui/chat/abc/messages""#));
        assert!(html.contains(r#"hx-post="/ui/chat/abc/reset""#));
        assert!(!html.contains("typing-indicator"));
        assert!(!html.contains(" disabled>"));
        assert_eq!(html.matches(r#"data-role="assistant""#).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_awaiting_widget_polls_and_disables_send() {
        let session = SessionStore::default().create_with_id("abc");
        session.submit("<b>symptoms</b>");

        let html = render_chat_widget(&session.snapshot());

        assert!(html.contains(r#"data-state="awaiting-response""#));
        assert!(html.contains("typing-indicator"));
        assert!(html.contains(r#"hx-trigger="load delay:400ms""#));
        assert!(html.contains(" disabled>"));
        assert!(html.contains("&lt;b&gt;symptoms&lt;/b&gt;"));
        assert!(!html.contains("<b>symptoms</b>"));
        assert_eq!(html.matches(r#"data-role="user""#).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_leaves_the_input_alone() {
        let session = SessionStore::default().create_with_id("abc");
        session.submit("symptoms?");

        let html = render_chat_poll(&session.snapshot());

        assert!(html.starts_with(r#"<div id="chat-log""#));
        assert!(!html.contains("<input"));
        assert!(!html.contains("<form"));
        assert!(html.contains(r#"hx-get="/ui/chat/abc/log""#));
        assert!(html.contains(r##"hx-target="#chat-log""##));
        assert!(html.contains(r#"id="chat-send""#));
        assert!(html.contains(r#"hx-swap-oob="true" disabled>"#));
    }

    #[test]
    fn test_poll_after_reply_enables_send() {
        let session = SessionStore::default().create_with_id("abc");

        let html = render_chat_poll(&session.snapshot());

        assert!(!html.contains("typing-indicator"));
        assert!(html.contains(r#"hx-swap-oob="true">"#));
        assert!(!html.contains(" disabled>"));
    }
}
