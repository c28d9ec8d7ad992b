//! Document shell and site pages.

use super::chat::render_chat_widget;
use super::escape_html;
use super::navbar::render_navbar;
use crate::nav::NavController;
use crate::session::SessionSnapshot;

/// Generate the HTML document around a page body.
#[must_use]
pub fn html_shell(title: &str, nav: &NavController, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="AI-assisted kidney cancer screening">
    <title>{title} - KidneyScan AI</title>

    <!-- HTMX (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-background text-foreground antialiased">
    <div id="app-shell" class="flex min-h-screen flex-col pb-16 lg:pb-0">
        {navbar}
        <main id="app" class="flex-1">
            {content}
        </main>
    </div>
</body>
</html>"#,
        title = escape_html(title),
        navbar = render_navbar(nav),
    )
}

/// Landing page.
#[must_use]
pub fn home_content() -> &'static str {
    r#"
    <section class="mx-auto mt-24 max-w-7xl px-5">
        <div class="mx-auto flex max-w-2xl flex-col gap-6 text-center">
            <h1 class="font-inter text-4xl font-extrabold tracking-tight lg:text-5xl">
                Early kidney cancer screening, assisted by AI
            </h1>
            <p class="text-lg text-muted-foreground">
                Upload kidney imaging for a preliminary analysis, or ask our assistant
                about symptoms, risk factors and treatment options.
            </p>
            <div class="flex justify-center gap-4">
                <a href="/scan" class="inline-flex h-10 items-center rounded-lg bg-primary px-4 text-sm font-medium text-white">Analyze an image</a>
                <a href="/chat" class="inline-flex h-10 items-center rounded-lg border border-primary/20 px-4 text-sm font-medium">Ask the assistant</a>
            </div>
        </div>
    </section>"#
}

/// Image analysis landing page.
#[must_use]
pub fn scan_content() -> &'static str {
    r#"
    <section class="mx-auto mt-24 max-w-7xl px-5">
        <div class="mx-auto flex max-w-2xl flex-col gap-6 text-center">
            <h1 class="font-inter text-4xl font-extrabold tracking-tight lg:text-5xl">Image Analysis</h1>
            <p class="text-lg text-muted-foreground">
                CT, MRI and ultrasound images of the kidneys can be screened for signs of tumors.
                Results are preliminary and should be reviewed with a healthcare professional.
            </p>
        </div>
    </section>"#
}

/// Assistant page wrapping the chat widget.
#[must_use]
pub fn chat_content(session: &SessionSnapshot) -> String {
    format!(
        r#"
    <section class="mx-auto mt-24 max-w-7xl px-5">
        <div class="mx-auto flex max-w-2xl flex-col gap-6 text-center">
            <div>
                <span class="rounded-full border border-primary/30 bg-primary/10 px-3 py-1 text-sm font-medium text-primary">Virtual Assistant</span>
                <h1 class="mt-4 font-inter text-4xl font-extrabold tracking-tight lg:text-5xl">KidneyScan AI Assistant</h1>
            </div>
            <p class="text-lg text-muted-foreground">
                Ask questions about kidney cancer, detection methods, or get help interpreting your results.
            </p>
            {widget}
        </div>
    </section>"#,
        widget = render_chat_widget(session),
    )
}

/// About page.
#[must_use]
pub fn about_content() -> &'static str {
    r#"
    <section class="mx-auto mt-24 max-w-3xl space-y-4 px-5">
        <h1 class="text-2xl font-bold">About KidneyScan AI</h1>
        <p>
            KidneyScan AI is a preliminary screening aid for kidney cancer. It does not replace
            diagnosis by a qualified clinician.
        </p>
        <p class="text-sm text-muted-foreground">
            The assistant answers from a fixed set of reviewed responses and keeps no record of
            your conversation once the session ends.
        </p>
    </section>"#
}

/// 404 page body.
#[must_use]
pub fn not_found_content() -> &'static str {
    r#"
    <div class="flex flex-col items-center justify-center py-20">
        <h1 class="mb-4 text-4xl font-bold">404</h1>
        <p class="mb-6 text-muted-foreground">Page not found</p>
        <a href="/" class="inline-flex h-10 items-center rounded-lg bg-primary px-4 text-sm font-medium text-white">Go Home</a>
    </div>"#
}
