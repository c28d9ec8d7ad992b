//! Server-rendered HTML.
//!
//! Pages and HTMX fragments are plain `format!` templates. Every piece of
//! user-supplied text goes through [`escape_html`] before it is embedded.
//!
//! # Structure
//!
//! - [`pages`]: document shell and the four site pages
//! - [`navbar`]: desktop bar, mobile menu and bottom bar
//! - [`chat`]: the assistant widget and its message log
//! - [`icons`]: inline SVG glyphs

pub mod chat;
pub mod icons;
pub mod navbar;
pub mod pages;

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
