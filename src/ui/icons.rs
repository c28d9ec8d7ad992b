//! Inline SVG icons.
//!
//! Icons are rendered inline as SVG so they inherit `currentColor` and can
//! be sized with utility classes.

use crate::nav::NavIcon;

/// Common icon size class.
const ICON_SIZE: &str = "h-4 w-4";

/// Available glyphs (lucide outlines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Home,
    Camera,
    MessageSquare,
    Info,
    Menu,
    X,
    Send,
    RefreshCw,
    User,
}

impl Icon {
    fn body(self) -> &'static str {
        match self {
            Self::Home => {
                r#"<path d="m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#
            }
            Self::Camera => {
                r#"<path d="M14.5 4h-5L7 7H4a2 2 0 0 0-2 2v9a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2V9a2 2 0 0 0-2-2h-3l-2.5-3z"/><circle cx="12" cy="13" r="3"/>"#
            }
            Self::MessageSquare => {
                r#"<path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/>"#
            }
            Self::Info => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M12 16v-4"/><path d="M12 8h.01"/>"#
            }
            Self::Menu => {
                r#"<line x1="3" y1="12" x2="21" y2="12"/><line x1="3" y1="6" x2="21" y2="6"/><line x1="3" y1="18" x2="21" y2="18"/>"#
            }
            Self::X => r#"<line x1="18" y1="6" x2="6" y2="18"/><line x1="6" y1="6" x2="18" y2="18"/>"#,
            Self::Send => {
                r#"<line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/>"#
            }
            Self::RefreshCw => {
                r#"<path d="M3 12a9 9 0 0 1 9-9 9.75 9.75 0 0 1 6.74 2.74L21 8"/><path d="M21 3v5h-5"/><path d="M21 12a9 9 0 0 1-9 9 9.75 9.75 0 0 1-6.74-2.74L3 16"/><path d="M8 16H3v5"/>"#
            }
            Self::User => {
                r#"<path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#
            }
        }
    }

    /// Render the icon as an inline `<svg>` with extra classes.
    #[must_use]
    pub fn render(self, class: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE} {class}" aria-hidden="true">{}</svg>"#,
            self.body()
        )
    }
}

impl From<NavIcon> for Icon {
    fn from(icon: NavIcon) -> Self {
        match icon {
            NavIcon::Home => Self::Home,
            NavIcon::Camera => Self::Camera,
            NavIcon::MessageSquare => Self::MessageSquare,
            NavIcon::Info => Self::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_classes() {
        let svg = Icon::Send.render("h-5 w-5");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="h-4 w-4 h-5 w-5""#));
        assert!(svg.ends_with("</svg>"));
    }
}
