//! Site navigation.
//!
//! The navbar shows a fixed list of [`NavItem`]s, highlights the one whose
//! path equals the current location, and owns a single mobile-menu flag.
//!
//! # Example
//!
//! ```rust
//! use kidneyscan_web::nav::{MenuState, NavController};
//!
//! let mut nav = NavController::new("/scan");
//! assert_eq!(nav.active_item().map(|item| item.label), Some("Image Analysis"));
//!
//! nav.toggle_menu();
//! assert_eq!(nav.menu(), MenuState::Open);
//!
//! nav.activate("/chat");
//! assert_eq!(nav.menu(), MenuState::Closed);
//! ```

mod controller;

pub use controller::{MenuState, NavController};

/// Glyph shown next to a nav label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIcon {
    /// House.
    Home,
    /// Camera.
    Camera,
    /// Speech bubble.
    MessageSquare,
    /// Circled "i".
    Info,
}

/// Static descriptor of one navigation destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// Link text.
    pub label: &'static str,
    /// Route the link points to.
    pub path: &'static str,
    /// Leading icon.
    pub icon: NavIcon,
}

impl NavItem {
    /// Whether this item is the current page. Exact match only.
    #[must_use]
    pub fn is_active(&self, current_path: &str) -> bool {
        self.path == current_path
    }
}

/// Navigation entries, in display order.
pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        label: "Home",
        path: "/",
        icon: NavIcon::Home,
    },
    NavItem {
        label: "Image Analysis",
        path: "/scan",
        icon: NavIcon::Camera,
    },
    NavItem {
        label: "Assistant",
        path: "/chat",
        icon: NavIcon::MessageSquare,
    },
    NavItem {
        label: "About",
        path: "/about",
        icon: NavIcon::Info,
    },
];

/// Find the nav item registered for exactly `path`.
#[must_use]
pub fn find_item(path: &str) -> Option<&'static NavItem> {
    NAV_ITEMS.iter().find(|item| item.is_active(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_path_match_only() {
        let scan = &NAV_ITEMS[1];

        assert!(scan.is_active("/scan"));
        assert!(!scan.is_active("/scan/details"));
        assert!(!scan.is_active("/scan/"));
        assert!(!scan.is_active("/SCAN"));
    }

    #[test]
    fn test_root_does_not_match_everything() {
        let home = &NAV_ITEMS[0];

        assert!(home.is_active("/"));
        assert!(!home.is_active("/chat"));
        assert_eq!(find_item("/chat").map(|item| item.label), Some("Assistant"));
        assert!(find_item("/chat/history").is_none());
    }

    #[test]
    fn test_paths_are_unique() {
        for (i, a) in NAV_ITEMS.iter().enumerate() {
            for b in &NAV_ITEMS[i + 1..] {
                assert_ne!(a.path, b.path);
            }
        }
    }
}
