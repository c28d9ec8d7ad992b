//! Active-entry detection and mobile menu state.

use serde::{Deserialize, Serialize};

use super::{NAV_ITEMS, NavItem, find_item};

/// Visibility of the collapsible mobile menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    /// Menu hidden.
    #[default]
    Closed,
    /// Menu expanded.
    Open,
}

impl MenuState {
    /// The state a toggle press leads to.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    /// Whether the menu is visible.
    #[must_use]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// Query-string value for this state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

/// Navbar state for one render: where we are and whether the menu is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavController {
    current_path: String,
    menu: MenuState,
}

impl NavController {
    /// Controller for `current_path` with the menu closed.
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            menu: MenuState::Closed,
        }
    }

    /// Set the menu state explicitly.
    #[must_use]
    pub fn with_menu(mut self, menu: MenuState) -> Self {
        self.menu = menu;
        self
    }

    /// Current location path.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Current menu state.
    #[must_use]
    pub fn menu(&self) -> MenuState {
        self.menu
    }

    /// The highlighted entry, if the current path is a nav destination.
    #[must_use]
    pub fn active_item(&self) -> Option<&'static NavItem> {
        find_item(&self.current_path)
    }

    /// Whether `item` should be highlighted.
    #[must_use]
    pub fn is_active(&self, item: &NavItem) -> bool {
        item.is_active(&self.current_path)
    }

    /// Every nav item paired with its highlight flag.
    pub fn items(&self) -> impl Iterator<Item = (&'static NavItem, bool)> + '_ {
        NAV_ITEMS.iter().map(move |item| (item, self.is_active(item)))
    }

    /// Menu button press.
    pub fn toggle_menu(&mut self) {
        self.menu = self.menu.toggled();
    }

    /// A nav link was followed: move to `path` and collapse the menu.
    pub fn activate(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
        self.menu = MenuState::Closed;
    }
}
