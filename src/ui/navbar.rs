//! Responsive site navigation bar.
//!
//! The whole `<header>` is one HTMX swap target. The menu button sends the
//! current path and menu state back with `toggle=true` and swaps in the
//! header the server renders for the next state; following any link loads a
//! new page, which always renders with the menu closed.

use std::fmt::Write as _;

use serde_json::json;

use super::escape_html;
use super::icons::Icon;
use crate::nav::{NavController, NavItem};

/// DOM id of the header swap target.
pub const NAVBAR_ID: &str = "app-navbar";

/// Render the navbar for the given controller state.
#[must_use]
pub fn render_navbar(nav: &NavController) -> String {
    let desktop = render_links(nav, |item, active| {
        let tone = if active {
            "text-primary"
        } else {
            "text-muted-foreground hover:text-foreground"
        };
        link(
            item,
            active,
            &format!("flex items-center gap-1.5 text-sm font-medium transition-colors {tone}"),
            &item_body(item, false),
        )
    });

    let toggle_icon = if nav.menu().is_open() {
        Icon::X
    } else {
        Icon::Menu
    };
    let toggle_vals = json!({
        "path": nav.current_path(),
        "menu": nav.menu().as_str(),
        "toggle": true,
    })
    .to_string();

    let mobile_menu = if nav.menu().is_open() {
        let links = render_links(nav, |item, active| {
            let tone = if active {
                "bg-primary/10 text-primary"
            } else {
                "text-muted-foreground hover:bg-primary/5 hover:text-foreground"
            };
            link(
                item,
                active,
                &format!(
                    "flex items-center gap-2 rounded-md px-2 py-1.5 text-sm font-medium transition-colors {tone}"
                ),
                &item_body(item, false),
            )
        });
        format!(
            r#"
        <div id="mobile-menu" class="border-b border-primary/10 bg-background/95 py-4 lg:hidden">
            <nav class="flex flex-col space-y-4 px-4">{links}</nav>
        </div>"#
        )
    } else {
        String::new()
    };

    let bottom = render_links(nav, |item, active| {
        let tone = if active {
            "text-primary"
        } else {
            "text-muted-foreground hover:text-foreground"
        };
        link(
            item,
            active,
            &format!(
                "flex flex-col items-center justify-center gap-1 text-xs font-medium transition-colors {tone}"
            ),
            &item_body(item, true),
        )
    });

    format!(
        r##"<header id="{NAVBAR_ID}" class="sticky top-0 z-50 border-b border-primary/10 bg-background/80 backdrop-blur-md" data-menu="{menu}">
        <div class="mx-auto flex h-16 max-w-7xl items-center justify-between px-4">
            <a href="/" class="flex items-center gap-2">
                <span class="relative flex h-8 w-8 items-center justify-center rounded-full bg-primary text-white">
                    <span class="absolute h-3 w-3 animate-ping rounded-full bg-primary opacity-75"></span>
                    <span class="text-sm font-bold">KS</span>
                </span>
                <span class="font-inter text-xl font-bold">KidneyScan<span class="text-primary">AI</span></span>
            </a>
            <nav class="hidden items-center gap-6 lg:flex">{desktop}</nav>
            <button type="button" class="inline-flex h-10 w-10 items-center justify-center rounded-lg hover:bg-panel lg:hidden"
                aria-label="Toggle menu" aria-expanded="{expanded}"
                hx-get="/ui/navbar" hx-vals="{vals}" hx-target="#{NAVBAR_ID}" hx-swap="outerHTML">
                {toggle}
            </button>
        </div>{mobile_menu}
        <div class="fixed bottom-0 left-0 right-0 z-50 border-t border-primary/10 bg-background/80 backdrop-blur-md lg:hidden">
            <nav class="grid h-16 grid-cols-4">{bottom}</nav>
        </div>
    </header>"##,
        menu = nav.menu().as_str(),
        expanded = nav.menu().is_open(),
        vals = escape_html(&toggle_vals),
        toggle = toggle_icon.render("h-5 w-5"),
    )
}

fn render_links(nav: &NavController, render: impl Fn(&NavItem, bool) -> String) -> String {
    nav.items().fold(String::new(), |mut out, (item, active)| {
        let _ = write!(out, "\n                {}", render(item, active));
        out
    })
}

fn link(item: &NavItem, active: bool, class: &str, body: &str) -> String {
    let current = if active { r#" aria-current="page""# } else { "" };
    format!(
        r#"<a href="{path}" class="{class}"{current}>{body}</a>"#,
        path = item.path,
    )
}

fn item_body(item: &NavItem, stacked: bool) -> String {
    let icon = Icon::from(item.icon).render("h-5 w-5");
    if stacked {
        format!("{icon}<span>{}</span>", item.label)
    } else {
        format!("{icon}{}", item.label)
    }
}
