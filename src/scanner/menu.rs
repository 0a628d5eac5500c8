//! Navigation menu extraction
//!
//! Locates the anchors that make up a site's primary navigation using a short
//! list of structural rules that match common theme markup (WordPress and
//! similar). All rules are unioned into one selector, so an anchor matching
//! any rule is a candidate and candidates are visited in document order.

use crate::output::MenuEntry;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// A structural pattern identifying a primary-navigation container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRule {
    /// Any `nav` element nested inside a `header`
    HeaderNav,
    /// A container with the given `id`
    Id(&'static str),
    /// A container with the given class
    Class(&'static str),
}

impl MenuRule {
    /// CSS selector matching the anchors inside this container
    pub fn selector(&self) -> String {
        match self {
            Self::HeaderNav => "header nav a".to_string(),
            Self::Id(id) => format!("#{} a", id),
            Self::Class(class) => format!(".{} a", class),
        }
    }
}

/// Default rule set, most common patterns first
pub const MENU_RULES: &[MenuRule] = &[
    MenuRule::HeaderNav,
    MenuRule::Id("site-navigation"),
    MenuRule::Class("main-navigation"),
    MenuRule::Class("menu-primary"),
    MenuRule::Class("primary-menu"),
    MenuRule::Class("nav-menu"),
    MenuRule::Class("header-menu"),
    MenuRule::Class("top-menu"),
];

/// Link targets with these extensions are files, not pages
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "zip", "rar", "jpg", "jpeg", "png", "gif",
];

/// Extracts primary navigation entries using [`MENU_RULES`]
///
/// Never fails: a page without a recognisable menu yields an empty list.
///
/// # Example
///
/// ```
/// use menu_scanner::extract_menu;
///
/// let html = r#"<header><nav><a href="/">Home</a><a href="/about">About</a></nav></header>"#;
/// let entries = extract_menu(html);
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].url, "/about");
/// ```
pub fn extract_menu(html: &str) -> Vec<MenuEntry> {
    extract_menu_with(html, MENU_RULES)
}

/// Extracts navigation entries matching any of the given rules
///
/// # Skip Rules
///
/// - Empty trimmed text
/// - Missing or empty `href`
/// - `href` starting with `#`
/// - `href` whose path ends in one of [`SKIPPED_EXTENSIONS`]
///
/// Entries with the same `(url, text)` pair are collapsed onto the first
/// occurrence.
pub fn extract_menu_with(html: &str, rules: &[MenuRule]) -> Vec<MenuEntry> {
    let Some(selector) = union_selector(rules) else {
        tracing::warn!("Menu rules produced an invalid selector");
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut entries = Vec::new();

    for element in document.select(&selector) {
        let Some(entry) = entry_from_anchor(element) else {
            continue;
        };

        if seen.insert((entry.url.clone(), entry.text.clone())) {
            entries.push(entry);
        }
    }

    entries
}

/// Joins every rule into a single selector group
fn union_selector(rules: &[MenuRule]) -> Option<Selector> {
    if rules.is_empty() {
        return None;
    }

    let group = rules
        .iter()
        .map(MenuRule::selector)
        .collect::<Vec<_>>()
        .join(", ");

    Selector::parse(&group).ok()
}

/// Builds an entry from a candidate anchor, or None if it should be skipped
fn entry_from_anchor(element: ElementRef<'_>) -> Option<MenuEntry> {
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        return None;
    }

    let href = element.value().attr("href").filter(|h| !h.is_empty())?;
    if href.starts_with('#') || links_to_file(href) {
        return None;
    }

    Some(MenuEntry {
        text,
        url: href.to_string(),
        target: non_empty_attr(element, "target"),
        rel: non_empty_attr(element, "rel"),
    })
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Returns true if the href path ends in a known non-page extension
fn links_to_file(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href);

    match path.rsplit_once('.') {
        Some((_, extension)) if !extension.contains('/') => SKIPPED_EXTENSIONS
            .iter()
            .any(|skipped| skipped.eq_ignore_ascii_case(extension)),
        _ => false,
    }
}
