//! # Icons
//!
//! Stroke-style SVG icons used in place of emoji across the pages.
//!
//! Every icon shares the same outer `<svg>` (24×24 view box, round caps,
//! `currentColor` stroke); only the inner shapes differ, so the table below
//! stores the shapes and [`render`] builds the element.
//!
//! ```rust
//! use dinetab_ui::icons::{render, IconOptions};
//!
//! let svg = render("cash", &IconOptions::default().size(20).class("pay-icon"));
//! assert!(svg.starts_with(r#"<svg class="pay-icon" style="width: 20px; height: 20px""#));
//! ```

use std::fmt::Write;

use crate::markup::escape_html;

/// Icon used when a name is unknown.
pub const FALLBACK_ICON: &str = "info";

const ICONS: &[(&str, &str)] = &[
    // Payment methods
    ("cash", r#"<rect x="2" y="5" width="20" height="14" rx="2"/><circle cx="12" cy="12" r="3"/>"#),
    ("card", r#"<rect x="1" y="4" width="22" height="16" rx="2" ry="2"/><line x1="1" y1="10" x2="23" y2="10"/>"#),
    ("online", r#"<rect x="5" y="2" width="14" height="20" rx="2" ry="2"/><line x1="12" y1="18" x2="12.01" y2="18"/>"#),
    // Navigation and actions
    ("map", r#"<polygon points="1 6 1 22 8 18 16 22 23 18 23 2 16 6 8 2 1 6"/><line x1="8" y1="2" x2="8" y2="18"/><line x1="16" y1="6" x2="16" y2="22"/>"#),
    ("list", r#"<line x1="8" y1="6" x2="21" y2="6"/><line x1="8" y1="12" x2="21" y2="12"/><line x1="8" y1="18" x2="21" y2="18"/><line x1="3" y1="6" x2="3.01" y2="6"/><line x1="3" y1="12" x2="3.01" y2="12"/><line x1="3" y1="18" x2="3.01" y2="18"/>"#),
    ("clipboard", r#"<path d="M16 4h2a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2h2"/><rect x="8" y="2" width="8" height="4" rx="1" ry="1"/>"#),
    // Notifications
    ("bell", r#"<path d="M18 8A6 6 0 0 0 6 8c0 7-3 9-3 9h18s-3-2-3-9"/><path d="M13.73 21a2 2 0 0 1-3.46 0"/>"#),
    ("checkCircle", r#"<path d="M22 11.08V12a10 10 0 1 1-5.93-9.14"/><polyline points="22 4 12 14.01 9 11.01"/>"#),
    ("check", r#"<polyline points="20 6 9 17 4 12"/>"#),
    ("clock", r#"<circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/>"#),
    ("volume", r#"<polygon points="11 5 6 9 2 9 2 15 6 15 11 19 11 5"/><path d="M19.07 4.93a10 10 0 0 1 0 14.14M15.54 8.46a5 5 0 0 1 0 7.07"/>"#),
    ("table", r#"<path d="M3 3h18v18H3z"/><line x1="3" y1="9" x2="21" y2="9"/><line x1="9" y1="21" x2="9" y2="9"/>"#),
    // Editing
    ("save", r#"<path d="M19 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h11l5 5v11a2 2 0 0 1-2 2z"/><polyline points="17 21 17 13 7 13 7 21"/><polyline points="7 3 7 8 15 8"/>"#),
    ("edit", r#"<path d="M11 4H4a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2v-7"/><path d="M18.5 2.5a2.121 2.121 0 0 1 3 3L12 15l-4 1 1-4 9.5-9.5z"/>"#),
    ("trash", r#"<polyline points="3 6 5 6 21 6"/><path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6m3 0V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2"/>"#),
    ("plus", r#"<line x1="12" y1="5" x2="12" y2="19"/><line x1="5" y1="12" x2="19" y2="12"/>"#),
    ("plusCircle", r#"<circle cx="12" cy="12" r="10"/><line x1="12" y1="8" x2="12" y2="16"/><line x1="8" y1="12" x2="16" y2="12"/>"#),
    ("refresh", r#"<polyline points="23 4 23 10 17 10"/><polyline points="1 20 1 14 7 14"/><path d="M3.51 9a9 9 0 0 1 14.85-3.36L23 10M1 14l4.64 4.36A9 9 0 0 0 20.49 15"/>"#),
    ("info", r#"<circle cx="12" cy="12" r="10"/><line x1="12" y1="16" x2="12" y2="12"/><line x1="12" y1="8" x2="12.01" y2="8"/>"#),
    // People
    ("user", r#"<path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#),
    ("users", r#"<path d="M17 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/><path d="M23 21v-2a4 4 0 0 0-3-3.87"/><path d="M16 3.13a4 4 0 0 1 0 7.75"/>"#),
    ("shoppingCart", r#"<circle cx="9" cy="21" r="1"/><circle cx="20" cy="21" r="1"/><path d="M1 1h4l2.68 13.39a2 2 0 0 0 2 1.61h9.72a2 2 0 0 0 2-1.61L23 6H6"/>"#),
    ("x", r#"<line x1="18" y1="6" x2="6" y2="18"/><line x1="6" y1="6" x2="18" y2="18"/>"#),
    ("arrowLeft", r#"<line x1="19" y1="12" x2="5" y2="12"/><polyline points="12 19 5 12 12 5"/>"#),
    ("arrowRight", r#"<line x1="5" y1="12" x2="19" y2="12"/><polyline points="12 5 19 12 12 19"/>"#),
    ("fileText", r#"<path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"/><polyline points="14 2 14 8 20 8"/><line x1="16" y1="13" x2="8" y2="13"/><line x1="16" y1="17" x2="8" y2="17"/><polyline points="10 9 9 9 8 9"/>"#),
    ("settings", r#"<circle cx="12" cy="12" r="3"/><path d="M12 1v6m0 6v6m5.2-13.2 1.8-1.8M6 6l1.8 1.8M1 12h6m6 0h6M5.2 17.8l1.8-1.8M18 18l-1.8-1.8"/>"#),
    ("download", r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="7 10 12 15 17 10"/><line x1="12" y1="15" x2="12" y2="3"/>"#),
    ("upload", r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="17 8 12 3 7 8"/><line x1="12" y1="3" x2="12" y2="15"/>"#),
    ("search", r#"<circle cx="11" cy="11" r="8"/><line x1="21" y1="21" x2="16.65" y2="16.65"/>"#),
    ("star", r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#),
    ("eye", r#"<path d="M1 12s4-8 11-8 11 8 11 8-4 8-11 8-11-8-11-8z"/><circle cx="12" cy="12" r="3"/>"#),
    ("eyeOff", r#"<path d="M17.94 17.94A10.07 10.07 0 0 1 12 20c-7 0-11-8-11-8a18.45 18.45 0 0 1 5.06-5.94M9.9 4.24A9.12 9.12 0 0 1 12 4c7 0 11 8 11 8a18.5 18.5 0 0 1-2.16 3.19m-6.72-1.07a3 3 0 1 1-4.24-4.24"/><line x1="1" y1="1" x2="23" y2="23"/>"#),
    ("home", r#"<path d="M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#),
    ("package", r#"<line x1="16.5" y1="9.4" x2="7.5" y2="4.21"/><path d="M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z"/><polyline points="3.27 6.96 12 12.01 20.73 6.96"/><line x1="12" y1="22.08" x2="12" y2="12"/>"#),
];

// =============================================================================
// Options
// =============================================================================

/// How an icon is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct IconOptions {
    pub class: Option<String>,
    /// Extra inline style declarations, applied after width and height.
    pub style: Vec<(String, String)>,
    /// Rendered width and height in px.
    pub size: u32,
    pub color: String,
}

impl Default for IconOptions {
    fn default() -> Self {
        IconOptions {
            class: None,
            style: Vec::new(),
            size: 16,
            color: "currentColor".to_string(),
        }
    }
}

impl IconOptions {
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// `width: 16px; height: 16px` followed by the custom declarations.
    /// A custom `width` or `height` replaces the size-derived one.
    fn style_attr(&self) -> String {
        let mut declarations = vec![
            ("width".to_string(), format!("{}px", self.size)),
            ("height".to_string(), format!("{}px", self.size)),
        ];
        for (property, value) in &self.style {
            match declarations.iter_mut().find(|(p, _)| p == property) {
                Some(existing) => existing.1 = value.clone(),
                None => declarations.push((property.clone(), value.clone())),
            }
        }
        declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// True if `name` is in the icon set.
pub fn is_known(name: &str) -> bool {
    shapes(name).is_some()
}

/// Every icon name, in catalogue order.
pub fn names() -> impl Iterator<Item = &'static str> {
    ICONS.iter().map(|(name, _)| *name)
}

fn shapes(name: &str) -> Option<&'static str> {
    ICONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, shapes)| *shapes)
}

/// SVG markup for `name`; unknown names render the `info` icon.
pub fn render(name: &str, options: &IconOptions) -> String {
    let body = shapes(name)
        .or_else(|| shapes(FALLBACK_ICON))
        .unwrap_or_default();

    let mut svg = String::with_capacity(body.len() + 256);
    svg.push_str("<svg");
    if let Some(class) = &options.class {
        let _ = write!(svg, r#" class="{}""#, escape_html(class));
    }
    let _ = write!(
        svg,
        concat!(
            r#" style="{style}" width="{size}" height="{size}" viewBox="0 0 24 24" fill="none""#,
            r#" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#,
            "{body}</svg>"
        ),
        style = escape_html(&options.style_attr()),
        size = options.size,
        color = escape_html(&options.color),
        body = body,
    );
    svg
}
