//! # Markup Fragments
//!
//! Placeholder HTML for a container that is loading or failed to load.
//! Messages are escaped; they often carry backend error text.

/// Default text of [`loading_markup`].
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

const ERROR_ICON: &str = concat!(
    r#"<svg width="48" height="48" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">"#,
    r#"<circle cx="12" cy="12" r="10"></circle>"#,
    r#"<line x1="12" y1="8" x2="12" y2="12"></line>"#,
    r#"<line x1="12" y1="16" x2="12.01" y2="16"></line>"#,
    "</svg>"
);

/// Escapes text for use in HTML content and quoted attribute values.
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

/// Spinner with a caption.
pub fn loading_markup(message: Option<&str>) -> String {
    format!(
        r#"<div class="loading-spinner"><div class="spinner"></div><p>{}</p></div>"#,
        escape_html(message.unwrap_or(DEFAULT_LOADING_MESSAGE))
    )
}

/// Alert icon with the error text.
pub fn error_markup(message: &str) -> String {
    format!(
        r#"<div class="error-message">{ERROR_ICON}<p>{}</p></div>"#,
        escape_html(message)
    )
}
