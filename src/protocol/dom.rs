//! DOM contract between server-rendered pages and the client controller.

/// Attribute that opts a link or form into modal interception.
pub const DATA_TARGET: &str = "data-target";

/// Value of [`DATA_TARGET`] that selects modal behaviour.
pub const MODAL_TARGET: &str = "modal";

/// Attribute on the root element carrying the background page URI.
pub const BACKGROUND_URI_ATTR: &str = "data-modal-background-uri";

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the element the client controller attaches to.
///
/// With a background URI the element starts out hosting the modal fragment;
/// without one it is an empty mount point.
pub fn modal_root(background: Option<&str>, content: &str) -> String {
    match background {
        Some(uri) => format!(
            r#"<div data-controller="modal" {}="{}">{}</div>"#,
            BACKGROUND_URI_ATTR,
            escape_html(uri),
            content
        ),
        None => r#"<div data-controller="modal"></div>"#.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_modal_root_carries_background() {
        let html = modal_root(Some("/items?sort=a&b"), "<p>hi</p>");
        assert!(html.contains(r#"data-modal-background-uri="/items?sort=a&amp;b""#));
        assert!(html.ends_with("<p>hi</p></div>"));

        let empty = modal_root(None, "<p>ignored</p>");
        assert!(!empty.contains(BACKGROUND_URI_ATTR));
        assert!(!empty.contains("ignored"));
    }
}
