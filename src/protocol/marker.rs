//! The modal request marker.
//!
//! Every request the client issues for modal content carries `_modal=1`. The
//! server only tests for presence; the value is irrelevant. The marker must
//! never reach the address bar or a stored history entry.

use url::{form_urlencoded, Url};

/// Reserved query parameter name.
pub const MODAL_MARKER: &str = "_modal";

/// Value the client sends with the marker.
pub const MODAL_MARKER_VALUE: &str = "1";

/// Returns true if a raw query string contains the marker.
pub fn has_marker(query: Option<&str>) -> bool {
    query
        .map(|q| form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == MODAL_MARKER))
        .unwrap_or(false)
}

/// Set the marker on a URL.
pub fn add_marker(url: &mut Url) {
    set_query_pairs(url, [(MODAL_MARKER, MODAL_MARKER_VALUE)]);
}

/// Copy of `url` with every marker pair removed.
pub fn strip_marker(url: &Url) -> Url {
    let mut stripped = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != MODAL_MARKER)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if url.query().is_some() && kept.len() != url.query_pairs().count() {
        write_query(&mut stripped, &kept);
    }
    stripped
}

/// Set query pairs with `URLSearchParams.set` semantics: the first existing
/// pair with the same key takes the new value and later duplicates are
/// dropped; unknown keys are appended.
pub fn set_query_pairs<'a, I>(url: &mut Url, pairs: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut current: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in pairs {
        match current.iter().position(|(k, _)| k == key) {
            Some(first) => {
                current[first].1 = value.to_string();
                let mut index = 0;
                current.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => current.push((key.to_string(), value.to_string())),
        }
    }

    write_query(url, &current);
}

fn write_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_has_marker() {
        assert!(has_marker(Some("_modal=1")));
        assert!(has_marker(Some("page=2&_modal")));
        assert!(has_marker(Some("_modal=")));
        assert!(!has_marker(Some("modal=1")));
        assert!(!has_marker(Some("")));
        assert!(!has_marker(None));
    }

    #[test]
    fn test_add_marker_keeps_existing_query() {
        let mut u = url("http://example.com/items?sort=name");
        add_marker(&mut u);
        assert_eq!(u.as_str(), "http://example.com/items?sort=name&_modal=1");

        let mut bare = url("http://example.com/items");
        add_marker(&mut bare);
        assert_eq!(bare.as_str(), "http://example.com/items?_modal=1");
    }

    #[test]
    fn test_add_marker_is_idempotent() {
        let mut u = url("http://example.com/items?_modal=0&_modal=7");
        add_marker(&mut u);
        assert_eq!(u.as_str(), "http://example.com/items?_modal=1");
    }

    #[test]
    fn test_strip_marker() {
        let u = url("http://example.com/items?_modal=1");
        assert_eq!(strip_marker(&u).as_str(), "http://example.com/items");

        let u = url("http://example.com/items?q=a&_modal=1&page=2");
        assert_eq!(strip_marker(&u).as_str(), "http://example.com/items?q=a&page=2");
    }

    #[test]
    fn test_strip_marker_leaves_unmarked_url_untouched() {
        let u = url("http://example.com/items?q=a%20b");
        assert_eq!(strip_marker(&u).as_str(), "http://example.com/items?q=a%20b");
    }

    #[test]
    fn test_set_query_pairs_replaces_and_appends() {
        let mut u = url("http://example.com/search?q=old&x=1&q=dup");
        set_query_pairs(&mut u, [("q", "new"), ("page", "3")]);
        assert_eq!(u.as_str(), "http://example.com/search?q=new&x=1&page=3");
    }
}
