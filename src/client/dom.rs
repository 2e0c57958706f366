//! DOM seam: elements, events and the modal host.

use std::collections::BTreeMap;

use crate::protocol::dom::{BACKGROUND_URI_ATTR, DATA_TARGET, MODAL_TARGET};

/// The slice of a DOM element the controller inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Shorthand for an `a[data-target="modal"]` link.
    pub fn modal_link(href: impl Into<String>) -> Self {
        Self::new("a")
            .with_attribute("href", href)
            .with_attribute(DATA_TARGET, MODAL_TARGET)
    }

    /// Shorthand for a `form[data-target="modal"]`.
    pub fn modal_form(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new("form")
            .with_attribute("action", action)
            .with_attribute("method", method)
            .with_attribute(DATA_TARGET, MODAL_TARGET)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// `tag[data-target="modal"]`.
    pub fn opens_in_modal(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag) && self.attribute(DATA_TARGET) == Some(MODAL_TARGET)
    }

    pub fn background_uri(&self) -> Option<&str> {
        self.attribute(BACKGROUND_URI_ATTR)
    }
}

#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub target: Element,
    pub default_prevented: bool,
}

impl ClickEvent {
    pub fn on(target: Element) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: Element,
    pub fields: Vec<(String, String)>,
}

/// The modal widget's "closing" event.
#[derive(Debug, Clone, Copy)]
pub struct HideEvent {
    /// True when the closing widget is the one bound to the root element.
    pub on_root: bool,
}

/// The root element the controller manages and the modal widget bound to it.
pub trait ModalHost {
    fn root(&self) -> &Element;

    /// Replace the root element's inner HTML.
    fn set_content(&mut self, html: &str);

    /// Create (if needed) and show the widget bound to the root.
    fn show_modal(&mut self);

    /// Tear down the current widget instance, if any.
    fn dispose_modal(&mut self);
}

/// In-memory host that records what a browser would display.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    root: Element,
    content: String,
    visible: bool,
    instances: usize,
}

impl MemoryHost {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            content: String::new(),
            visible: false,
            instances: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Widget instances created so far.
    pub fn instances(&self) -> usize {
        self.instances
    }

    /// The user closed the widget.
    pub fn hide(&mut self) -> HideEvent {
        self.visible = false;
        HideEvent { on_root: true }
    }
}

impl ModalHost for MemoryHost {
    fn root(&self) -> &Element {
        &self.root
    }

    fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
    }

    fn show_modal(&mut self) {
        if !self.visible {
            self.instances += 1;
        }
        self.visible = true;
    }

    fn dispose_modal(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_in_modal() {
        assert!(Element::modal_link("/x").opens_in_modal("a"));
        assert!(Element::new("A").with_attribute("data-target", "modal").opens_in_modal("a"));
        assert!(!Element::new("a").with_attribute("href", "/x").opens_in_modal("a"));
        assert!(!Element::new("a").with_attribute("data-target", "page").opens_in_modal("a"));
        assert!(!Element::modal_link("/x").opens_in_modal("form"));
    }

    #[test]
    fn test_host_widget_lifecycle() {
        let mut host = MemoryHost::new(Element::new("div"));
        host.set_content("<p>a</p>");
        host.show_modal();
        host.dispose_modal();
        host.show_modal();
        assert_eq!(host.instances(), 2);
        assert!(host.is_visible());
        host.hide();
        assert!(!host.is_visible());
    }
}
