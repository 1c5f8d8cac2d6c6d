pub mod interactions;
pub mod memory;
pub mod session;

use std::time::Duration;

pub use memory::{Element, MemoryPage, NodeId};
pub use session::{MemorySession, SessionStore};

pub const LOADER: &str = ".buy4industry-loader";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Instant,
    Fade,
    Slide(Duration),
    Blind(Duration),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoxMetrics {
    pub offset_width: i32,
    pub offset_height: i32,
    pub scroll_width: i32,
    pub scroll_height: i32,
}

impl BoxMetrics {
    pub fn overflows(&self) -> bool {
        self.offset_height < self.scroll_height || self.offset_width < self.scroll_width
    }
}

pub trait Page {
    type Node: Clone;

    fn query(&self, selector: &str) -> Vec<Self::Node>;
    fn children(&self, node: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn inner_html(&self, node: &Self::Node) -> String;
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_visible(&self, node: &Self::Node, visible: bool, transition: Transition);
    fn is_visible(&self, node: &Self::Node) -> bool;

    fn is_checked(&self, node: &Self::Node) -> bool;
    fn set_checked(&self, node: &Self::Node, checked: bool);
    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);
    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attr(&self, node: &Self::Node, name: &str, value: &str);

    fn id(&self, node: &Self::Node) -> String;
    fn metrics(&self, node: &Self::Node) -> BoxMetrics;
    fn resolved_href(&self, node: &Self::Node) -> Option<String>;
    fn location(&self) -> String;

    fn open_modal(&self, selector: &str);
    fn click(&self, node: &Self::Node);

    fn set_html_all(&self, selector: &str, html: &str) {
        for node in self.query(selector) {
            self.set_inner_html(&node, html);
        }
    }

    fn set_text_all(&self, selector: &str, text: &str) {
        for node in self.query(selector) {
            self.set_text(&node, text);
        }
    }

    fn add_class_all(&self, selector: &str, class: &str) {
        for node in self.query(selector) {
            self.add_class(&node, class);
        }
    }

    fn remove_class_all(&self, selector: &str, class: &str) {
        for node in self.query(selector) {
            self.remove_class(&node, class);
        }
    }

    fn show_all(&self, selector: &str, transition: Transition) {
        for node in self.query(selector) {
            self.set_visible(&node, true, transition);
        }
    }

    fn hide_all(&self, selector: &str, transition: Transition) {
        for node in self.query(selector) {
            self.set_visible(&node, false, transition);
        }
    }

    fn set_checked_all(&self, selector: &str, checked: bool) {
        for node in self.query(selector) {
            self.set_checked(&node, checked);
        }
    }

    fn set_value_all(&self, selector: &str, value: &str) {
        for node in self.query(selector) {
            self.set_value(&node, value);
        }
    }

    fn first_value(&self, selector: &str) -> String {
        self.query(selector)
            .first()
            .map(|node| self.value(node))
            .unwrap_or_default()
    }
}

pub struct Loader<'a, P: Page> {
    page: &'a P,
}

impl<'a, P: Page> Loader<'a, P> {
    pub fn show(page: &'a P) -> Self {
        page.show_all(LOADER, Transition::Fade);
        Self { page }
    }
}

impl<P: Page> Drop for Loader<'_, P> {
    fn drop(&mut self) {
        self.page.hide_all(LOADER, Transition::Fade);
    }
}
