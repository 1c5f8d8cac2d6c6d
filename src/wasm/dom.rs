use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlDocument, HtmlElement, HtmlFormControlsCollection,
    HtmlFormElement, HtmlInputElement, HtmlScriptElement, HtmlSelectElement, HtmlTextAreaElement,
    RadioNodeList, Storage, Window,
};

use crate::page::{BoxMetrics, Page, SessionStore, Transition};
use crate::validation::{self, FormFields};

use super::jquery;

fn native_selector(selector: &str) -> String {
    selector.replace(":checkbox", "[type=checkbox]")
}

fn collect(list: web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn control_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(|area| area.value())
}

#[derive(Clone, Debug)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn last_script_src(&self) -> Option<String> {
        let scripts = self.document.scripts();
        let last = scripts.length().checked_sub(1)?;
        scripts
            .item(last)?
            .dyn_into::<HtmlScriptElement>()
            .ok()
            .map(|script| script.src())
    }

    pub fn cookie_header(&self) -> String {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|doc| doc.cookie().ok())
            .unwrap_or_default()
    }
}

impl Page for WebPage {
    type Node = Element;

    fn query(&self, selector: &str) -> Vec<Element> {
        self.document
            .query_selector_all(&native_selector(selector))
            .map(collect)
            .unwrap_or_default()
    }

    fn children(&self, node: &Element, selector: &str) -> Vec<Element> {
        let selector = native_selector(selector);
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| child.matches(&selector).unwrap_or(false))
            .collect()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_visible(&self, node: &Element, visible: bool, transition: Transition) {
        let target: &JsValue = node.as_ref();
        jquery::set_visible(&jquery::jq(target), visible, transition);
    }

    fn is_visible(&self, node: &Element) -> bool {
        let target: &JsValue = node.as_ref();
        jquery::jq(target).matches(":visible")
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>()
            .is_some_and(|input| input.checked())
    }

    fn set_checked(&self, node: &Element, checked: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_disabled(disabled);
        }
    }

    fn value(&self, node: &Element) -> String {
        control_value(node).unwrap_or_default()
    }

    fn set_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn id(&self, node: &Element) -> String {
        node.id()
    }

    fn metrics(&self, node: &Element) -> BoxMetrics {
        let (offset_width, offset_height) = node
            .dyn_ref::<HtmlElement>()
            .map(|el| (el.offset_width(), el.offset_height()))
            .unwrap_or((node.client_width(), node.client_height()));
        BoxMetrics {
            offset_width,
            offset_height,
            scroll_width: node.scroll_width(),
            scroll_height: node.scroll_height(),
        }
    }

    fn resolved_href(&self, node: &Element) -> Option<String> {
        node.dyn_ref::<HtmlAnchorElement>().map(|a| a.href())
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn open_modal(&self, selector: &str) {
        jquery::select(selector).modal("show");
    }

    fn click(&self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            el.click();
        }
    }
}

pub struct WebSession(Storage);

impl WebSession {
    pub fn open(window: &Window) -> Option<Self> {
        window.session_storage().ok().flatten().map(Self)
    }
}

impl SessionStore for WebSession {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = self.0.set_item(key, value);
    }
}

pub struct FormControls(pub HtmlFormElement);

impl FormFields for FormControls {
    fn field(&self, name: &str) -> Option<String> {
        let named = self
            .0
            .elements()
            .dyn_into::<HtmlFormControlsCollection>()
            .ok()?
            .named_item(name)?;
        if let Some(group) = named.dyn_ref::<RadioNodeList>() {
            let controls = (0..group.length())
                .filter_map(|i| group.item(i))
                .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
                .map(|input| (input.type_() == "radio", input.checked(), input.value()));
            return Some(validation::group_value(controls));
        }
        control_value(named.dyn_ref::<Element>()?)
    }
}
