use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{BoxMetrics, Page, Transition};
use crate::render::escape_html;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub html: String,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    pub visible: bool,
    pub metrics: BoxMetrics,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            html: String::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            visible: true,
            metrics: BoxMetrics::default(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        for c in class.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == c) {
                self.classes.push(c.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn metrics(mut self, metrics: BoxMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn checkbox(name: &str) -> Self {
        Self::new("input").attr("type", "checkbox").attr("name", name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    location: String,
    nodes: RefCell<Vec<NodeData>>,
    modals: RefCell<Vec<String>>,
    clicks: RefCell<Vec<NodeId>>,
}

impl MemoryPage {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            ..Self::default()
        }
    }

    pub fn append(&self, parent: Option<NodeId>, element: Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(NodeData {
            element,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn element(&self, node: NodeId) -> Element {
        self.nodes.borrow()[node.0].element.clone()
    }

    pub fn first(&self, selector: &str) -> Option<NodeId> {
        self.query(selector).into_iter().next()
    }

    pub fn opened_modals(&self) -> Vec<String> {
        self.modals.borrow().clone()
    }

    pub fn clicked(&self) -> Vec<NodeId> {
        self.clicks.borrow().clone()
    }

    fn with_element<R>(&self, node: &NodeId, f: impl FnOnce(&Element) -> R) -> R {
        f(&self.nodes.borrow()[node.0].element)
    }

    fn update(&self, node: &NodeId, f: impl FnOnce(&mut Element)) {
        f(&mut self.nodes.borrow_mut()[node.0].element)
    }

    fn matches_chain(&self, node: NodeId, chain: &[(Combinator, Compound)]) -> bool {
        let Some(((combinator, compound), rest)) = chain.split_last() else {
            return true;
        };
        let nodes = self.nodes.borrow();
        if !compound.matches(&nodes[node.0].element) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        let mut parent = nodes[node.0].parent;
        drop(nodes);
        match combinator {
            Combinator::Child => parent.is_some_and(|p| self.matches_chain(p, rest)),
            Combinator::Descendant => {
                while let Some(p) = parent {
                    if self.matches_chain(p, rest) {
                        return true;
                    }
                    parent = self.nodes.borrow()[p.0].parent;
                }
                false
            }
        }
    }
}

impl Page for MemoryPage {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Vec<NodeId> {
        let groups = parse_selector(selector);
        let count = self.nodes.borrow().len();
        (0..count)
            .map(NodeId)
            .filter(|node| groups.iter().any(|chain| self.matches_chain(*node, chain)))
            .collect()
    }

    fn children(&self, node: &NodeId, selector: &str) -> Vec<NodeId> {
        let groups = parse_selector(selector);
        let direct = self.nodes.borrow()[node.0].children.clone();
        direct
            .into_iter()
            .filter(|child| groups.iter().any(|chain| self.matches_chain(*child, chain)))
            .collect()
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.with_element(node, |el| el.html.clone())
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.update(node, |el| el.html = html.to_string());
    }

    fn text(&self, node: &NodeId) -> String {
        self.with_element(node, |el| strip_tags(&el.html))
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.update(node, |el| el.html = escape_html(text));
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.update(node, |el| {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.update(node, |el| el.classes.retain(|c| c != class));
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_element(node, |el| el.has_class(class))
    }

    fn set_visible(&self, node: &NodeId, visible: bool, _transition: Transition) {
        self.update(node, |el| el.visible = visible);
    }

    fn is_visible(&self, node: &NodeId) -> bool {
        self.with_element(node, |el| el.visible)
    }

    fn is_checked(&self, node: &NodeId) -> bool {
        self.with_element(node, |el| el.checked)
    }

    fn set_checked(&self, node: &NodeId, checked: bool) {
        self.update(node, |el| el.checked = checked);
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.update(node, |el| el.disabled = disabled);
    }

    fn value(&self, node: &NodeId) -> String {
        self.with_element(node, |el| el.value.clone())
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.update(node, |el| el.value = value.to_string());
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(node, |el| el.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: &str) {
        self.update(node, |el| {
            el.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        });
    }

    fn id(&self, node: &NodeId) -> String {
        self.with_element(node, |el| el.id.clone().unwrap_or_default())
    }

    fn metrics(&self, node: &NodeId) -> BoxMetrics {
        self.with_element(node, |el| el.metrics)
    }

    fn resolved_href(&self, node: &NodeId) -> Option<String> {
        let href = self.attr(node, "href")?;
        let base = reqwest::Url::parse(&self.location).ok()?;
        base.join(&href).ok().map(|url| url.to_string())
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn open_modal(&self, selector: &str) {
        self.modals.borrow_mut().push(selector.to_string());
    }

    fn click(&self, node: &NodeId) {
        self.clicks.borrow_mut().push(*node);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    pseudo: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = self.tag.as_deref() {
            if tag != "*" && tag != el.tag {
                return false;
            }
        }
        if let Some(id) = self.id.as_deref() {
            if el.id.as_deref() != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        for (name, expected) in self.attrs.iter() {
            match (el.attrs.get(name), expected) {
                (None, _) => return false,
                (Some(actual), Some(expected)) if actual != expected => return false,
                _ => {}
            }
        }
        self.pseudo.iter().all(|p| match p.as_str() {
            "checkbox" => {
                el.tag == "input" && el.attrs.get("type").map(String::as_str) == Some("checkbox")
            }
            "checked" => el.checked,
            "hidden" => !el.visible,
            "visible" => el.visible,
            _ => false,
        })
    }
}

fn parse_selector(selector: &str) -> Vec<Vec<(Combinator, Compound)>> {
    selector
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(parse_chain)
        .collect()
}

fn parse_chain(group: &str) -> Vec<(Combinator, Compound)> {
    let spaced = group.replace('>', " > ");
    let mut chain = Vec::new();
    let mut combinator = Combinator::Descendant;
    for token in spaced.split_whitespace() {
        if token == ">" {
            combinator = Combinator::Child;
            continue;
        }
        chain.push((combinator, parse_compound(token)));
        combinator = Combinator::Descendant;
    }
    chain
}

fn parse_compound(token: &str) -> Compound {
    let mut compound = Compound::default();
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;
    let read_ident = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && (chars[end].is_alphanumeric() || matches!(chars[end], '-' | '_' | '*'))
        {
            end += 1;
        }
        (chars[start..end].iter().collect(), end)
    };
    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (ident, end) = read_ident(i + 1);
                compound.id = Some(ident);
                i = end;
            }
            '.' => {
                let (ident, end) = read_ident(i + 1);
                compound.classes.push(ident);
                i = end;
            }
            ':' => {
                let (ident, end) = read_ident(i + 1);
                compound.pseudo.push(ident);
                i = end;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| i + p)
                    .unwrap_or(chars.len());
                let inner: String = chars[i + 1..close].iter().collect();
                let attr = match inner.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_ascii_lowercase(),
                        Some(value.trim().trim_matches(['"', '\'']).to_string()),
                    ),
                    None => (inner.trim().to_ascii_lowercase(), None),
                };
                compound.attrs.push(attr);
                i = close + 1;
            }
            _ => {
                let (ident, end) = read_ident(i);
                if end == i {
                    i += 1;
                    continue;
                }
                compound.tag = Some(ident.to_ascii_lowercase());
                i = end;
            }
        }
    }
    compound
}

pub(crate) fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
