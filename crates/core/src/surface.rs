//! Renderable surface the widget draws into.
//!
//! The widget never talks to a concrete UI toolkit. It reads the field value,
//! writes attributes and replaces child lists on named elements; a host maps
//! those elements onto whatever it actually displays.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Form,
    SearchField,
    SearchContainer,
    SuggestionsList,
    LiveRegion,
    HistoryPanel,
    HistoryList,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::Form,
        Element::SearchField,
        Element::SearchContainer,
        Element::SuggestionsList,
        Element::LiveRegion,
        Element::HistoryPanel,
        Element::HistoryList,
    ];
}

/// Detached child element, the unit of `replace_children`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First descendant (depth-first) with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Node> {
        for c in &self.children {
            if c.tag == tag {
                return Some(c);
            }
            if let Some(found) = c.find(tag) {
                return Some(found);
            }
        }
        None
    }
}

pub trait Surface {
    fn value(&self, el: Element) -> String;
    fn set_value(&mut self, el: Element, value: &str);
    fn attribute(&self, el: Element, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: Element, name: &str, value: &str);
    fn remove_attribute(&mut self, el: Element, name: &str);
    fn children(&self, el: Element) -> &[Node];
    fn replace_children(&mut self, el: Element, children: Vec<Node>);
    fn text(&self, el: Element) -> String;
    fn set_text(&mut self, el: Element, text: &str);
    fn is_hidden(&self, el: Element) -> bool;
    fn set_hidden(&mut self, el: Element, hidden: bool);
}

#[derive(Clone, Debug, Default)]
struct ElementState {
    value: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    text: String,
    hidden: bool,
}

/// In-memory document. Every element exists from construction on.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    elements: BTreeMap<Element, ElementState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        let elements = Element::ALL
            .iter()
            .map(|el| (*el, ElementState::default()))
            .collect();
        Self { elements }
    }

    fn state(&self, el: Element) -> &ElementState {
        // populated for every variant in `new`
        &self.elements[&el]
    }

    fn state_mut(&mut self, el: Element) -> &mut ElementState {
        self.elements.entry(el).or_default()
    }
}

impl Surface for MemorySurface {
    fn value(&self, el: Element) -> String {
        self.state(el).value.clone()
    }

    fn set_value(&mut self, el: Element, value: &str) {
        self.state_mut(el).value = value.to_string();
    }

    fn attribute(&self, el: Element, name: &str) -> Option<String> {
        self.state(el).attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, el: Element, name: &str, value: &str) {
        self.state_mut(el)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, el: Element, name: &str) {
        self.state_mut(el).attributes.remove(name);
    }

    fn children(&self, el: Element) -> &[Node] {
        &self.state(el).children
    }

    fn replace_children(&mut self, el: Element, children: Vec<Node>) {
        self.state_mut(el).children = children;
    }

    fn text(&self, el: Element) -> String {
        self.state(el).text.clone()
    }

    fn set_text(&mut self, el: Element, text: &str) {
        self.state_mut(el).text = text.to_string();
    }

    fn is_hidden(&self, el: Element) -> bool {
        self.state(el).hidden
    }

    fn set_hidden(&mut self, el: Element, hidden: bool) {
        self.state_mut(el).hidden = hidden;
    }
}
