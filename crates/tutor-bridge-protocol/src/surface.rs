use std::collections::{BTreeMap, HashMap};

/// A live UI element the dispatcher can manipulate directly when no
/// capability is registered for it
pub trait LiveElement {
    fn text_content(&self) -> String;
    fn set_text_content(&mut self, text: &str);
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);
    fn is_displayed(&self) -> bool;
    fn set_displayed(&mut self, displayed: bool);
}

/// Lookup of live elements by id (the document the UI is rendered into)
pub trait ElementSurface {
    fn element_mut(&mut self, id: &str) -> Option<&mut dyn LiveElement>;
}

/// Plain in-memory element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub displayed: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            text: String::new(),
            attributes: BTreeMap::new(),
            displayed: true,
        }
    }
}

impl LiveElement for Element {
    fn text_content(&self) -> String {
        self.text.clone()
    }

    fn set_text_content(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    fn is_displayed(&self) -> bool {
        self.displayed
    }

    fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }
}

/// In-memory element surface used by headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    elements: HashMap<String, Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, element: Element) -> &mut Self {
        self.elements.insert(id.into(), element);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }
}

impl ElementSurface for ElementTree {
    fn element_mut(&mut self, id: &str) -> Option<&mut dyn LiveElement> {
        self.elements
            .get_mut(id)
            .map(|element| element as &mut dyn LiveElement)
    }
}

/// A surface with no elements: every fallback fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl ElementSurface for NoSurface {
    fn element_mut(&mut self, _id: &str) -> Option<&mut dyn LiveElement> {
        None
    }
}
