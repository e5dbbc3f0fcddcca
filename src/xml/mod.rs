//! Owned XML tree for feed documents.
//!
//! Elements are built bottom-up and attached to their parent by value, so the
//! tree never needs parent back-references. A [`Document`] pairs the root
//! element with the declared encoding and is serialized by [`write`].
//!
//! ```ignore
//! let item = Element::new("item")
//!     .child(Element::new("title").cdata("Hello"))
//!     .child(Element::new("link").text("http://x.test/1"));
//! let doc = Document::new("UTF-8", Element::new("rss").child(item));
//! let xml = doc.to_xml()?;
//! ```

mod write;

pub use write::XmlError;

// ============================================================================
// Node / Element
// ============================================================================

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, entity-escaped on output.
    Text(String),
    /// Character data wrapped in CDATA section(s), never entity-escaped.
    CData(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (insertion order is kept on output).
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Append a child element.
    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    /// Append escaped text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append CDATA content.
    pub fn cdata(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::CData(text.into()));
        self
    }

    /// Append a child element to an element that is already in place.
    pub fn push(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Last child element, used by formatters to reach their container.
    pub fn last_element_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().rev().find_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text and CDATA content of direct children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(s) | Node::CData(s) => Some(s.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

// ============================================================================
// Document
// ============================================================================

/// A complete XML 1.0 document: declaration plus root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    encoding: String,
    root: Element,
}

impl Document {
    pub fn new(encoding: impl Into<String>, root: Element) -> Self {
        Self {
            encoding: encoding.into(),
            root,
        }
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serialize with two-space indentation.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        write::write_document(self, true)
    }

    /// Serialize without any inter-element whitespace.
    pub fn to_xml_compact(&self) -> Result<String, XmlError> {
        write::write_document(self, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let e = Element::new("item")
            .attr("a", "1")
            .attr("b", "2")
            .child(Element::new("title"))
            .text("x")
            .child(Element::new("link"));

        assert_eq!(e.attributes()[0], ("a".to_string(), "1".to_string()));
        assert_eq!(e.attribute("b"), Some("2"));
        assert_eq!(e.attribute("c"), None);
        let names: Vec<_> = e.elements().map(Element::name).collect();
        assert_eq!(names, ["title", "link"]);
        assert_eq!(e.children().len(), 3);
    }

    #[test]
    fn test_last_element_mut_skips_text() {
        let mut root = Element::new("rss").child(Element::new("channel")).text("tail");
        root.last_element_mut()
            .expect("channel")
            .push(Element::new("item"));

        let channel = root.find("channel").unwrap();
        assert!(channel.find("item").is_some());
    }

    #[test]
    fn test_text_content() {
        let e = Element::new("title").text("a").cdata("<b>");
        assert_eq!(e.text_content(), "a<b>");
    }
}
