//! Render trees produced by components.
//!
//! A component's `render()` is a pure function of its state that returns a
//! [`RenderNode`] tree. Host integrations turn the tree into whatever their
//! platform displays; tests inspect it directly.
//!
//! # Example
//!
//! ```
//! use chatkit::render::{Element, RenderNode};
//!
//! let node: RenderNode = Element::new("div")
//!     .class("cds-aichat-carousel")
//!     .child(RenderNode::text("1 / 8"))
//!     .into();
//!
//! assert_eq!(node.text_content(), "1 / 8");
//! assert!(node.find_by_class("cds-aichat-carousel").is_some());
//! ```

use std::fmt;

/// An element with tag, classes, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Class list, in order.
    pub classes: Vec<String>,
    /// Attributes, in order. Boolean attributes have an empty value.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<RenderNode>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a boolean attribute when `present` is true.
    pub fn bool_attr(self, name: impl Into<String>, present: bool) -> Self {
        if present {
            self.attr(name, "")
        } else {
            self
        }
    }

    /// Append a child.
    pub fn child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a child if one is given.
    pub fn optional_child(mut self, child: Option<impl Into<RenderNode>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A node in a render tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// An element.
    Element(Element),
    /// A text run.
    Text(String),
    /// A content projection point; `None` is the default slot.
    Slot(Option<String>),
    /// Several sibling nodes without a wrapper.
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The default slot.
    pub fn default_slot() -> Self {
        Self::Slot(None)
    }

    /// A named slot.
    pub fn named_slot(name: impl Into<String>) -> Self {
        Self::Slot(Some(name.into()))
    }

    /// Direct children of this node.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Element(element) => &element.children,
            Self::Fragment(nodes) => nodes,
            Self::Text(_) | Self::Slot(_) => &[],
        }
    }

    /// Depth-first pre-order iteration over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Every element in the tree, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.walk().filter_map(|node| match node {
            Self::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First element with the given class.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.elements().find(|element| element.has_class(class))
    }

    /// First element with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|element| element.tag == tag)
    }

    /// Slot names in document order (`None` for the default slot).
    pub fn slot_names(&self) -> Vec<Option<&str>> {
        self.walk()
            .filter_map(|node| match node {
                Self::Slot(name) => Some(name.as_deref()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.walk()
            .filter_map(|node| match node {
                Self::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Element {
    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.children.iter().map(RenderNode::text_content).collect()
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Iterator returned by [`RenderNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a RenderNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

impl fmt::Display for RenderNode {
    /// Markup-like serialization, used in logs and snapshot assertions.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Slot(None) => write!(f, "<slot></slot>"),
            Self::Slot(Some(name)) => write!(f, "<slot name=\"{name}\"></slot>"),
            Self::Fragment(nodes) => nodes.iter().try_for_each(|node| write!(f, "{node}")),
            Self::Element(element) => {
                write!(f, "<{}", element.tag)?;
                if !element.classes.is_empty() {
                    write!(f, " class=\"{}\"", element.classes.join(" "))?;
                }
                for (name, value) in &element.attributes {
                    if value.is_empty() {
                        write!(f, " {name}")?;
                    } else {
                        write!(f, " {name}=\"{value}\"")?;
                    }
                }
                write!(f, ">")?;
                for child in &element.children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{}>", element.tag)
            }
        }
    }
}
