//! HTML syntax tree shared with the rest of the pipeline.
//!
//! The shapes mirror the unist/HAST JSON layout (`{"type": "element",
//! "tagName": "p", ...}`) so trees produced by an upstream Markdown-to-HTML
//! step can be decoded, rewritten and handed to a downstream serializer
//! without conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{Properties, PropertyValue};

/// One node of the tree.
///
/// Nodes of any other type (MDX expressions, plugin-specific nodes) and
/// known types that fail to decode are kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Root(Root),
    Element(Element),
    Text(Text),
    Comment(Comment),
    Doctype(Doctype),
    Raw(Raw),
    #[serde(untagged)]
    Other(Value),
}

impl Node {
    /// The `type` discriminator as it appears in JSON.
    pub fn type_name(&self) -> &str {
        match self {
            Node::Root(_) => "root",
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
            Node::Doctype(_) => "doctype",
            Node::Raw(_) => "raw",
            Node::Other(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        }
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Node::Root(root) => root.position.as_ref(),
            Node::Element(element) => element.position.as_ref(),
            Node::Text(text) => text.position.as_ref(),
            Node::Comment(comment) => comment.position.as_ref(),
            Node::Doctype(doctype) => doctype.position.as_ref(),
            Node::Raw(raw) => raw.position.as_ref(),
            Node::Other(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Child nodes for the parent variants, `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(root) => Some(root.children.as_slice()),
            Node::Element(element) => Some(element.children.as_slice()),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

/// A node owning an ordered sequence of children.
pub trait Parent {
    fn children(&self) -> &[Node];
    fn children_mut(&mut self) -> &mut Vec<Node>;
    fn position(&self) -> Option<&Position>;
}

/// Document root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Root {
            children,
            position: None,
            data: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

impl Parent for Root {
    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }
}

/// Element with a tag name, properties and children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Element {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children: Vec::new(),
            position: None,
            data: None,
        }
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

impl Parent for Element {
    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Text {
            value: value.into(),
            position: None,
            data: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Comment {
    pub fn new(value: impl Into<String>) -> Self {
        Comment {
            value: value.into(),
            position: None,
            data: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctype {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Raw HTML passed through verbatim by the serializer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Raw {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Source span of a node in the original document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Position { start, end }
    }
}

/// 1-based line and column, with an optional 0-based byte offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Point {
            line,
            column,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}
