//! Shared tree fixtures for markdown-wrapper tests.

use markdown_wrapper::{Element, Node, Point, Position, Root, Text};

/// Text node.
pub fn text(value: &str) -> Node {
    Node::from(Text::new(value))
}

/// Element with no properties.
pub fn element(tag_name: &str, children: Vec<Node>) -> Node {
    Node::from(Element::new(tag_name).with_children(children))
}

/// Span covering `# Hello\n\nThis is a test.`.
pub fn document_position() -> Position {
    Position::new(
        Point::new(1, 1).with_offset(0),
        Point::new(3, 16).with_offset(24),
    )
}

/// Top-level nodes produced for `# Hello\n\nThis is a test.`.
pub fn hello_children() -> Vec<Node> {
    vec![
        element("h1", vec![text("Hello")]),
        element("p", vec![text("This is a test.")]),
    ]
}

/// Root for `# Hello\n\nThis is a test.` with its source position.
pub fn hello_root() -> Root {
    Root::new(hello_children()).with_position(document_position())
}

/// [`hello_root`] encoded as HAST JSON.
pub fn hello_root_json() -> String {
    serde_json::to_string(&Node::Root(hello_root())).expect("encode fixture")
}
