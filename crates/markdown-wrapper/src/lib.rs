//! Wraps the top-level content of an HTML syntax tree in one container
//! element.
//!
//! ```
//! use markdown_wrapper::{Element, Node, Root, Text, Wrapper, WrapperOptions};
//!
//! let tree = Root::new(vec![
//!     Node::from(Element::new("h1").with_children(vec![Node::from(Text::new("Hello"))])),
//!     Node::from(Element::new("p").with_children(vec![Node::from(Text::new("Body"))])),
//! ]);
//!
//! let wrapper = Wrapper::new(WrapperOptions::default().with_tag_name("section"));
//! let tree = wrapper.transform(tree);
//!
//! let section = tree.children[0].as_element().unwrap();
//! assert_eq!(tree.children.len(), 1);
//! assert_eq!(section.tag_name, "section");
//! assert_eq!(section.children.len(), 2);
//! ```

pub mod node;
pub mod value;
pub mod wrapper;

pub use node::{Comment, Doctype, Element, Node, Parent, Point, Position, Raw, Root, Text};
pub use value::{AttributeValue, Attributes, Properties, PropertyValue};
pub use wrapper::{
    wrapper, Wrapper, WrapperOptions, CLASS_PROPERTY, DEFAULT_CLASS_NAME, DEFAULT_TAG_NAME,
};
