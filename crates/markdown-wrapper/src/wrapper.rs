use log::debug;
use serde::Deserialize;

use crate::node::{Element, Node, Parent, Position, Root};
use crate::value::{AttributeValue, Attributes, Properties, PropertyValue};

pub const DEFAULT_TAG_NAME: &str = "div";
pub const DEFAULT_CLASS_NAME: &str = "markdown-wrapper";

/// Property key the configured class name is written under.
pub const CLASS_PROPERTY: &str = "class";

/// Caller-facing wrapper configuration. Unset fields fall back to the
/// defaults when a [`Wrapper`] is built.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapperOptions {
    pub tag_name: Option<String>,
    pub class_name: Option<String>,
    pub attributes: Option<Attributes>,
}

impl WrapperOptions {
    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Layers `other` on top of `self`: set scalars replace, attribute
    /// entries overlay per key.
    pub fn merge(&mut self, other: WrapperOptions) {
        if other.tag_name.is_some() {
            self.tag_name = other.tag_name;
        }
        if other.class_name.is_some() {
            self.class_name = other.class_name;
        }
        if let Some(attributes) = other.attributes {
            match &mut self.attributes {
                Some(existing) => existing.extend(attributes),
                None => self.attributes = Some(attributes),
            }
        }
    }
}

/// Transform that moves a parent's children into one new container element.
///
/// Configuration is resolved once in [`Wrapper::new`] and read-only
/// afterwards. Applying the transform twice nests two wrappers.
#[derive(Clone, Debug, PartialEq)]
pub struct Wrapper {
    tag_name: String,
    class_name: String,
    attributes: Attributes,
}

impl Wrapper {
    pub fn new(options: WrapperOptions) -> Self {
        let WrapperOptions {
            tag_name,
            class_name,
            attributes,
        } = options;

        Wrapper {
            tag_name: tag_name.unwrap_or_else(|| DEFAULT_TAG_NAME.to_owned()),
            class_name: class_name.unwrap_or_else(|| DEFAULT_CLASS_NAME.to_owned()),
            attributes: attributes.unwrap_or_default(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Wraps the children of `tree` and hands the same tree back.
    pub fn transform<P: Parent>(&self, mut tree: P) -> P {
        self.transform_in_place(&mut tree);
        tree
    }

    /// Replaces the children of `tree` with a single wrapper element that
    /// owns the original children in their original order.
    pub fn transform_in_place<P: Parent + ?Sized>(&self, tree: &mut P) {
        let children = std::mem::take(tree.children_mut());
        let wrapped = children.len();
        let element = self.build_element(children, tree.position().copied());

        debug!(
            tag_name = self.tag_name.as_str(),
            class_name = self.class_name.as_str(),
            attributes = self.attributes.len(),
            wrapped = wrapped;
            "Wrapping top-level content"
        );

        *tree.children_mut() = vec![Node::Element(element)];
    }

    /// Builds the wrapper element around `children`.
    ///
    /// Properties start as `{class: class_name}` and every configured
    /// attribute is written over them, so an attribute named `class` wins.
    pub fn build_element(&self, children: Vec<Node>, position: Option<Position>) -> Element {
        let mut properties = Properties::with_capacity(self.attributes.len() + 1);
        properties.insert(
            CLASS_PROPERTY.to_owned(),
            PropertyValue::String(self.class_name.clone()),
        );
        for (key, value) in &self.attributes {
            properties.insert(key.clone(), value.clone().into());
        }

        Element {
            tag_name: self.tag_name.clone(),
            properties,
            children,
            position,
            data: None,
        }
    }
}

impl Default for Wrapper {
    fn default() -> Self {
        Wrapper::new(WrapperOptions::default())
    }
}

/// Curried form of [`Wrapper::transform`] for pipelines that chain
/// `Fn(Root) -> Root` steps.
pub fn wrapper(options: WrapperOptions) -> impl Fn(Root) -> Root {
    let wrapper = Wrapper::new(options);
    move |tree| wrapper.transform(tree)
}
