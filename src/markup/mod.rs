// SPDX-FileCopyrightText: The doctheme authors
// SPDX-License-Identifier: MPL-2.0

//! Renderable markup fragments
//!
//! Markup is carried as structured data. Turning it into HTML is the
//! consuming framework's job, not this crate's.

use std::sync::OnceLock;

use compact_str::CompactString;
use derive_more::{Display, Error};
use itertools::Itertools as _;
use regex::Regex;

/// Type of an element tag name
pub type TagName = CompactString;

/// Type of an attribute name
pub type AttrName = CompactString;

/// Type of an attribute value
pub type AttrValue = CompactString;

const TAG_NAME_REGEX_STR: &str = "^[a-zA-Z][a-zA-Z0-9-]*$";

static TAG_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_name_regex() -> &'static Regex {
    TAG_NAME_REGEX.get_or_init(|| TAG_NAME_REGEX_STR.parse().unwrap())
}

/// Check if the given tag name is valid.
#[must_use]
pub fn is_valid_tag_name(tag_name: &str) -> bool {
    tag_name_regex().is_match(tag_name)
}

const ATTRIBUTE_NAME_REGEX_STR: &str = "^[a-zA-Z_][a-zA-Z0-9_:.-]*$";

static ATTRIBUTE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn attribute_name_regex() -> &'static Regex {
    ATTRIBUTE_NAME_REGEX.get_or_init(|| ATTRIBUTE_NAME_REGEX_STR.parse().unwrap())
}

/// Check if the given attribute name is valid.
#[must_use]
pub fn is_valid_attribute_name(name: &str) -> bool {
    attribute_name_regex().is_match(name)
}

/// Check if the given tag name denotes executable content.
///
/// Tag names are matched case-insensitively as in HTML.
#[must_use]
pub fn is_executable_tag_name(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("script")
}

/// Check if the given attribute name registers an event handler.
#[must_use]
pub fn is_event_handler_attribute_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 2 && bytes[0].eq_ignore_ascii_case(&b'o') && bytes[1].eq_ignore_ascii_case(&b'n')
}

/// A markup validation error
#[derive(Debug, Display, Error)]
pub enum MarkupError {
    /// Malformed tag name.
    #[display("invalid tag name `{tag_name}`")]
    InvalidTagName {
        /// The offending tag name.
        tag_name: TagName,
    },

    /// Malformed attribute name.
    #[display("invalid attribute `{attribute}` in `<{tag_name}>`")]
    InvalidAttributeName {
        /// The enclosing element's tag name.
        tag_name: TagName,

        /// The offending attribute name.
        attribute: AttrName,
    },

    /// The same attribute name occurs more than once within one element.
    #[display("duplicate attribute `{attribute}` in `<{tag_name}>`")]
    DuplicateAttribute {
        /// The enclosing element's tag name.
        tag_name: TagName,

        /// The duplicated attribute name.
        attribute: AttrName,
    },

    /// An element that would execute script content.
    #[display("executable element `<{tag_name}>`")]
    ExecutableElement {
        /// The offending tag name.
        tag_name: TagName,
    },

    /// An attribute that would register an event handler.
    #[display("event handler attribute `{attribute}` in `<{tag_name}>`")]
    EventHandlerAttribute {
        /// The enclosing element's tag name.
        tag_name: TagName,

        /// The offending attribute name.
        attribute: AttrName,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A named attribute of an element
pub struct Attribute {
    /// The name
    pub name: AttrName,

    /// The value
    pub value: AttrValue,
}

impl Attribute {
    /// Check for a well-formed name.
    #[must_use]
    pub fn has_valid_name(&self) -> bool {
        is_valid_attribute_name(&self.name)
    }

    /// Return the name.
    #[must_use]
    pub fn name(&self) -> &AttrName {
        debug_assert!(self.has_valid_name());
        &self.name
    }

    /// Return the value.
    #[must_use]
    pub const fn value(&self) -> &AttrValue {
        &self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A markup element
pub struct Element {
    /// The tag name
    pub tag_name: TagName,

    /// The attributes
    pub attributes: Vec<Attribute>,

    /// Nested content
    ///
    /// Stays empty for void head elements like `<meta>` and `<link>`.
    pub children: Fragment,
}

impl Element {
    /// Find the first attribute name that occurs more than once.
    ///
    /// Equal names with distinct values still count as duplicates.
    #[must_use]
    pub fn duplicate_attribute_name(&self) -> Option<&AttrName> {
        self.attributes
            .iter()
            .map(|attribute| &attribute.name)
            .duplicates()
            .next()
    }

    /// Validate the element and all nested content.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkupError`] for the first violation encountered.
    pub fn validate(&self) -> Result<(), MarkupError> {
        if !is_valid_tag_name(&self.tag_name) {
            return Err(MarkupError::InvalidTagName {
                tag_name: self.tag_name.clone(),
            });
        }
        if is_executable_tag_name(&self.tag_name) {
            return Err(MarkupError::ExecutableElement {
                tag_name: self.tag_name.clone(),
            });
        }
        for attribute in &self.attributes {
            if !attribute.has_valid_name() {
                return Err(MarkupError::InvalidAttributeName {
                    tag_name: self.tag_name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
            if is_event_handler_attribute_name(&attribute.name) {
                return Err(MarkupError::EventHandlerAttribute {
                    tag_name: self.tag_name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }
        if let Some(attribute) = self.duplicate_attribute_name() {
            return Err(MarkupError::DuplicateAttribute {
                tag_name: self.tag_name.clone(),
                attribute: attribute.clone(),
            });
        }
        self.children.validate()
    }
}

/// A single node of a renderable fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(String),

    /// A nested element.
    Element(Element),

    /// Placeholder for the calendar year at configuration time.
    ///
    /// Replaced by a [`Node::Text`] when the configuration is built
    /// and never re-evaluated afterwards.
    CurrentYear,
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Validate the node.
    ///
    /// Text and year placeholders are always valid.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkupError`] if the node is an invalid element.
    pub fn validate(&self) -> Result<(), MarkupError> {
        match self {
            Self::Element(element) => element.validate(),
            Self::Text(_) | Self::CurrentYear => Ok(()),
        }
    }

    /// Replace a [`Node::CurrentYear`] placeholder with the literal year.
    #[must_use]
    pub fn stamp_year(self, year: i32) -> Self {
        match self {
            Self::CurrentYear => Self::Text(year.to_string()),
            Self::Element(element) => Self::Element(Element {
                children: element.children.stamp_year(year),
                ..element
            }),
            Self::Text(_) => self,
        }
    }
}

/// An ordered list of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// The nodes
    pub nodes: Vec<Node>,
}

impl Fragment {
    /// Check for an empty fragment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate all nodes in the fragment.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkupError`] for the first violation encountered.
    pub fn validate(&self) -> Result<(), MarkupError> {
        self.nodes.iter().try_for_each(Node::validate)
    }

    /// Replace every [`Node::CurrentYear`] with the literal year.
    ///
    /// Descends into nested elements. Stamping a fragment twice is a
    /// no-op, all placeholders are gone after the first pass.
    #[must_use]
    pub fn stamp_year(self, year: i32) -> Self {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| node.stamp_year(year))
            .collect();
        Self { nodes }
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
