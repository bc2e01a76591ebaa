#![deny(missing_docs)]

//! # API Spec Model
//!
//! In-memory description of an API: a service made of route groups, plus the
//! struct types that requests and responses refer to by name.
//!
//! - **tags**: member annotation parsing.
//! - **types**: explicit type descriptors.
//!
//! The model is read-only for the generator. It derives `Deserialize` so an
//! external parser (or the CLI) can hand it over as JSON or YAML.

pub mod tags;
pub mod types;

pub use tags::{parse_tags, Tag};
pub use types::TypeDescriptor;

use crate::error::AppResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tags::{
    parse_member_tags, FORM_TAG_KEY, HEADER_TAG_KEY, NAMING_TAG_KEYS, PATH_TAG_KEY,
    BODY_TAG_KEY,
};

/// Group annotation holding the route path prefix.
pub const PREFIX_ANNOTATION: &str = "prefix";
/// Group annotation holding the default tag name.
pub const GROUP_ANNOTATION: &str = "group";
/// Group annotation enabling bearer authentication.
pub const JWT_ANNOTATION: &str = "jwt";

/// Root of a parsed API description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
    /// Document-level `info` properties (`title`, `version`, `desc`, ...).
    #[serde(default)]
    pub info: IndexMap<String, String>,
    /// The single service described by the API.
    pub service: Service,
    /// All struct types declared alongside the service.
    #[serde(default)]
    pub types: Vec<StructType>,
}

impl ApiSpec {
    /// Looks up a struct type by name.
    pub fn find_type(&self, name: &str) -> Option<&StructType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Returns an info property with surrounding quotes removed; empty values are `None`.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info
            .get(key)
            .map(|v| unquote(v))
            .filter(|v| !v.is_empty())
    }
}

/// A named service and its route groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name; the tag of last resort for operations.
    pub name: String,
    /// Route groups in declaration order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Routes sharing a `@server(...)` annotation block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Annotation properties such as `prefix`, `group` and `jwt`.
    #[serde(default)]
    pub annotation: IndexMap<String, String>,
    /// Routes in declaration order.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Group {
    /// Creates a group without annotations.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            annotation: IndexMap::new(),
            routes,
        }
    }

    /// Adds an annotation property.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotation.insert(key.into(), value.into());
        self
    }

    /// Returns an annotation value, trimmed and unquoted; empty values are `None`.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotation
            .get(key)
            .map(|v| unquote(v))
            .filter(|v| !v.is_empty())
    }
}

/// A single HTTP route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// HTTP method, case-insensitive.
    pub method: String,
    /// Route path, possibly containing `:name` placeholders.
    pub path: String,
    /// Handler name; becomes the operation id.
    pub handler: String,
    /// Name of the request struct. An empty name denotes an anonymous type.
    #[serde(default)]
    pub request_type: Option<String>,
    /// Name of the response struct. An empty name denotes an anonymous type.
    #[serde(default)]
    pub response_type: Option<String>,
    /// `@doc(...)` properties.
    #[serde(default)]
    pub doc_properties: IndexMap<String, String>,
    /// Comment lines preceding the route.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl Route {
    /// Creates a route without request/response types or docs.
    pub fn new(method: impl Into<String>, path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            handler: handler.into(),
            ..Self::default()
        }
    }

    /// Sets the request type name.
    pub fn with_request(mut self, name: impl Into<String>) -> Self {
        self.request_type = Some(name.into());
        self
    }

    /// Sets the response type name.
    pub fn with_response(mut self, name: impl Into<String>) -> Self {
        self.response_type = Some(name.into());
        self
    }

    /// Adds a `@doc` property.
    pub fn with_doc_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.doc_properties.insert(key.into(), value.into());
        self
    }

    /// Adds a doc comment line.
    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    /// Returns a doc property, trimmed and unquoted.
    pub fn doc_property(&self, key: &str) -> Option<&str> {
        self.doc_properties.get(key).map(|v| unquote(v))
    }

    /// First doc line with comment markers removed, if any.
    pub fn first_doc_line(&self) -> Option<String> {
        self.docs
            .iter()
            .map(|line| strip_comment_markers(line))
            .find(|line| !line.is_empty())
    }
}

/// A named struct type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    /// Globally unique type name.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Comment lines preceding the type.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl StructType {
    /// Creates a struct without docs.
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            members,
            docs: Vec::new(),
        }
    }

    /// Adds a doc comment line.
    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    /// Doc lines joined with `,`, comment markers removed.
    pub fn joined_docs(&self) -> String {
        strip_comment_markers(&self.docs.join(","))
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Declared field name (for embedded fields, the embedded type's name).
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Raw, unparsed tag string.
    #[serde(default)]
    pub tag: String,
    /// Trailing comment.
    #[serde(default)]
    pub comment: String,
    /// Comment lines preceding the field.
    #[serde(default)]
    pub docs: Vec<String>,
    /// Whether this is an embedded (anonymous) field.
    #[serde(default)]
    pub is_inline: bool,
}

impl Member {
    /// Creates a named member.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: tag.into(),
            comment: String::new(),
            docs: Vec::new(),
            is_inline: false,
        }
    }

    /// Creates an embedded member for the named struct.
    pub fn embedded(struct_name: impl Into<String>) -> Self {
        let name = struct_name.into();
        Self {
            ty: TypeDescriptor::Reference(name.clone()),
            name,
            tag: String::new(),
            comment: String::new(),
            docs: Vec::new(),
            is_inline: true,
        }
    }

    /// Sets the trailing comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Adds a doc comment line.
    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    /// Parses the raw tag string.
    pub fn tags(&self) -> AppResult<Vec<Tag>> {
        parse_member_tags(&self.name, &self.tag)
    }

    /// Parses the tags once and wraps them with lookup helpers.
    pub fn tagged(&self) -> AppResult<TaggedMember<'_>> {
        Ok(TaggedMember {
            member: self,
            tags: self.tags()?,
        })
    }

    /// Comment text, falling back to doc lines joined with `,`.
    pub fn comment_text(&self) -> Option<String> {
        let text = if !self.comment.trim().is_empty() {
            strip_comment_markers(&self.comment)
        } else {
            strip_comment_markers(&self.docs.join(","))
        };
        (!text.is_empty()).then_some(text)
    }
}

/// A member together with its parsed tags.
#[derive(Debug, Clone)]
pub struct TaggedMember<'a> {
    /// The underlying member.
    pub member: &'a Member,
    /// Its parsed tags.
    pub tags: Vec<Tag>,
}

impl<'a> TaggedMember<'a> {
    /// The tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    /// Embedded members are never path members.
    pub fn is_path(&self) -> bool {
        !self.member.is_inline && self.tag(PATH_TAG_KEY).is_some()
    }

    /// Embedded members are never form members.
    pub fn is_form(&self) -> bool {
        !self.member.is_inline && self.tag(FORM_TAG_KEY).is_some()
    }

    /// Embedded members are never header members.
    pub fn is_header(&self) -> bool {
        !self.member.is_inline && self.tag(HEADER_TAG_KEY).is_some()
    }

    /// Embedded members always count as body members.
    pub fn is_body(&self) -> bool {
        self.member.is_inline || self.tag(BODY_TAG_KEY).is_some()
    }

    /// The first tag that names the member (`json`, `form`, `path`, `header`).
    pub fn naming_tag(&self) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| NAMING_TAG_KEYS.contains(&t.key.as_str()))
    }

    /// Serialized property name and the tag that governs it.
    pub fn property_name(&self) -> (&str, Option<&Tag>) {
        match self.naming_tag() {
            Some(tag) => (tag.resolved_name(&self.member.name), Some(tag)),
            None => (self.member.name.as_str(), None),
        }
    }
}

/// Trims whitespace and surrounding double quotes.
pub fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

fn strip_comment_markers(text: &str) -> String {
    text.replace("//", "").trim().to_string()
}
