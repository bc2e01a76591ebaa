#![deny(missing_docs)]

//! # Type Descriptors
//!
//! Explicit shape of a member's declared type. Descriptors are built once when
//! an [`ApiSpec`](crate::spec::ApiSpec) is loaded, either programmatically or from the Go type
//! expression syntax (`[]*Item`, `map[string]int64`, `interface{}`), so later
//! stages only ever `match` on variants.

use crate::error::{AppError, AppResult};
use std::fmt;
use std::str::FromStr;

/// The declared type of a struct member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDescriptor {
    /// A builtin scalar such as `string`, `int64` or `bool`.
    /// Package-qualified names (`time.Time`) also land here.
    Scalar(String),
    /// `*T`; transparent for schema purposes.
    Pointer(Box<TypeDescriptor>),
    /// `[]T` or `[N]T`.
    Array(Box<TypeDescriptor>),
    /// `map[K]V`.
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// A named struct declared in the same spec.
    Reference(String),
    /// `interface{}` / `any`.
    DynamicAny,
}

impl TypeDescriptor {
    /// Shorthand for [`TypeDescriptor::Scalar`].
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    /// Shorthand for [`TypeDescriptor::Reference`].
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Shorthand for [`TypeDescriptor::Array`].
    pub fn array(inner: TypeDescriptor) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Shorthand for [`TypeDescriptor::Pointer`].
    pub fn pointer(inner: TypeDescriptor) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Shorthand for [`TypeDescriptor::Map`].
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Strips every leading pointer layer.
    pub fn unwrap_pointer(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    /// Name of the struct this descriptor denotes directly (through pointers only).
    pub fn struct_name(&self) -> Option<&str> {
        match self.unwrap_pointer() {
            TypeDescriptor::Reference(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(name) | TypeDescriptor::Reference(name) => write!(f, "{}", name),
            TypeDescriptor::Pointer(inner) => write!(f, "*{}", inner),
            TypeDescriptor::Array(inner) => write!(f, "[]{}", inner),
            TypeDescriptor::Map(key, value) => write!(f, "map[{}]{}", key, value),
            TypeDescriptor::DynamicAny => write!(f, "interface{{}}"),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        parse_type(s.trim()).map_err(|reason| AppError::MalformedType {
            input: s.to_string(),
            reason,
        })
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        value.to_string()
    }
}

fn parse_type(ty: &str) -> Result<TypeDescriptor, String> {
    if ty.is_empty() {
        return Err("empty type expression".to_string());
    }

    if let Some(rest) = ty.strip_prefix('*') {
        return Ok(TypeDescriptor::pointer(parse_type(rest.trim_start())?));
    }

    if let Some(rest) = ty.strip_prefix("[]") {
        return Ok(TypeDescriptor::array(parse_type(rest.trim_start())?));
    }

    if let Some(rest) = ty.strip_prefix('[') {
        // Fixed-size array: `[4]byte`
        let close = rest
            .find(']')
            .ok_or_else(|| "unterminated array length".to_string())?;
        let len = rest[..close].trim();
        if len.is_empty() || !len.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid array length '{}'", len));
        }
        return Ok(TypeDescriptor::array(parse_type(
            rest[close + 1..].trim_start(),
        )?));
    }

    if let Some(rest) = ty.strip_prefix("map[") {
        let close = matching_bracket(rest).ok_or_else(|| "unterminated map key".to_string())?;
        let key = parse_type(rest[..close].trim())?;
        let value = parse_type(rest[close + 1..].trim_start())?;
        return Ok(TypeDescriptor::map(key, value));
    }

    if ty == "any" || is_empty_interface(ty) {
        return Ok(TypeDescriptor::DynamicAny);
    }

    if !ty
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    {
        return Err(format!("unexpected characters in '{}'", ty));
    }

    let first = ty.chars().next().unwrap_or('_');
    if first.is_ascii_digit() || ty.starts_with('.') || ty.ends_with('.') {
        return Err(format!("invalid identifier '{}'", ty));
    }

    if !ty.contains('.') && first.is_uppercase() {
        Ok(TypeDescriptor::Reference(ty.to_string()))
    } else {
        Ok(TypeDescriptor::Scalar(ty.to_string()))
    }
}

/// Index of the `]` closing a `[` that was already consumed.
fn matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(idx),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn is_empty_interface(ty: &str) -> bool {
    ty.strip_prefix("interface")
        .map(|rest| rest.split_whitespace().collect::<String>() == "{}")
        .unwrap_or(false)
}
