#![deny(missing_docs)]

//! # Swagger Gen Core
//!
//! Generates Swagger 2.0 documents from parsed API descriptions.

/// Shared error types.
pub mod error;

/// API description model and tag/type parsing.
pub mod spec;

/// Swagger document generation.
pub mod swagger;

pub use error::{AppError, AppResult};
pub use spec::{parse_tags, ApiSpec, Group, Member, Route, Service, StructType, Tag, TypeDescriptor};
pub use swagger::{generate_swagger_document, render_swagger_json, SwaggerDocument};
