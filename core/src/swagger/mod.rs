#![deny(missing_docs)]

//! # Swagger Generation Module
//!
//! - **models**: Serializable Swagger 2.0 structures.
//! - **resolver**: Type descriptor to schema fragment mapping.
//! - **params**: Member classification into path/header/query/body.
//! - **definitions**: Struct to definition synthesis.
//! - **routes**: Path table and operation building.
//! - **document**: Top-level assembly.

pub mod definitions;
pub mod document;
pub mod models;
pub mod params;
pub mod resolver;
pub mod routes;

pub use document::{generate_swagger_document, render_swagger_json};
pub use models::{Operation, Parameter, ParameterLocation, PathItem, SchemaObject, SwaggerDocument};
pub use resolver::{GoTypeResolver, TypeResolver};
