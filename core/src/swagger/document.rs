#![deny(missing_docs)]

//! # Document Assembly
//!
//! Entry points that turn an [`ApiSpec`] into a complete Swagger 2.0 document.
//! Generation is all-or-nothing: any error aborts without a partial document.

use crate::error::{AppError, AppResult};
use crate::spec::ApiSpec;
use crate::swagger::definitions::collect_definitions;
use crate::swagger::models::{
    ContactObject, InfoObject, SecurityScheme, SwaggerDocument, BEARER_SCHEME, SWAGGER_VERSION,
};
use crate::swagger::resolver::GoTypeResolver;
use crate::swagger::routes::build_paths;
use indexmap::IndexMap;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Generates the Swagger document for an API description.
pub fn generate_swagger_document(spec: &ApiSpec) -> AppResult<SwaggerDocument> {
    let resolver = GoTypeResolver;

    let routes = build_paths(spec, &resolver)?;
    let definitions = collect_definitions(spec, routes.referenced_types, &resolver)?;

    tracing::debug!(
        paths = routes.paths.len(),
        definitions = definitions.len(),
        "assembled swagger document"
    );

    Ok(SwaggerDocument {
        swagger: SWAGGER_VERSION.to_string(),
        info: build_info(spec),
        host: spec.info_value("host").map(String::from),
        base_path: spec.info_value("basePath").map(String::from),
        schemes: vec!["http".to_string(), "https".to_string()],
        consumes: vec![JSON_MEDIA_TYPE.to_string()],
        produces: vec![JSON_MEDIA_TYPE.to_string()],
        paths: routes.paths,
        definitions,
        security_definitions: security_definitions(),
    })
}

/// Generates the document and renders it as pretty-printed JSON.
pub fn render_swagger_json(spec: &ApiSpec) -> AppResult<String> {
    generate_swagger_document(spec)?.to_json_pretty()
}

impl SwaggerDocument {
    /// Pretty-printed JSON with keys in emission order.
    pub fn to_json_pretty(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::Serialization(e.to_string()))
    }

    /// YAML rendering of the same document.
    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

fn build_info(spec: &ApiSpec) -> InfoObject {
    let contact = ContactObject {
        name: spec.info_value("contact").map(String::from),
        email: spec.info_value("email").map(String::from),
    };

    InfoObject {
        title: spec.info_value("title").unwrap_or_default().to_string(),
        description: spec.info_value("desc").map(String::from),
        version: spec.info_value("version").unwrap_or_default().to_string(),
        contact: (contact.name.is_some() || contact.email.is_some()).then_some(contact),
    }
}

fn security_definitions() -> IndexMap<String, SecurityScheme> {
    let mut schemes = IndexMap::new();
    schemes.insert(
        BEARER_SCHEME.to_string(),
        SecurityScheme {
            kind: "apiKey".to_string(),
            description: Some("Enter JWT Bearer token".to_string()),
            name: Some("Authorization".to_string()),
            location: Some("header".to_string()),
        },
    );
    schemes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_spec_produces_skeleton() {
        let doc = generate_swagger_document(&ApiSpec::default()).unwrap();
        assert_eq!(
            doc.to_value().unwrap(),
            json!({
                "swagger": "2.0",
                "info": { "title": "", "version": "" },
                "schemes": ["http", "https"],
                "consumes": ["application/json"],
                "produces": ["application/json"],
                "paths": {},
                "definitions": {},
                "securityDefinitions": {
                    "Bearer": {
                        "type": "apiKey",
                        "description": "Enter JWT Bearer token",
                        "name": "Authorization",
                        "in": "header"
                    }
                }
            })
        );
    }

    #[test]
    fn test_info_properties_are_unquoted() {
        let mut spec = ApiSpec::default();
        for (k, v) in [
            ("title", "\"Demo\""),
            ("version", "\"1.0\""),
            ("desc", "\"demo api\""),
            ("email", "\"ops@example.com\""),
            ("host", "\"api.example.com\""),
            ("basePath", "\"\""),
        ] {
            spec.info.insert(k.to_string(), v.to_string());
        }
        let value = generate_swagger_document(&spec).unwrap().to_value().unwrap();
        assert_eq!(
            value["info"],
            json!({
                "title": "Demo",
                "description": "demo api",
                "version": "1.0",
                "contact": { "email": "ops@example.com" }
            })
        );
        assert_eq!(value["host"], "api.example.com");
        assert!(value.get("basePath").is_none());
    }

    #[test]
    fn test_yaml_rendering() {
        let yaml = generate_swagger_document(&ApiSpec::default())
            .unwrap()
            .to_yaml()
            .unwrap();
        assert!(yaml.starts_with("swagger:"));
        assert!(yaml.lines().next().unwrap().contains("2.0"));
        assert!(yaml.contains("securityDefinitions:"));
    }
}
