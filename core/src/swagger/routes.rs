#![deny(missing_docs)]

//! # Path & Operation Builder
//!
//! Walks every route of every group and produces the Swagger path table.
//!
//! Parameters are emitted in a fixed order: path placeholders, then every
//! other member as a query parameter (GET), or header members followed by the
//! single body parameter (other methods).

use crate::error::{AppError, AppResult};
use crate::spec::{
    ApiSpec, Group, Route, StructType, TaggedMember, GROUP_ANNOTATION, JWT_ANNOTATION,
    PREFIX_ANNOTATION,
};
use crate::swagger::models::{
    Operation, Parameter, ParameterLocation, PathItem, ResponseObject, SchemaObject,
    SecurityRequirement, BEARER_SCHEME,
};
use crate::swagger::params::{classify, is_read_only, render_parameter};
use crate::swagger::resolver::TypeResolver;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Description attached to every `200` response.
pub const SUCCESS_DESCRIPTION: &str = "A successful response.";

/// Paths plus the struct names routes refer to.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Path table keyed by rewritten path.
    pub paths: IndexMap<String, PathItem>,
    /// `(type name, context)` for every named request/response type, in
    /// order of first appearance.
    pub referenced_types: Vec<(String, String)>,
}

/// Builds the path table for all routes of the service.
pub fn build_paths(spec: &ApiSpec, resolver: &impl TypeResolver) -> AppResult<RouteTable> {
    let mut table = RouteTable::default();

    for group in &spec.service.groups {
        for route in &group.routes {
            let path = full_path(group.annotation(PREFIX_ANNOTATION), &route.path);
            let (path, placeholders) = rewrite_placeholders(&path);

            let mut item = table.paths.get(&path).cloned().unwrap_or_default();
            let Some(slot) = item.slot_mut(&route.method) else {
                tracing::warn!(
                    method = %route.method,
                    path = %route.path,
                    "unsupported HTTP method, route skipped"
                );
                continue;
            };

            let operation = build_operation(spec, group, route, &placeholders, resolver)?;
            if slot.is_some() {
                tracing::debug!(method = %route.method, %path, "route overrides an earlier one");
            }
            *slot = Some(operation);
            tracing::debug!(method = %route.method, %path, handler = %route.handler, "built operation");

            let context = format!("route {} {}", route.method.to_ascii_uppercase(), route.path);
            for name in [named(&route.request_type), named(&route.response_type)]
                .into_iter()
                .flatten()
            {
                if !table.referenced_types.iter().any(|(n, _)| n == name) {
                    table.referenced_types.push((name.to_string(), context.clone()));
                }
            }

            table.paths.insert(path, item);
        }
    }

    Ok(table)
}

/// Joins the group prefix and route path with exactly one leading `/`.
pub fn full_path(prefix: Option<&str>, path: &str) -> String {
    let joined = format!("{}{}", prefix.unwrap_or_default(), path);
    format!("/{}", joined.trim_start_matches('/'))
}

/// Rewrites `:token` segments to `{token}` and returns the tokens in order.
pub fn rewrite_placeholders(path: &str) -> (String, Vec<String>) {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let placeholder_re =
        PLACEHOLDER_RE.get_or_init(|| Regex::new(r"/:([^/]+)").expect("Invalid regex"));

    let tokens = placeholder_re
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    let rewritten = placeholder_re.replace_all(path, "/{$1}").into_owned();
    (rewritten, tokens)
}

/// Builds the operation for one route.
pub fn build_operation(
    spec: &ApiSpec,
    group: &Group,
    route: &Route,
    placeholders: &[String],
    resolver: &impl TypeResolver,
) -> AppResult<Operation> {
    let mut parameters: Vec<Parameter> = placeholders
        .iter()
        .map(|token| {
            let mut param = Parameter::string(token.clone(), ParameterLocation::Path);
            param.description = route
                .doc_property(token)
                .filter(|d| !d.is_empty())
                .map(String::from);
            param
        })
        .collect();

    if let Some(request_name) = named(&route.request_type) {
        let request = spec
            .find_type(request_name)
            .ok_or_else(|| AppError::UnresolvedReference {
                name: request_name.to_string(),
                context: format!("request of route {} {}", route.method, route.path),
            })?;
        parameters.extend(request_parameters(spec, request, &route.method, resolver)?);
    }

    let schema = named(&route.response_type)
        .map(SchemaObject::reference)
        .unwrap_or_default();
    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        ResponseObject {
            description: SUCCESS_DESCRIPTION.to_string(),
            schema,
        },
    );

    let security = group.annotation(JWT_ANNOTATION).map(|_| {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(BEARER_SCHEME.to_string(), Vec::new());
        vec![requirement]
    });

    Ok(Operation {
        summary: route_summary(route),
        description: route_description(route),
        operation_id: route.handler.clone(),
        responses,
        parameters,
        tags: route_tag(&spec.service.name, group, route)
            .into_iter()
            .collect(),
        security,
    })
}

/// Query parameters (read-only routes), or header parameters followed by the
/// single body parameter.
fn request_parameters(
    spec: &ApiSpec,
    request: &StructType,
    method: &str,
    resolver: &impl TypeResolver,
) -> AppResult<Vec<Parameter>> {
    let mut headers = Vec::new();
    let mut rest = Vec::new();
    let mut body_members = 0;

    for member in &request.members {
        let tagged = member.tagged()?;
        if tagged.is_body() {
            body_members += 1;
        }

        if member.is_inline {
            if is_read_only(method) {
                if let Some(name) = member.ty.struct_name() {
                    rest.extend(flattened_query(spec, name, &request.name, method, resolver)?);
                }
            }
            continue;
        }

        let classification = classify(&tagged, method);
        match classification.location {
            ParameterLocation::Header => {
                headers.push(render_parameter(&tagged, &classification, resolver))
            }
            ParameterLocation::Query => {
                rest.push(render_parameter(&tagged, &classification, resolver))
            }
            ParameterLocation::Path | ParameterLocation::Body => {}
        }
    }

    if !is_read_only(method) && body_members > 0 && !request.name.is_empty() {
        let mut body = Parameter::body(&request.name);
        let docs = request.joined_docs();
        body.description = (!docs.is_empty()).then_some(docs);
        rest.push(body);
    }

    headers.extend(rest);
    Ok(headers)
}

/// Query parameters contributed by an embedded struct, one level deep.
/// Embedded `path` and `header` members are left out.
fn flattened_query(
    spec: &ApiSpec,
    embedded_name: &str,
    parent: &str,
    method: &str,
    resolver: &impl TypeResolver,
) -> AppResult<Vec<Parameter>> {
    let embedded = spec
        .find_type(embedded_name)
        .ok_or_else(|| AppError::UnresolvedReference {
            name: embedded_name.to_string(),
            context: format!("embedded in '{}'", parent),
        })?;

    let mut params = Vec::new();
    for inner in &embedded.members {
        let tagged: TaggedMember<'_> = inner.tagged()?;
        if tagged.is_path() || tagged.is_header() {
            continue;
        }
        let classification = classify(&tagged, method);
        if classification.location == ParameterLocation::Query {
            params.push(render_parameter(&tagged, &classification, resolver));
        }
    }
    Ok(params)
}

/// Route tag: `tag`, then `tags`, then the group's `group`, then the service name.
fn route_tag(service_name: &str, group: &Group, route: &Route) -> Option<String> {
    non_empty_doc(route, "tag")
        .or_else(|| non_empty_doc(route, "tags"))
        .or_else(|| group.annotation(GROUP_ANNOTATION))
        .or_else(|| Some(service_name.trim()).filter(|s| !s.is_empty()))
        .map(String::from)
}

fn route_summary(route: &Route) -> Option<String> {
    non_empty_doc(route, "summary")
        .or_else(|| non_empty_doc(route, "description"))
        .map(String::from)
        .or_else(|| route.first_doc_line())
}

fn route_description(route: &Route) -> Option<String> {
    non_empty_doc(route, "description")
        .or_else(|| non_empty_doc(route, "desc"))
        .map(String::from)
        .or_else(|| route.first_doc_line())
}

fn non_empty_doc<'a>(route: &'a Route, key: &str) -> Option<&'a str> {
    route.doc_property(key).filter(|v| !v.is_empty())
}

/// A type name, `None` when absent or anonymous.
fn named(name: &Option<String>) -> Option<&str> {
    name.as_deref().map(str::trim).filter(|n| !n.is_empty())
}
