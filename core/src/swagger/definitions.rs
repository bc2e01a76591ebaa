#![deny(missing_docs)]

//! # Schema Synthesis
//!
//! Turns named struct types into Swagger definitions.
//!
//! Logic:
//! - Path members never appear in a definition.
//! - Embedded structs are flattened one level into the parent, skipping
//!   their `header`/`form`/`path` members.
//! - A key is required unless the tag that named it carries an `optional`
//!   or `omitempty` option.
//! - `default=`, `options=a|b` and `example=` options decorate fragments;
//!   `validate` options become bounds.

use crate::error::{AppError, AppResult};
use crate::spec::tags::VALIDATE_TAG_KEY;
use crate::spec::{ApiSpec, StructType, Tag, TaggedMember};
use crate::swagger::models::{SchemaObject, DEFINITIONS_REF_PREFIX};
use crate::swagger::resolver::TypeResolver;
use indexmap::IndexMap;
use serde_json::Number;
use std::collections::{HashSet, VecDeque};

const ENUM_SEPARATOR: char = '|';

/// Synthesizes the definitions for `roots` and, transitively, every struct
/// they reference, in order of first appearance.
///
/// Each root is `(type name, context)`; the context names the route that
/// introduced it and is reported when the type is unknown.
pub fn collect_definitions(
    spec: &ApiSpec,
    roots: Vec<(String, String)>,
    resolver: &impl TypeResolver,
) -> AppResult<IndexMap<String, SchemaObject>> {
    let mut definitions = IndexMap::new();
    let mut queue: VecDeque<(String, String)> = roots.into();

    while let Some((name, context)) = queue.pop_front() {
        if definitions.contains_key(&name) {
            continue;
        }
        let struct_type = spec
            .find_type(&name)
            .ok_or_else(|| AppError::UnresolvedReference {
                name: name.clone(),
                context,
            })?;

        let schema = synthesize_definition(spec, struct_type, resolver)?;

        let mut refs = Vec::new();
        collect_schema_refs(&schema, &mut refs);
        for referenced in refs {
            if !definitions.contains_key(referenced) && referenced != name {
                queue.push_back((
                    referenced.to_string(),
                    format!("referenced by definition '{}'", name),
                ));
            }
        }

        tracing::debug!(definition = %name, "synthesized definition");
        definitions.insert(name, schema);
    }

    Ok(definitions)
}

/// Builds the definition for one struct.
pub fn synthesize_definition(
    spec: &ApiSpec,
    struct_type: &StructType,
    resolver: &impl TypeResolver,
) -> AppResult<SchemaObject> {
    check_embed_cycles(spec, struct_type)?;

    let mut schema = SchemaObject::object();
    schema.title = Some(struct_type.name.clone());
    let docs = struct_type.joined_docs();
    if !docs.is_empty() {
        schema.description = Some(docs);
    }

    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    for member in &struct_type.members {
        let tagged = member.tagged()?;
        if tagged.is_path() {
            continue;
        }

        if member.is_inline {
            if let Some(embedded_name) = member.ty.struct_name() {
                let embedded = find_embedded(spec, embedded_name, &struct_type.name)?;
                for inner in &embedded.members {
                    let inner_tagged = inner.tagged()?;
                    if inner_tagged.is_header() || inner_tagged.is_form() || inner_tagged.is_path()
                    {
                        continue;
                    }
                    add_property(&inner_tagged, resolver, &mut properties, &mut required);
                }
                continue;
            }
        }

        add_property(&tagged, resolver, &mut properties, &mut required);
    }

    schema.properties = Some(properties);
    schema.required = required;
    Ok(schema)
}

/// Schema fragment for a single member, decorated from its tags.
pub fn property_schema(member: &TaggedMember<'_>, resolver: &impl TypeResolver) -> SchemaObject {
    let mut schema = resolver.resolve(&member.member.ty);
    schema.description = member.member.comment_text();

    for tag in &member.tags {
        for option in &tag.options {
            let Some((key, value)) = option.split_once('=') else {
                continue;
            };
            match key.trim() {
                "default" => schema.default = Some(value.to_string()),
                "options" => {
                    schema.enum_values = value.split(ENUM_SEPARATOR).map(String::from).collect()
                }
                "example" => schema.example = Some(value.to_string()),
                _ => {}
            }
        }
    }

    if let Some(tag) = member.tag(VALIDATE_TAG_KEY) {
        apply_validation(&mut schema, tag);
    }

    schema
}

fn add_property(
    member: &TaggedMember<'_>,
    resolver: &impl TypeResolver,
    properties: &mut IndexMap<String, SchemaObject>,
    required: &mut Vec<String>,
) {
    let (key, governing) = member.property_name();
    let optional = governing.map(Tag::is_optional).unwrap_or(false);

    properties.insert(key.to_string(), property_schema(member, resolver));
    if !optional && !required.iter().any(|r| r == key) {
        required.push(key.to_string());
    }
}

fn find_embedded<'a>(spec: &'a ApiSpec, name: &str, parent: &str) -> AppResult<&'a StructType> {
    spec.find_type(name)
        .ok_or_else(|| AppError::UnresolvedReference {
            name: name.to_string(),
            context: format!("embedded in '{}'", parent),
        })
}

/// Rejects structs that embed themselves, directly or indirectly.
///
/// Unknown embedded types are ignored here; synthesis reports them.
pub fn check_embed_cycles(spec: &ApiSpec, root: &StructType) -> AppResult<()> {
    let mut stack = vec![root.name.as_str()];
    let mut finished = HashSet::new();
    visit_embeds(spec, root, &mut stack, &mut finished)
}

fn visit_embeds<'a>(
    spec: &'a ApiSpec,
    current: &'a StructType,
    stack: &mut Vec<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> AppResult<()> {
    for member in current.members.iter().filter(|m| m.is_inline) {
        let Some(name) = member.ty.struct_name() else {
            continue;
        };
        if stack.contains(&name) {
            let mut chain: Vec<String> = stack.iter().map(|s| s.to_string()).collect();
            chain.push(name.to_string());
            return Err(AppError::CyclicEmbed { chain });
        }
        if finished.contains(name) {
            continue;
        }
        let Some(embedded) = spec.find_type(name) else {
            continue;
        };
        stack.push(name);
        visit_embeds(spec, embedded, stack, finished)?;
        stack.pop();
        finished.insert(name);
    }
    Ok(())
}

/// Appends the definition names referenced anywhere inside `schema`.
fn collect_schema_refs<'a>(schema: &'a SchemaObject, out: &mut Vec<&'a str>) {
    if let Some(name) = schema
        .reference
        .as_deref()
        .and_then(|r| r.strip_prefix(DEFINITIONS_REF_PREFIX))
    {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    if let Some(items) = &schema.items {
        collect_schema_refs(items, out);
    }
    if let Some(properties) = &schema.properties {
        for property in properties.values() {
            collect_schema_refs(property, out);
        }
    }
}

/// Maps `validate:"min=1,max=10"` style constraints onto schema bounds.
fn apply_validation(schema: &mut SchemaObject, tag: &Tag) {
    let kind = schema.kind.clone().unwrap_or_default();
    let rules = std::iter::once(&tag.name).chain(tag.options.iter());

    for rule in rules {
        let Some((key, value)) = rule.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match kind.as_str() {
            "integer" | "number" => {
                let Some(number) = parse_number(value) else {
                    continue;
                };
                match key {
                    "min" | "gte" => schema.minimum = Some(number),
                    "gt" => {
                        schema.minimum = Some(number);
                        schema.exclusive_minimum = Some(true);
                    }
                    "max" | "lte" => schema.maximum = Some(number),
                    "lt" => {
                        schema.maximum = Some(number);
                        schema.exclusive_maximum = Some(true);
                    }
                    _ => {}
                }
            }
            "string" | "array" => {
                let Ok(bound) = value.parse::<u64>() else {
                    continue;
                };
                let (min, max) = if kind == "string" {
                    (&mut schema.min_length, &mut schema.max_length)
                } else {
                    (&mut schema.min_items, &mut schema.max_items)
                };
                match key {
                    "min" | "gte" => *min = Some(bound),
                    "gt" => match bound.checked_add(1) {
                        Some(next) => *min = Some(next),
                        None => continue,
                    },
                    "max" | "lte" => *max = Some(bound),
                    "lt" => *max = Some(bound.saturating_sub(1)),
                    "len" => {
                        *min = Some(bound);
                        *max = Some(bound);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

fn parse_number(value: &str) -> Option<Number> {
    if let Ok(int) = value.parse::<i64>() {
        return Some(Number::from(int));
    }
    value.parse::<f64>().ok().and_then(Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Member, TypeDescriptor};
    use crate::swagger::resolver::GoTypeResolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(name: &str, ty: &str, tag: &str) -> Member {
        Member::new(name, ty.parse::<TypeDescriptor>().unwrap(), tag)
    }

    fn spec_with(types: Vec<StructType>) -> ApiSpec {
        ApiSpec {
            types,
            ..ApiSpec::default()
        }
    }

    fn definition(spec: &ApiSpec, name: &str) -> serde_json::Value {
        let st = spec.find_type(name).unwrap();
        serde_json::to_value(synthesize_definition(spec, st, &GoTypeResolver).unwrap()).unwrap()
    }

    #[test]
    fn test_user_req_required_and_optional() {
        let spec = spec_with(vec![StructType::new(
            "UserReq",
            vec![
                field("Name", "string", r#"json:"name""#),
                field("Age", "int", r#"json:"age,optional""#),
            ],
        )]);

        assert_eq!(
            definition(&spec, "UserReq"),
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer", "format": "int32" }
                },
                "title": "UserReq",
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_array_of_reference() {
        let spec = spec_with(vec![
            StructType::new("ListResp", vec![field("Items", "[]Item", r#"json:"items""#)]),
            StructType::new("Item", vec![]),
        ]);
        let def = definition(&spec, "ListResp");
        assert_eq!(
            def["properties"]["items"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Item" } })
        );
    }

    #[test]
    fn test_inline_struct_is_flattened() {
        let spec = spec_with(vec![
            StructType::new("Base", vec![field("ID", "int", r#"json:"id""#)]),
            StructType::new(
                "Outer",
                vec![
                    Member::embedded("Base"),
                    field("Name", "string", r#"json:"name""#),
                ],
            ),
        ]);
        let def = definition(&spec, "Outer");
        let keys: Vec<&str> = def["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(def["required"], json!(["id", "name"]));
    }

    #[test]
    fn test_flattening_skips_transport_members_and_stops_at_one_level() {
        let spec = spec_with(vec![
            StructType::new("Deep", vec![field("Z", "int", r#"json:"z""#)]),
            StructType::new(
                "Mid",
                vec![
                    field("Token", "string", r#"header:"Authorization""#),
                    field("Page", "int", r#"form:"page""#),
                    field("Id", "int", r#"path:"id""#),
                    field("Note", "string", r#"json:"note,omitempty""#),
                    Member::embedded("Deep"),
                ],
            ),
            StructType::new("Top", vec![Member::embedded("Mid")]),
        ]);
        let def = definition(&spec, "Top");
        let props = def["properties"].as_object().unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props["note"]["type"], "string");
        assert_eq!(props["Deep"], json!({ "$ref": "#/definitions/Deep" }));
        assert_eq!(def["required"], json!(["Deep"]));
    }

    #[test]
    fn test_path_members_are_excluded() {
        let spec = spec_with(vec![StructType::new(
            "GetReq",
            vec![
                field("Id", "int64", r#"path:"id""#),
                field("Verbose", "bool", r#"json:"verbose""#),
            ],
        )]);
        let def = definition(&spec, "GetReq");
        assert!(def["properties"].get("id").is_none());
        assert_eq!(def["required"], json!(["verbose"]));
    }

    #[test]
    fn test_empty_struct_still_yields_definition() {
        let spec = spec_with(vec![StructType::new("Empty", vec![])]);
        assert_eq!(
            definition(&spec, "Empty"),
            json!({ "type": "object", "properties": {}, "title": "Empty" })
        );
    }

    #[test]
    fn test_decorations_from_tag_options() {
        let spec = spec_with(vec![StructType::new(
            "Job",
            vec![
                field(
                    "State",
                    "string",
                    r#"json:"state,default=open,options=open|closed,example=open""#,
                )
                .with_comment("// job state"),
                field("Retries", "int64", r#"json:"retries" validate:"min=1,lt=10""#),
                field("Code", "string", r#"json:"code" validate:"len=4""#),
                field("Tags", "[]string", r#"json:"tags" validate:"max=3""#),
            ],
        )]);
        let def = definition(&spec, "Job");
        assert_eq!(
            def["properties"]["state"],
            json!({
                "type": "string",
                "example": "open",
                "enum": ["open", "closed"],
                "default": "open",
                "description": "job state"
            })
        );
        assert_eq!(
            def["properties"]["retries"],
            json!({
                "type": "integer",
                "format": "int64",
                "minimum": 1,
                "maximum": 10,
                "exclusiveMaximum": true
            })
        );
        assert_eq!(def["properties"]["code"]["minLength"], 4);
        assert_eq!(def["properties"]["code"]["maxLength"], 4);
        assert_eq!(def["properties"]["tags"]["maxItems"], 3);
    }

    #[test]
    fn test_out_of_range_exclusive_bound_is_ignored() {
        let max = u64::MAX.to_string();
        let spec = spec_with(vec![StructType::new(
            "Signup",
            vec![
                field("Nick", "string", &format!(r#"json:"nick" validate:"gt={}""#, max)),
                field("Codes", "[]int", &format!(r#"json:"codes" validate:"gt={},max=4""#, max)),
            ],
        )]);
        let def = definition(&spec, "Signup");
        assert!(def["properties"]["nick"].get("minLength").is_none());
        assert!(def["properties"]["codes"].get("minItems").is_none());
        assert_eq!(def["properties"]["codes"]["maxItems"], 4);
    }

    #[test]
    fn test_self_embedding_is_rejected() {
        let spec = spec_with(vec![
            StructType::new("A", vec![Member::embedded("B")]),
            StructType::new("B", vec![Member::embedded("A")]),
        ]);
        let err = synthesize_definition(&spec, spec.find_type("A").unwrap(), &GoTypeResolver)
            .unwrap_err();
        match err {
            AppError::CyclicEmbed { chain } => assert_eq!(chain, vec!["A", "B", "A"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_collect_pulls_in_referenced_types() {
        let spec = spec_with(vec![
            StructType::new("ListResp", vec![field("Items", "[]*Item", r#"json:"items""#)]),
            StructType::new("Item", vec![field("Owner", "User", r#"json:"owner""#)]),
            StructType::new("User", vec![]),
            StructType::new("Unused", vec![]),
        ]);
        let defs = collect_definitions(
            &spec,
            vec![("ListResp".into(), "route".into())],
            &GoTypeResolver,
        )
        .unwrap();
        let names: Vec<&str> = defs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["ListResp", "Item", "User"]);
    }

    #[test]
    fn test_collect_reports_unknown_types() {
        let spec = spec_with(vec![StructType::new(
            "Resp",
            vec![field("Ghost", "Ghost", r#"json:"ghost""#)],
        )]);
        let err = collect_definitions(&spec, vec![("Resp".into(), "route".into())], &GoTypeResolver)
            .unwrap_err();
        match err {
            AppError::UnresolvedReference { name, context } => {
                assert_eq!(name, "Ghost");
                assert_eq!(context, "referenced by definition 'Resp'");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
