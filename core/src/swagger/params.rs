#![deny(missing_docs)]

//! # Parameter Classification
//!
//! Decides where each request member travels and renders the non-body
//! members as Swagger parameters.
//!
//! Precedence: `path` tag, then query (read-only routes), then `header` tag,
//! then body. Embedded members are always body members and are never
//! classified on their own; their members are classified when flattening.

use crate::spec::tags::{FORM_TAG_KEY, HEADER_TAG_KEY, PATH_TAG_KEY};
use crate::spec::{Tag, TaggedMember};
use crate::swagger::models::{Parameter, ParameterLocation, SchemaObject};
use crate::swagger::resolver::{TypeResolver, UNKNOWN_FORMAT};

/// Outcome of classifying one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Transport location.
    pub location: ParameterLocation,
    /// Name on the wire.
    pub name: String,
    /// Whether the member is mandatory.
    pub required: bool,
}

/// True for methods whose request members travel in the query string.
pub fn is_read_only(method: &str) -> bool {
    method.eq_ignore_ascii_case("GET")
}

/// Classifies a member of a request struct for a route with the given method.
pub fn classify(member: &TaggedMember<'_>, method: &str) -> Classification {
    let own_name = member.member.name.as_str();

    if member.member.is_inline {
        return Classification {
            location: ParameterLocation::Body,
            name: own_name.to_string(),
            required: true,
        };
    }

    if let Some(tag) = member.tag(PATH_TAG_KEY) {
        return Classification {
            location: ParameterLocation::Path,
            name: tag.resolved_name(own_name).to_string(),
            required: true,
        };
    }

    if is_read_only(method) {
        return match member.tag(FORM_TAG_KEY) {
            Some(tag) => Classification {
                location: ParameterLocation::Query,
                name: tag.resolved_name(own_name).to_string(),
                required: !tag.is_optional(),
            },
            None => Classification {
                location: ParameterLocation::Query,
                name: own_name.to_string(),
                required: true,
            },
        };
    }

    if let Some(tag) = member.tag(HEADER_TAG_KEY) {
        return Classification {
            location: ParameterLocation::Header,
            name: tag.resolved_name(own_name).to_string(),
            required: !tag.is_optional(),
        };
    }

    let (name, governing) = member.property_name();
    Classification {
        location: ParameterLocation::Body,
        name: name.to_string(),
        required: !governing.map(Tag::is_optional).unwrap_or(false),
    }
}

/// Renders a classified query or header member as a parameter.
///
/// Path members are forced to `string`; everything else takes its primitive
/// type from the resolver. Parameters cannot reference definitions, so
/// struct-typed members degrade to the `UNKNOWN` sentinel.
pub fn render_parameter(
    member: &TaggedMember<'_>,
    classification: &Classification,
    resolver: &impl TypeResolver,
) -> Parameter {
    let mut param = Parameter::string(classification.name.clone(), classification.location);
    param.required = classification.required;
    param.description = member.member.comment_text();

    if classification.location == ParameterLocation::Path {
        return param;
    }

    let schema = resolver.resolve(&member.member.ty);
    apply_parameter_type(&mut param, schema, &member.member.ty.to_string());

    let option_tag = match classification.location {
        ParameterLocation::Header => member.tag(HEADER_TAG_KEY),
        _ => member.tag(FORM_TAG_KEY),
    };
    if let Some(tag) = option_tag {
        param.default = tag.option_value("default").map(String::from);
        param.example = tag.option_value("example").map(String::from);
        if let Some(options) = tag.option_value("options") {
            param.enum_values = options.split('|').map(String::from).collect();
        }
    }

    param
}

fn apply_parameter_type(param: &mut Parameter, schema: SchemaObject, raw_label: &str) {
    match schema.kind {
        Some(kind) if kind == "array" => {
            param.kind = Some(kind);
            param.items = schema.items;
        }
        Some(kind) => {
            param.kind = Some(kind);
            param.format = schema.format;
        }
        None => {
            let label = raw_label.trim_start_matches('*');
            tracing::warn!(member_type = label, "struct-typed parameter has no primitive form");
            param.kind = Some(label.to_string());
            param.format = Some(UNKNOWN_FORMAT.to_string());
        }
    }
}
