#![deny(missing_docs)]

//! # Field Tags
//!
//! Parses Go-style member annotations such as
//! `` json:"age,optional" validate:"min=1" `` into structured [`Tag`]s.

use crate::error::{AppError, AppResult};

/// Tag key for body (JSON) members.
pub const BODY_TAG_KEY: &str = "json";
/// Tag key for query/form members.
pub const FORM_TAG_KEY: &str = "form";
/// Tag key for path members.
pub const PATH_TAG_KEY: &str = "path";
/// Tag key for header members.
pub const HEADER_TAG_KEY: &str = "header";
/// Tag key for validation constraints.
pub const VALIDATE_TAG_KEY: &str = "validate";

/// Keys that carry a serialized member name, in lookup order.
pub const NAMING_TAG_KEYS: [&str; 4] = [BODY_TAG_KEY, FORM_TAG_KEY, PATH_TAG_KEY, HEADER_TAG_KEY];

const OPTIONAL_OPTION: &str = "optional";
const OMITEMPTY_OPTION: &str = "omitempty";

/// A single `key:"name,opt..."` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The tag key, e.g. `json`.
    pub key: String,
    /// The serialized name; `-` means "use the member's own name".
    pub name: String,
    /// Remaining comma-separated options, in order.
    pub options: Vec<String>,
}

impl Tag {
    /// True when an option marks the member as not required.
    pub fn is_optional(&self) -> bool {
        self.options
            .iter()
            .any(|o| o.starts_with(OPTIONAL_OPTION) || o.starts_with(OMITEMPTY_OPTION))
    }

    /// Value of the first `key=value` option with the given key.
    pub fn option_value(&self, key: &str) -> Option<&str> {
        self.options.iter().find_map(|o| {
            o.split_once('=')
                .filter(|(k, _)| k.trim() == key)
                .map(|(_, v)| v)
        })
    }

    /// Resolves the serialized name against the member's own name.
    pub fn resolved_name<'a>(&'a self, member_name: &'a str) -> &'a str {
        if self.name == "-" {
            member_name
        } else {
            &self.name
        }
    }
}

/// Parses a raw tag string.
///
/// An empty string yields no tags. Unbalanced quotes, missing `:` separators
/// and duplicated keys are reported as [`AppError::MalformedTag`].
pub fn parse_tags(raw: &str) -> AppResult<Vec<Tag>> {
    scan_tags(raw).map_err(|reason| AppError::MalformedTag {
        member: raw.to_string(),
        reason,
    })
}

/// Same as [`parse_tags`] but attributes errors to `member`.
pub(crate) fn parse_member_tags(member: &str, raw: &str) -> AppResult<Vec<Tag>> {
    scan_tags(raw).map_err(|reason| AppError::MalformedTag {
        member: member.to_string(),
        reason,
    })
}

fn scan_tags(raw: &str) -> Result<Vec<Tag>, String> {
    let body = raw.trim();
    let body = body
        .strip_prefix('`')
        .and_then(|b| b.strip_suffix('`'))
        .unwrap_or(body);

    let mut tags: Vec<Tag> = Vec::new();
    let mut chars = body.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        // key
        let mut key_end = None;
        for (idx, ch) in chars.by_ref() {
            match ch {
                ':' => {
                    key_end = Some(idx);
                    break;
                }
                '"' => return Err(format!("unexpected quote in key at offset {}", idx)),
                c if c.is_whitespace() => {
                    return Err(format!("missing ':' after key '{}'", &body[start..idx]))
                }
                _ => {}
            }
        }
        let key_end = key_end.ok_or_else(|| format!("missing ':' after key '{}'", &body[start..]))?;
        let key = &body[start..key_end];
        if key.is_empty() {
            return Err(format!("empty key at offset {}", start));
        }

        // quoted value
        match chars.next() {
            Some((_, '"')) => {}
            _ => return Err(format!("value of '{}' must be double-quoted", key)),
        }
        let mut value = String::new();
        let mut closed = false;
        while let Some((_, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                '"' => {
                    closed = true;
                    break;
                }
                c => value.push(c),
            }
        }
        if !closed {
            return Err(format!("unbalanced quote in value of '{}'", key));
        }
        if let Some(&(idx, ch)) = chars.peek() {
            if !ch.is_whitespace() {
                return Err(format!("expected whitespace after '{}' at offset {}", key, idx));
            }
        }

        if tags.iter().any(|t| t.key == key) {
            return Err(format!("duplicate key '{}'", key));
        }

        let mut parts = value.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default().to_string();
        let options = parts.filter(|p| !p.is_empty()).map(String::from).collect();

        tags.push(Tag {
            key: key.to_string(),
            name,
            options,
        });
    }

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_is_legal() {
        assert!(parse_tags("").unwrap().is_empty());
        assert!(parse_tags("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_multiple_groups() {
        let tags = parse_tags(r#"json:"age,optional,default=5" validate:"min=1,max=99""#).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].key, "json");
        assert_eq!(tags[0].name, "age");
        assert_eq!(tags[0].options, vec!["optional", "default=5"]);
        assert!(tags[0].is_optional());
        assert_eq!(tags[0].option_value("default"), Some("5"));
        assert_eq!(tags[1].key, "validate");
        assert_eq!(tags[1].name, "min=1");
        assert_eq!(tags[1].options, vec!["max=99"]);
    }

    #[test]
    fn test_backticks_are_stripped() {
        let tags = parse_tags(r#"`path:"id"`"#).unwrap();
        assert_eq!(tags[0].key, "path");
        assert_eq!(tags[0].name, "id");
        assert!(tags[0].options.is_empty());
    }

    #[test]
    fn test_dash_name_resolves_to_member() {
        let tags = parse_tags(r#"json:"-""#).unwrap();
        assert_eq!(tags[0].resolved_name("Secret"), "Secret");
    }

    #[test]
    fn test_enum_option_keeps_pipes() {
        let tags = parse_tags(r#"json:"kind,options=a|b|c""#).unwrap();
        assert_eq!(tags[0].option_value("options"), Some("a|b|c"));
    }

    #[test]
    fn test_malformed_tags() {
        let cases = [
            r#"json:"name"#,
            r#"json"name""#,
            r#"json:name"#,
            r#":"name""#,
            r#"json:"a" json:"b""#,
            r#"json:"a"form:"b""#,
        ];
        for raw in cases {
            let err = parse_tags(raw).unwrap_err();
            assert!(
                matches!(err, AppError::MalformedTag { .. }),
                "expected MalformedTag for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_member_attribution() {
        let err = parse_member_tags("Name", r#"json:"name"#).unwrap_err();
        match err {
            AppError::MalformedTag { member, .. } => assert_eq!(member, "Name"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
