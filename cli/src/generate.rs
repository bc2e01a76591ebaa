#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads a serialized API description, generates the Swagger document and
//! writes it as JSON or YAML depending on the output extension.

use std::fs;
use std::path::{Path, PathBuf};

use swagger_gen_core::{generate_swagger_document, ApiSpec, AppError, AppResult, SwaggerDocument};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the API description (`.json`, `.yaml` or `.yml`).
    #[clap(long, env = "SWAGGER_GEN_INPUT")]
    pub input: PathBuf,

    /// Output path. JSON unless the extension is `.yaml`/`.yml`; stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Serialization format chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let spec = load_spec(&args.input)?;
    let document = generate_swagger_document(&spec)?;

    match &args.output {
        Some(path) => {
            let rendered = render(&document, Format::from_path(path))?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            tracing::info!(output = %path.display(), "wrote swagger document");
        }
        None => println!("{}", render(&document, Format::Json)?),
    }

    Ok(())
}

/// Loads an API description, picking the parser from the file extension.
pub fn load_spec(path: &Path) -> AppResult<ApiSpec> {
    if !path.exists() {
        return Err(AppError::General(format!(
            "API description not found: {:?}",
            path
        )));
    }

    let content = fs::read_to_string(path)?;
    match Format::from_path(path) {
        Format::Json => serde_json::from_str(&content)
            .map_err(|e| AppError::Serialization(format!("Invalid JSON in {:?}: {}", path, e))),
        Format::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| AppError::Serialization(format!("Invalid YAML in {:?}: {}", path, e))),
    }
}

fn render(document: &SwaggerDocument, format: Format) -> AppResult<String> {
    match format {
        Format::Json => document.to_json_pretty(),
        Format::Yaml => document.to_yaml(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const API_JSON: &str = r#"{
        "info": { "title": "\"Ping\"", "version": "\"1.0\"" },
        "service": { "name": "ping", "groups": [{ "routes": [
            { "method": "get", "path": "/ping", "handler": "Ping", "responseType": "Pong" }
        ]}]},
        "types": [
            { "name": "Pong", "members": [
                { "name": "Msg", "type": "string", "tag": "json:\"msg\"" }
            ]}
        ]
    }"#;

    const API_YAML: &str = r#"
service:
  name: ping
  groups:
    - annotation:
        prefix: /api
      routes:
        - method: post
          path: /echo
          handler: Echo
          requestType: EchoReq
types:
  - name: EchoReq
    members:
      - name: Text
        type: "[]string"
        tag: 'json:"text"'
"#;

    #[test]
    fn test_execute_writes_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("api.json");
        let output = dir.path().join("out/swagger.json");
        fs::write(&input, API_JSON).unwrap();

        execute(&GenerateArgs {
            input,
            output: Some(output.clone()),
        })
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["info"]["title"], "Ping");
        assert_eq!(
            written["paths"]["/ping"]["get"]["responses"]["200"]["schema"]["$ref"],
            "#/definitions/Pong"
        );
        assert_eq!(written["definitions"]["Pong"]["required"][0], "msg");
    }

    #[test]
    fn test_execute_yaml_in_yaml_out() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        let output = dir.path().join("swagger.yml");
        fs::write(&input, API_YAML).unwrap();

        execute(&GenerateArgs {
            input,
            output: Some(output.clone()),
        })
        .unwrap();

        let contents = fs::read_to_string(output).unwrap();
        let written: serde_yaml::Value = serde_yaml::from_str(&contents).unwrap();
        assert_eq!(
            written["paths"]["/api/echo"]["post"]["parameters"][0]["name"],
            serde_yaml::Value::from("body")
        );
        assert_eq!(
            written["definitions"]["EchoReq"]["properties"]["text"]["type"],
            serde_yaml::Value::from("array")
        );
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempdir().unwrap();
        let args = GenerateArgs {
            input: dir.path().join("missing.json"),
            output: None,
        };
        assert!(matches!(execute(&args), Err(AppError::General(_))));
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, "{ not json").unwrap();
        assert!(matches!(load_spec(&input), Err(AppError::Serialization(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.YML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a")), Format::Json);
    }
}
