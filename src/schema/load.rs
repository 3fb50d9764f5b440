use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::types::{Cardinality, GroupVersionKind, Verb};
use crate::error::LoadError;

/// The input document: an unordered collection of definitions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSchema {
    #[serde(default)]
    pub definitions: Vec<RawDefinition>,
}

/// One definition, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum RawDefinition {
    ValueObject(RawValueObject),
    ClientInterface(RawClientInterface),
    EnumConstant(RawEnumConstant),
}

impl RawDefinition {
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            RawDefinition::ValueObject(d) => &d.namespace,
            RawDefinition::ClientInterface(d) => &d.namespace,
            RawDefinition::EnumConstant(d) => &d.namespace,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            RawDefinition::ValueObject(d) => &d.name,
            RawDefinition::ClientInterface(d) => &d.name,
            RawDefinition::EnumConstant(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawValueObject {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub group_version_kind: Option<GroupVersionKind>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: RawTypeRef,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Element-name override for list and map fields.
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// `type: int32` or `type: { ref: io.k8s.meta.v1.ObjectMeta }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTypeRef {
    Primitive(String),
    Named {
        #[serde(rename = "ref")]
        reference: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawClientInterface {
    pub namespace: String,
    pub name: String,
    /// Dotted reference to the value object the client manages.
    pub resource: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawOperation {
    pub verb: Verb,
    #[serde(default)]
    pub subresource: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawEnumConstant {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub constants: Vec<RawConstant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConstant {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Document syntax, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    /// `.yaml` / `.yml` are YAML, everything else is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SchemaFormat::Yaml,
            _ => SchemaFormat::Json,
        }
    }
}

/// Parse a schema document from text.
pub fn parse_schema(content: &str, format: SchemaFormat) -> Result<RawSchema, LoadError> {
    let schema = match format {
        SchemaFormat::Yaml => serde_yaml::from_str(content)?,
        SchemaFormat::Json => serde_json::from_str(content)?,
    };
    Ok(schema)
}

/// Read and parse the schema document at `path`.
pub fn load_schema(path: &Path) -> Result<RawSchema, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = parse_schema(&content, SchemaFormat::from_path(path))?;
    debug!(
        path = %path.display(),
        definitions = schema.definitions.len(),
        "loaded schema document"
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    groupVersionKind: { group: x, version: v1, kind: Widget }
    fields:
      - name: count
        type: int32
        required: true
      - name: parts
        type: { ref: io.x.v1.Part }
        cardinality: list
  - kind: ClientInterface
    namespace: io.x.client.v1
    name: WidgetClient
    resource: io.x.v1.Widget
    operations:
      - verb: getSubresource
        subresource: status
        output: io.x.v1.Widget
  - kind: EnumConstant
    namespace: io.x.v1
    name: PatchType
    constants:
      - { name: Json, value: "application/json-patch+json" }
"#;

    #[test]
    fn test_parse_yaml_document() {
        let schema = parse_schema(YAML, SchemaFormat::Yaml).unwrap();
        assert_eq!(schema.definitions.len(), 3);
        let RawDefinition::ValueObject(widget) = &schema.definitions[0] else {
            panic!("expected value object");
        };
        assert_eq!(widget.fields.len(), 2);
        assert!(matches!(&widget.fields[0].type_ref, RawTypeRef::Primitive(p) if p == "int32"));
        assert!(
            matches!(&widget.fields[1].type_ref, RawTypeRef::Named { reference } if reference == "io.x.v1.Part")
        );
        assert_eq!(widget.fields[1].cardinality, Cardinality::List);
        assert_eq!(widget.group_version_kind.as_ref().unwrap().kind, "Widget");

        let RawDefinition::ClientInterface(client) = &schema.definitions[1] else {
            panic!("expected client interface");
        };
        assert_eq!(client.operations[0].verb, Verb::GetSubresource);
        assert_eq!(client.operations[0].subresource.as_deref(), Some("status"));
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{"definitions":[{"kind":"EnumConstant","namespace":"io.x","name":"Mode","constants":[{"name":"a","value":"A"}]}]}"#;
        let schema = parse_schema(json, SchemaFormat::Json).unwrap();
        assert_eq!(schema.definitions[0].name(), "Mode");
        assert_eq!(schema.definitions[0].namespace(), "io.x");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = "definitions:\n  - kind: Gadget\n    namespace: io.x\n    name: G\n";
        assert!(matches!(
            parse_schema(yaml, SchemaFormat::Yaml),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SchemaFormat::from_path(Path::new("a.yml")), SchemaFormat::Yaml);
        assert_eq!(SchemaFormat::from_path(Path::new("a.yaml")), SchemaFormat::Yaml);
        assert_eq!(SchemaFormat::from_path(Path::new("a.json")), SchemaFormat::Json);
    }

    #[test]
    fn test_missing_file() {
        let err = load_schema(Path::new("/nonexistent/schema.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
