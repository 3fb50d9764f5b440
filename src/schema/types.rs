use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::naming::snake_identifier;

/// A `(namespace, name)` pair identifying one generated unit.
///
/// Ordering is lexicographic on `(namespace, name)`, which is the iteration
/// order of a [`SchemaGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    namespace: String,
    name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a dotted reference (`io.k8s.meta.v1.ObjectMeta`) at its last dot.
    ///
    /// Returns `None` when there is no namespace part.
    #[must_use]
    pub fn parse(dotted: &str) -> Option<Self> {
        let (namespace, name) = dotted.rsplit_once('.')?;
        Some(Self::new(namespace, name))
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace segments, in order. Empty for the output root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.split('.').filter(|s| !s.is_empty())
    }

    /// The name a whole namespace is reported under: `io.x.v1` becomes
    /// `(io.x, v1)` and the empty namespace (the output root) `("", "")`.
    #[must_use]
    pub fn of_namespace(namespace: &str) -> Self {
        match namespace.rsplit_once('.') {
            Some((parent, last)) => Self::new(parent, last),
            None => Self::new("", namespace),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.namespace.is_empty(), self.name.is_empty()) {
            (true, true) => f.write_str("(root)"),
            (true, false) => f.write_str(&self.name),
            _ => write!(f, "{}.{}", self.namespace, self.name),
        }
    }
}

/// Built-in scalar types a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    String,
    Int32,
    Int64,
    Double,
    Boolean,
    DateTime,
    IntOrString,
    Object,
}

impl Primitive {
    /// Parse a primitive type name as written in the input document.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let primitive = match s {
            "string" => Primitive::String,
            "int" | "int32" | "integer" => Primitive::Int32,
            "long" | "int64" => Primitive::Int64,
            "double" | "number" => Primitive::Double,
            "bool" | "boolean" => Primitive::Boolean,
            "date-time" => Primitive::DateTime,
            "int-or-string" => Primitive::IntOrString,
            "object" => Primitive::Object,
            _ => return None,
        };
        Some(primitive)
    }

    /// Rust type used for this primitive in rendered models.
    #[must_use]
    pub fn rust_type(self) -> &'static str {
        match self {
            // Timestamps and int-or-string travel as their RFC 3339 / textual form.
            Primitive::String | Primitive::DateTime | Primitive::IntOrString => "String",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::Double => "f64",
            Primitive::Boolean => "bool",
            Primitive::Object => "serde_json::Value",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Primitive::String => "string",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Double => "double",
            Primitive::Boolean => "boolean",
            Primitive::DateTime => "date-time",
            Primitive::IntOrString => "int-or-string",
            Primitive::Object => "object",
        };
        write!(f, "{s}")
    }
}

/// Type of a field: a primitive or another descriptor in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Named(QualifiedName),
}

/// Whether a field holds one value, an ordered list, or a string-keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    List,
    Map,
}

/// One member of a value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Wire name, verbatim from the input.
    pub name: String,
    /// Identifier used in generated code.
    pub rust_name: String,
    pub type_ref: TypeRef,
    pub cardinality: Cardinality,
    pub required: bool,
    /// Singular form used for per-element builder operations; `Some` exactly when
    /// the field is a list or a map.
    pub collection_element_name: Option<String>,
    pub description: Option<String>,
}

impl Field {
    /// Optional fields are always nullable; required fields never are.
    #[must_use]
    pub fn nullable(&self) -> bool {
        !self.required
    }

    /// Builder method that adds one element to a list or map field.
    ///
    /// Named after the singular form, or `add_`/`insert_` plus the singular
    /// when that would equal the field's own setter (`data` → `insert_data`).
    #[must_use]
    pub fn element_method(&self) -> Option<String> {
        let singular = self.collection_element_name.as_deref()?;
        let method = snake_identifier(singular);
        let stem = method.trim_end_matches('_');
        if stem != self.rust_name.trim_end_matches('_') {
            return Some(method);
        }
        Some(match self.cardinality {
            Cardinality::Map => format!("insert_{stem}"),
            _ => format!("add_{stem}"),
        })
    }
}

/// Client operation verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verb {
    Create,
    Delete,
    DeleteCollection,
    Get,
    GetSubresource,
    List,
    Patch,
    PatchSubresource,
    Update,
    UpdateSubresource,
}

impl Verb {
    /// Base method name before any subresource suffix.
    #[must_use]
    pub fn method_base(self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Delete => "delete",
            Verb::DeleteCollection => "delete_collection",
            Verb::Get | Verb::GetSubresource => "get",
            Verb::List => "list",
            Verb::Patch | Verb::PatchSubresource => "patch",
            Verb::Update | Verb::UpdateSubresource => "update",
        }
    }

    #[must_use]
    pub fn http_method(self) -> &'static str {
        match self {
            Verb::Create => "POST",
            Verb::Delete | Verb::DeleteCollection => "DELETE",
            Verb::Get | Verb::GetSubresource | Verb::List => "GET",
            Verb::Patch | Verb::PatchSubresource => "PATCH",
            Verb::Update | Verb::UpdateSubresource => "PUT",
        }
    }

    /// Whether the verb only makes sense against a named subresource.
    #[must_use]
    pub fn requires_subresource(self) -> bool {
        matches!(
            self,
            Verb::GetSubresource | Verb::PatchSubresource | Verb::UpdateSubresource
        )
    }

    /// Whether the operation addresses one named resource rather than the collection.
    #[must_use]
    pub fn takes_name(self) -> bool {
        !matches!(self, Verb::Create | Verb::DeleteCollection | Verb::List)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Create => "create",
            Verb::Delete => "delete",
            Verb::DeleteCollection => "deleteCollection",
            Verb::Get => "get",
            Verb::GetSubresource => "getSubresource",
            Verb::List => "list",
            Verb::Patch => "patch",
            Verb::PatchSubresource => "patchSubresource",
            Verb::Update => "update",
            Verb::UpdateSubresource => "updateSubresource",
        };
        write!(f, "{s}")
    }
}

/// One method of a client contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub verb: Verb,
    pub subresource: Option<String>,
    pub input: Option<QualifiedName>,
    pub output: Option<QualifiedName>,
    pub description: Option<String>,
}

impl Operation {
    /// `get`, `get_status`, `delete_collection`, ...
    #[must_use]
    pub fn method_name(&self) -> String {
        match &self.subresource {
            Some(sub) => format!(
                "{}_{}",
                self.verb.method_base(),
                snake_identifier(sub)
            ),
            None => self.verb.method_base().to_string(),
        }
    }

    /// Route relative to the resource collection, e.g. `/{name}/status`.
    #[must_use]
    pub fn path_suffix(&self) -> String {
        let mut path = String::new();
        if self.verb.takes_name() {
            path.push_str("/{name}");
        }
        if let Some(sub) = &self.subresource {
            path.push('/');
            path.push_str(sub);
        }
        path
    }
}

/// A named literal of an enumerated-constant descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: String,
    pub description: Option<String>,
}

/// API group, version and kind a value object serialises as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

/// Variant-specific content of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    ValueObject {
        fields: Vec<Field>,
        group_version_kind: Option<GroupVersionKind>,
    },
    ClientInterface {
        /// Value object the client manages.
        resource: QualifiedName,
        /// Sorted by method name.
        operations: Vec<Operation>,
    },
    EnumConstant {
        constants: Vec<Constant>,
    },
}

impl DescriptorKind {
    #[must_use]
    pub fn tag(&self) -> KindTag {
        match self {
            DescriptorKind::ValueObject { .. } => KindTag::ValueObject,
            DescriptorKind::ClientInterface { .. } => KindTag::ClientInterface,
            DescriptorKind::EnumConstant { .. } => KindTag::EnumConstant,
        }
    }
}

/// Payload-free discriminant of [`DescriptorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    ValueObject,
    ClientInterface,
    EnumConstant,
}

impl KindTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KindTag::ValueObject => "value object",
            KindTag::ClientInterface => "client interface",
            KindTag::EnumConstant => "enum constant",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub qualified_name: QualifiedName,
    pub kind: DescriptorKind,
    pub description: Option<String>,
    /// Template override; `None` selects the kind's default template.
    pub template: Option<String>,
}

/// The resolved descriptor graph of one generation run.
///
/// Built once by [`resolve`](super::resolve), never mutated afterwards, and
/// iterated in [`QualifiedName`] order so input ordering never leaks into output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaGraph {
    descriptors: BTreeMap<QualifiedName, TypeDescriptor>,
}

impl SchemaGraph {
    pub(crate) fn from_descriptors(descriptors: BTreeMap<QualifiedName, TypeDescriptor>) -> Self {
        Self { descriptors }
    }

    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&TypeDescriptor> {
        self.descriptors.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of descriptors of the given kind.
    #[must_use]
    pub fn count(&self, tag: KindTag) -> usize {
        self.iter().filter(|d| d.kind.tag() == tag).count()
    }
}
