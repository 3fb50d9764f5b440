//! Serializable view models bound to the templates.
//!
//! Views flatten a descriptor into strings the templates can emit directly:
//! type paths, wrapped collection types and escaped string literals are all
//! computed here so the templates stay free of naming logic.

use serde::Serialize;

use super::index::ModuleIndex;
use crate::schema::naming::{module_segment, snake_identifier, variant_identifier};
use crate::schema::{
    Cardinality, Constant, Field, GroupVersionKind, Operation, QualifiedName, TypeDescriptor,
    TypeRef,
};

/// Fields shared by every view.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub namespace: String,
    pub name: String,
    pub qualified_name: String,
    pub description: Option<String>,
}

impl Header {
    fn of(descriptor: &TypeDescriptor) -> Self {
        let qn = &descriptor.qualified_name;
        Self {
            namespace: qn.namespace().to_string(),
            name: qn.name().to_string(),
            qualified_name: qn.to_string(),
            description: descriptor.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    /// Wire name.
    pub name: String,
    /// Wire name as an escaped Rust string literal.
    pub name_literal: String,
    pub rust_name: String,
    /// `true` when `rust_name` differs from the wire name and needs a serde rename.
    pub renamed: bool,
    /// Full field type, wrapped in `Option<..>` when nullable.
    pub rust_type: String,
    /// Field type without the `Option` wrapper.
    pub value_type: String,
    /// Element type of a list or map; the plain type for single fields.
    pub element_type: String,
    pub nullable: bool,
    pub required: bool,
    pub cardinality: Cardinality,
    pub collection_element_name: Option<String>,
    /// Builder method adding one element to a list or map.
    pub element_method: Option<String>,
    /// Error message literal returned by `build()` when the field is unset.
    pub missing_literal: String,
    pub description: Option<String>,
}

impl FieldView {
    fn new(owner: &QualifiedName, field: &Field) -> Self {
        let element_type = type_path(owner, &field.type_ref);
        let value_type = match field.cardinality {
            Cardinality::Single => element_type.clone(),
            Cardinality::List => format!("Vec<{element_type}>"),
            Cardinality::Map => format!("std::collections::BTreeMap<String, {element_type}>"),
        };
        let rust_type = if field.nullable() {
            format!("Option<{value_type}>")
        } else {
            value_type.clone()
        };
        Self {
            name: field.name.clone(),
            name_literal: literal(&field.name),
            rust_name: field.rust_name.clone(),
            renamed: field.rust_name != field.name,
            rust_type,
            value_type,
            element_type,
            nullable: field.nullable(),
            required: field.required,
            cardinality: field.cardinality,
            collection_element_name: field.collection_element_name.clone(),
            element_method: field.element_method(),
            missing_literal: literal(&format!("missing required field `{}`", field.name)),
            description: field.description.clone(),
        }
    }
}

/// Group, version and kind of a value object as escaped Rust string literals.
#[derive(Debug, Clone, Serialize)]
pub struct GvkLiterals {
    /// `group/version`, or just `version` for the core group.
    pub api_version: String,
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GvkLiterals {
    fn of(gvk: &GroupVersionKind) -> Self {
        let api_version = if gvk.group.is_empty() {
            gvk.version.clone()
        } else {
            format!("{}/{}", gvk.group, gvk.version)
        };
        Self {
            api_version: literal(&api_version),
            group: literal(&gvk.group),
            version: literal(&gvk.version),
            kind: literal(&gvk.kind),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueObjectView {
    #[serde(flatten)]
    pub header: Header,
    pub fields: Vec<FieldView>,
    pub group_version_kind: Option<GroupVersionKind>,
    pub gvk_literals: Option<GvkLiterals>,
}

impl ValueObjectView {
    #[must_use]
    pub fn new(
        descriptor: &TypeDescriptor,
        fields: &[Field],
        group_version_kind: Option<&GroupVersionKind>,
    ) -> Self {
        let owner = &descriptor.qualified_name;
        Self {
            header: Header::of(descriptor),
            fields: fields.iter().map(|f| FieldView::new(owner, f)).collect(),
            group_version_kind: group_version_kind.cloned(),
            gvk_literals: group_version_kind.map(GvkLiterals::of),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodView {
    pub name: String,
    pub verb: String,
    pub http_method: &'static str,
    pub subresource: Option<String>,
    pub takes_name: bool,
    pub path_suffix: String,
    pub input_type: Option<String>,
    /// `()` when the operation returns nothing.
    pub output_type: String,
    pub description: Option<String>,
}

impl MethodView {
    fn new(owner: &QualifiedName, op: &Operation) -> Self {
        let named = |qn: &QualifiedName| type_path(owner, &TypeRef::Named(qn.clone()));
        Self {
            name: op.method_name(),
            verb: op.verb.to_string(),
            http_method: op.verb.http_method(),
            subresource: op.subresource.clone(),
            takes_name: op.verb.takes_name(),
            path_suffix: op.path_suffix(),
            input_type: op.input.as_ref().map(named),
            output_type: op.output.as_ref().map_or_else(|| "()".to_string(), named),
            description: op.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientInterfaceView {
    #[serde(flatten)]
    pub header: Header,
    pub resource: String,
    pub resource_type: String,
    pub methods: Vec<MethodView>,
}

impl ClientInterfaceView {
    #[must_use]
    pub fn new(descriptor: &TypeDescriptor, resource: &QualifiedName, operations: &[Operation]) -> Self {
        let owner = &descriptor.qualified_name;
        Self {
            header: Header::of(descriptor),
            resource: resource.to_string(),
            resource_type: type_path(owner, &TypeRef::Named(resource.clone())),
            methods: operations.iter().map(|op| MethodView::new(owner, op)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstantView {
    pub name: String,
    pub variant: String,
    pub value: String,
    /// `value` as a quoted, escaped Rust string literal.
    pub literal: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumConstantView {
    #[serde(flatten)]
    pub header: Header,
    pub constants: Vec<ConstantView>,
}

impl EnumConstantView {
    #[must_use]
    pub fn new(descriptor: &TypeDescriptor, constants: &[Constant]) -> Self {
        Self {
            header: Header::of(descriptor),
            constants: constants
                .iter()
                .map(|c| ConstantView {
                    name: c.name.clone(),
                    variant: variant_identifier(&c.name),
                    value: c.value.clone(),
                    literal: literal(&c.value),
                    description: c.description.clone(),
                })
                .collect(),
        }
    }
}

/// One type declared by a namespace's module index.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleItemView {
    /// Type name, re-exported from the namespace module.
    pub name: String,
    /// Module holding the type's file.
    pub module: String,
    /// File name relative to the index, as a Rust string literal.
    pub file_literal: String,
}

/// A namespace's `mod.rs`: child namespaces plus one module per type.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleIndexView {
    /// Dotted namespace; empty for the output root.
    pub namespace: String,
    /// Human-readable name of the namespace for the file header.
    pub label: String,
    /// Child namespace modules, `r#`-escaped where needed.
    pub children: Vec<String>,
    pub items: Vec<ModuleItemView>,
}

impl ModuleIndexView {
    #[must_use]
    pub fn new(index: &ModuleIndex, extension: &str) -> Self {
        Self {
            namespace: index.namespace().to_string(),
            label: index.name().to_string(),
            children: index.children().map(module_segment).collect(),
            items: index
                .items()
                .iter()
                .map(|qn| ModuleItemView {
                    name: qn.name().to_string(),
                    module: snake_identifier(qn.name()),
                    file_literal: literal(&format!("{}.{extension}", qn.name())),
                })
                .collect(),
        }
    }
}

/// `value` as a quoted, escaped Rust string literal.
fn literal(value: &str) -> String {
    format!("{value:?}")
}

/// Rust path of a named type as seen from a file in `owner`'s namespace.
///
/// Each type file is a module inside its namespace module, so the path climbs
/// with `super` to the deepest namespace both share and descends from there:
/// `super::Spec` within a namespace, `super::super::super::k8s::meta::v1::ObjectMeta`
/// from `io.x.v1`. Paths stay valid wherever the output root is mounted.
fn type_path(owner: &QualifiedName, type_ref: &TypeRef) -> String {
    let target = match type_ref {
        TypeRef::Primitive(p) => return p.rust_type().to_string(),
        TypeRef::Named(target) => target,
    };
    let from: Vec<&str> = owner.segments().collect();
    let to: Vec<&str> = target.segments().collect();
    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut path = vec!["super".to_string(); 1 + from.len() - shared];
    path.extend(to[shared..].iter().map(|s| module_segment(s)));
    path.push(target.name().to_string());
    path.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DescriptorKind, Primitive, Verb};

    fn field(name: &str, type_ref: TypeRef, cardinality: Cardinality, required: bool) -> Field {
        Field {
            name: name.to_string(),
            rust_name: snake_identifier(name),
            type_ref,
            cardinality,
            required,
            collection_element_name: match cardinality {
                Cardinality::Single => None,
                _ => Some(name.trim_end_matches('s').to_string()),
            },
            description: None,
        }
    }

    fn widget(fields: Vec<Field>) -> TypeDescriptor {
        TypeDescriptor {
            qualified_name: QualifiedName::new("io.x.v1", "Widget"),
            kind: DescriptorKind::ValueObject {
                fields,
                group_version_kind: None,
            },
            description: None,
            template: None,
        }
    }

    #[test]
    fn test_required_field_is_not_nullable() {
        let fields = vec![
            field("count", TypeRef::Primitive(Primitive::Int32), Cardinality::Single, true),
            field("label", TypeRef::Primitive(Primitive::String), Cardinality::Single, false),
        ];
        let view = ValueObjectView::new(&widget(fields.clone()), &fields, None);
        assert_eq!(view.fields[0].rust_type, "i32");
        assert!(!view.fields[0].nullable);
        assert_eq!(view.fields[1].rust_type, "Option<String>");
        assert!(view.fields[1].nullable);
    }

    #[test]
    fn test_collection_types_and_element_methods() {
        let fields = vec![
            field("verbs", TypeRef::Primitive(Primitive::String), Cardinality::List, false),
            field(
                "labels",
                TypeRef::Named(QualifiedName::new("io.k8s.meta.v1", "Label")),
                Cardinality::Map,
                true,
            ),
        ];
        let view = ValueObjectView::new(&widget(fields.clone()), &fields, None);
        assert_eq!(view.fields[0].rust_type, "Option<Vec<String>>");
        assert_eq!(view.fields[0].element_method.as_deref(), Some("verb"));
        assert_eq!(
            view.fields[1].rust_type,
            "std::collections::BTreeMap<String, super::super::super::k8s::meta::v1::Label>"
        );
        assert_eq!(
            view.fields[1].element_type,
            "super::super::super::k8s::meta::v1::Label"
        );
    }

    #[test]
    fn test_type_paths_follow_module_tree() {
        let owner = QualifiedName::new("io.x.v1", "Widget");
        let named = |ns: &str, name: &str| TypeRef::Named(QualifiedName::new(ns, name));
        assert_eq!(type_path(&owner, &named("io.x.v1", "Spec")), "super::Spec");
        assert_eq!(type_path(&owner, &named("io.x", "Shared")), "super::super::Shared");
        assert_eq!(
            type_path(&owner, &named("io.x.v1.inner", "Part")),
            "super::inner::Part"
        );
        assert_eq!(
            type_path(&owner, &named("org.y.type.v1", "Thing")),
            "super::super::super::super::org::y::r#type::v1::Thing"
        );
    }

    #[test]
    fn test_wire_names_are_escaped() {
        let fields = vec![field(
            "a\"b",
            TypeRef::Primitive(Primitive::String),
            Cardinality::Single,
            true,
        )];
        let view = ValueObjectView::new(&widget(fields.clone()), &fields, None);
        assert_eq!(view.fields[0].name_literal, r#""a\"b""#);
        assert_eq!(
            view.fields[0].missing_literal,
            r#""missing required field `a\"b`""#
        );
    }

    #[test]
    fn test_element_method_never_shadows_field() {
        let mut data = field("data", TypeRef::Primitive(Primitive::String), Cardinality::Map, false);
        data.collection_element_name = Some("data".to_string());
        let view = ValueObjectView::new(&widget(vec![data.clone()]), &[data], None);
        assert_eq!(view.fields[0].element_method.as_deref(), Some("insert_data"));
    }

    #[test]
    fn test_renamed_wire_names() {
        let fields = vec![field(
            "apiVersion",
            TypeRef::Primitive(Primitive::String),
            Cardinality::Single,
            false,
        )];
        let view = ValueObjectView::new(&widget(fields.clone()), &fields, None);
        assert!(view.fields[0].renamed);
        assert_eq!(view.fields[0].rust_name, "api_version");
    }

    #[test]
    fn test_api_version() {
        let gvk = GroupVersionKind {
            group: String::new(),
            version: "v1".into(),
            kind: "Pod".into(),
        };
        let view = ValueObjectView::new(&widget(vec![]), &[], Some(&gvk));
        let literals = view.gvk_literals.unwrap();
        assert_eq!(literals.api_version, r#""v1""#);
        assert_eq!(literals.group, r#""""#);

        let gvk = GroupVersionKind {
            group: "x.io".into(),
            version: "v1".into(),
            kind: "Wid\"get".into(),
        };
        let literals = ValueObjectView::new(&widget(vec![]), &[], Some(&gvk))
            .gvk_literals
            .unwrap();
        assert_eq!(literals.api_version, r#""x.io/v1""#);
        assert_eq!(literals.kind, r#""Wid\"get""#);
    }

    #[test]
    fn test_method_views() {
        let descriptor = TypeDescriptor {
            qualified_name: QualifiedName::new("io.x.client.v1", "WidgetClient"),
            kind: DescriptorKind::EnumConstant { constants: vec![] },
            description: None,
            template: None,
        };
        let widget = QualifiedName::new("io.x.v1", "Widget");
        let ops = [Operation {
            verb: Verb::UpdateSubresource,
            subresource: Some("status".into()),
            input: Some(widget.clone()),
            output: None,
            description: None,
        }];
        let view = ClientInterfaceView::new(&descriptor, &widget, &ops);
        assert_eq!(view.resource_type, "super::super::super::v1::Widget");
        let method = &view.methods[0];
        assert_eq!(method.name, "update_status");
        assert_eq!(method.http_method, "PUT");
        assert_eq!(method.path_suffix, "/{name}/status");
        assert_eq!(method.output_type, "()");
    }

    #[test]
    fn test_constant_literals_are_escaped() {
        let descriptor = TypeDescriptor {
            qualified_name: QualifiedName::new("io.x.v1", "Quote"),
            kind: DescriptorKind::EnumConstant { constants: vec![] },
            description: None,
            template: None,
        };
        let constants = [Constant {
            name: "double-quote".into(),
            value: "say \"hi\"".into(),
            description: None,
        }];
        let view = EnumConstantView::new(&descriptor, &constants);
        assert_eq!(view.constants[0].variant, "DoubleQuote");
        assert_eq!(view.constants[0].literal, r#""say \"hi\"""#);
    }
}
