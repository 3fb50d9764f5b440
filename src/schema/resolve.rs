//! Two-pass resolution of raw definitions into a [`SchemaGraph`].
//!
//! Pass one registers every `(namespace, name)` so references may point forward
//! or backward in the document. Pass two builds each descriptor and resolves its
//! field types, client resource and operation inputs/outputs against the
//! registry. Nothing touches the file system here: a schema that fails to
//! resolve never produces output.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, trace};

use super::load::{
    RawClientInterface, RawDefinition, RawEnumConstant, RawField, RawOperation, RawSchema,
    RawTypeRef, RawValueObject,
};
use super::naming::{
    collection_element_name, is_deprecated, is_identifier, is_keyword, is_module_segment,
    snake_identifier, variant_identifier,
};
use super::types::{
    Cardinality, Constant, DescriptorKind, Field, KindTag, Operation, Primitive, QualifiedName,
    SchemaGraph, TypeDescriptor, TypeRef,
};
use crate::error::SchemaResolutionError;

type Registry = HashMap<QualifiedName, KindTag>;

/// Method every generated builder defines besides its setters.
const BUILD_METHOD: &str = "build";

/// Resolve raw definitions into the descriptor graph.
///
/// Fails on the first duplicate `(namespace, name)`, dangling reference or
/// structural inconsistency.
pub fn resolve(raw: &RawSchema) -> Result<SchemaGraph, SchemaResolutionError> {
    let registry = register(raw)?;
    check_module_layout(&registry)?;

    let mut descriptors = BTreeMap::new();
    for definition in &raw.definitions {
        let descriptor = match definition {
            RawDefinition::ValueObject(def) => resolve_value_object(def, &registry)?,
            RawDefinition::ClientInterface(def) => resolve_client(def, &registry)?,
            RawDefinition::EnumConstant(def) => resolve_enum(def)?,
        };
        trace!(descriptor = %descriptor.qualified_name, "resolved descriptor");
        descriptors.insert(descriptor.qualified_name.clone(), descriptor);
    }

    let graph = SchemaGraph::from_descriptors(descriptors);
    debug!(
        descriptors = graph.len(),
        value_objects = graph.count(KindTag::ValueObject),
        clients = graph.count(KindTag::ClientInterface),
        enums = graph.count(KindTag::EnumConstant),
        "schema resolved"
    );
    Ok(graph)
}

fn register(raw: &RawSchema) -> Result<Registry, SchemaResolutionError> {
    let mut registry = Registry::with_capacity(raw.definitions.len());
    for definition in &raw.definitions {
        let name = declared_name(definition.namespace(), definition.name())?;
        let tag = match definition {
            RawDefinition::ValueObject(_) => KindTag::ValueObject,
            RawDefinition::ClientInterface(_) => KindTag::ClientInterface,
            RawDefinition::EnumConstant(_) => KindTag::EnumConstant,
        };
        if registry.insert(name.clone(), tag).is_some() {
            return Err(SchemaResolutionError::Duplicate { name });
        }
    }
    Ok(registry)
}

fn declared_name(namespace: &str, name: &str) -> Result<QualifiedName, SchemaResolutionError> {
    if namespace.is_empty() || !namespace.split('.').all(is_module_segment) {
        return Err(SchemaResolutionError::InvalidName {
            name: namespace.to_string(),
            reason: "namespace segments must be identifiers separated by '.', \
                     other than crate, self, super and _",
        });
    }
    if !is_identifier(name) || is_keyword(name) {
        return Err(SchemaResolutionError::InvalidName {
            name: name.to_string(),
            reason: "type names must be identifiers and not Rust keywords",
        });
    }
    Ok(QualifiedName::new(namespace, name))
}

/// Each namespace becomes a module whose index declares its child namespaces,
/// one module per type and a re-export of each type. Within a namespace those
/// names must all differ.
fn check_module_layout(registry: &Registry) -> Result<(), SchemaResolutionError> {
    let mut children: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for name in registry.keys() {
        let segments: Vec<&str> = name.segments().collect();
        for depth in 0..segments.len() {
            children
                .entry(segments[..depth].join("."))
                .or_default()
                .insert(segments[depth].to_string());
        }
    }

    let mut names: Vec<&QualifiedName> = registry.keys().collect();
    names.sort();
    let mut taken: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for name in names {
        let namespace = name.namespace();
        let items = taken
            .entry(namespace)
            .or_insert_with(|| children.get(namespace).cloned().unwrap_or_default());
        for item in [name.name().to_string(), snake_identifier(name.name())] {
            if !items.insert(item.clone()) {
                return Err(SchemaResolutionError::ModuleCollision {
                    namespace: namespace.to_string(),
                    item,
                });
            }
        }
    }
    Ok(())
}

/// Look up a dotted reference, checking that it exists and has an allowed kind.
fn lookup(
    registry: &Registry,
    owner: &QualifiedName,
    member: &str,
    reference: &str,
    allowed: &[KindTag],
    expected: &'static str,
) -> Result<QualifiedName, SchemaResolutionError> {
    let unresolved = || SchemaResolutionError::UnresolvedReference {
        owner: owner.clone(),
        member: member.to_string(),
        target: reference.to_string(),
    };
    let target = QualifiedName::parse(reference).ok_or_else(unresolved)?;
    let found = registry.get(&target).ok_or_else(unresolved)?;
    if !allowed.contains(found) {
        return Err(SchemaResolutionError::InvalidReference {
            owner: owner.clone(),
            member: member.to_string(),
            target,
            expected,
            found: found.as_str(),
        });
    }
    Ok(target)
}

fn resolve_value_object(
    def: &RawValueObject,
    registry: &Registry,
) -> Result<TypeDescriptor, SchemaResolutionError> {
    let owner = QualifiedName::new(&def.namespace, &def.name);
    let mut wire_names = HashSet::new();
    let mut rust_names = HashSet::new();
    let mut builder_methods = HashSet::from([BUILD_METHOD.to_string()]);
    let mut fields = Vec::with_capacity(def.fields.len());

    for raw in &def.fields {
        if raw.deprecated || is_deprecated(raw.description.as_deref()) {
            trace!(owner = %owner, field = %raw.name, "skipping deprecated field");
            continue;
        }
        let field = resolve_field(&owner, raw, registry)?;
        if !wire_names.insert(field.name.clone()) || !rust_names.insert(field.rust_name.clone()) {
            return Err(SchemaResolutionError::DuplicateMember {
                owner,
                member: field.name,
            });
        }
        let methods = std::iter::once(field.rust_name.clone()).chain(field.element_method());
        for method in methods {
            if !builder_methods.insert(method.clone()) {
                return Err(SchemaResolutionError::DuplicateMember {
                    owner,
                    member: method,
                });
            }
        }
        fields.push(field);
    }

    Ok(TypeDescriptor {
        qualified_name: owner,
        kind: DescriptorKind::ValueObject {
            fields,
            group_version_kind: def.group_version_kind.clone(),
        },
        description: def.description.clone(),
        template: def.template.clone(),
    })
}

fn resolve_field(
    owner: &QualifiedName,
    raw: &RawField,
    registry: &Registry,
) -> Result<Field, SchemaResolutionError> {
    let type_ref = match &raw.type_ref {
        RawTypeRef::Primitive(name) => {
            let primitive =
                Primitive::parse(name).ok_or_else(|| SchemaResolutionError::UnknownPrimitive {
                    owner: owner.clone(),
                    field: raw.name.clone(),
                    type_name: name.clone(),
                })?;
            TypeRef::Primitive(primitive)
        }
        RawTypeRef::Named { reference } => TypeRef::Named(lookup(
            registry,
            owner,
            &raw.name,
            reference,
            &[KindTag::ValueObject, KindTag::EnumConstant],
            "a value object or enum constant",
        )?),
    };

    let collection_element_name = match raw.cardinality {
        Cardinality::Single => None,
        Cardinality::List | Cardinality::Map => Some(
            collection_element_name(&raw.name, raw.singular.as_deref()).ok_or_else(|| {
                SchemaResolutionError::SingularOverrideRequired {
                    owner: owner.clone(),
                    field: raw.name.clone(),
                }
            })?,
        ),
    };

    Ok(Field {
        name: raw.name.clone(),
        rust_name: snake_identifier(&raw.name),
        type_ref,
        cardinality: raw.cardinality,
        required: raw.required,
        collection_element_name,
        description: raw.description.clone(),
    })
}

fn resolve_client(
    def: &RawClientInterface,
    registry: &Registry,
) -> Result<TypeDescriptor, SchemaResolutionError> {
    let owner = QualifiedName::new(&def.namespace, &def.name);
    let resource = lookup(
        registry,
        &owner,
        "resource",
        &def.resource,
        &[KindTag::ValueObject],
        "a value object",
    )?;

    let mut operations = def
        .operations
        .iter()
        .filter(|op| !op.deprecated && !is_deprecated(op.description.as_deref()))
        .map(|op| resolve_operation(&owner, op, registry))
        .collect::<Result<Vec<_>, _>>()?;
    operations.sort_by_key(Operation::method_name);

    for pair in operations.windows(2) {
        if pair[0].method_name() == pair[1].method_name() {
            return Err(SchemaResolutionError::DuplicateMember {
                owner,
                member: pair[0].method_name(),
            });
        }
    }

    Ok(TypeDescriptor {
        qualified_name: owner,
        kind: DescriptorKind::ClientInterface {
            resource,
            operations,
        },
        description: def.description.clone(),
        template: def.template.clone(),
    })
}

fn resolve_operation(
    owner: &QualifiedName,
    raw: &RawOperation,
    registry: &Registry,
) -> Result<Operation, SchemaResolutionError> {
    let mismatch = |problem| SchemaResolutionError::SubresourceMismatch {
        owner: owner.clone(),
        verb: raw.verb.to_string(),
        problem,
    };
    match (&raw.subresource, raw.verb.requires_subresource()) {
        (None, true) => return Err(mismatch("requires a subresource")),
        (Some(_), false) => return Err(mismatch("does not route to a subresource")),
        (Some(sub), true) if !is_identifier(sub) => {
            return Err(mismatch("names a subresource that is not an identifier"))
        }
        _ => {}
    }

    let member = raw.verb.to_string();
    let resolve_io = |reference: &Option<String>| {
        reference
            .as_deref()
            .map(|r| {
                lookup(
                    registry,
                    owner,
                    &member,
                    r,
                    &[KindTag::ValueObject],
                    "a value object",
                )
            })
            .transpose()
    };

    Ok(Operation {
        verb: raw.verb,
        subresource: raw.subresource.clone(),
        input: resolve_io(&raw.input)?,
        output: resolve_io(&raw.output)?,
        description: raw.description.clone(),
    })
}

fn resolve_enum(def: &RawEnumConstant) -> Result<TypeDescriptor, SchemaResolutionError> {
    let owner = QualifiedName::new(&def.namespace, &def.name);
    let mut variants = HashSet::new();
    let constants = def
        .constants
        .iter()
        .map(|raw| {
            if !variants.insert(variant_identifier(&raw.name)) {
                return Err(SchemaResolutionError::DuplicateMember {
                    owner: owner.clone(),
                    member: raw.name.clone(),
                });
            }
            Ok(Constant {
                name: raw.name.clone(),
                value: raw.value.clone(),
                description: raw.description.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeDescriptor {
        qualified_name: owner,
        kind: DescriptorKind::EnumConstant { constants },
        description: def.description.clone(),
        template: def.template.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::load::{parse_schema, SchemaFormat};
    use crate::schema::types::Verb;

    fn resolve_yaml(yaml: &str) -> Result<SchemaGraph, SchemaResolutionError> {
        resolve(&parse_schema(yaml, SchemaFormat::Yaml).unwrap())
    }

    fn fields_of<'a>(graph: &'a SchemaGraph, ns: &str, name: &str) -> &'a [Field] {
        match &graph.get(&QualifiedName::new(ns, name)).unwrap().kind {
            DescriptorKind::ValueObject { fields, .. } => fields,
            other => panic!("expected value object, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_and_backward_references() {
        let graph = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    fields:
      - { name: spec, type: { ref: io.x.v1.WidgetSpec } }
  - kind: ValueObject
    namespace: io.x.v1
    name: WidgetSpec
    fields:
      - { name: owner, type: { ref: io.x.v1.Widget } }
"#,
        )
        .unwrap();
        assert_eq!(graph.len(), 2);
        let spec = &fields_of(&graph, "io.x.v1", "Widget")[0];
        assert_eq!(
            spec.type_ref,
            TypeRef::Named(QualifiedName::new("io.x.v1", "WidgetSpec"))
        );
    }

    #[test]
    fn test_duplicate_definition() {
        let err = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: Widget }
  - { kind: EnumConstant, namespace: io.x.v1, name: Widget }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::Duplicate { name } if name.name() == "Widget"));
    }

    #[test]
    fn test_unresolved_field_reference() {
        let err = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    fields:
      - { name: spec, type: { ref: io.x.v1.Missing } }
"#,
        )
        .unwrap_err();
        match err {
            SchemaResolutionError::UnresolvedReference { member, target, .. } => {
                assert_eq!(member, "spec");
                assert_eq!(target, "io.x.v1.Missing");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_field_cannot_reference_client() {
        let err = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: Widget, fields: [ { name: c, type: { ref: io.x.v1.WidgetClient } } ] }
  - { kind: ClientInterface, namespace: io.x.v1, name: WidgetClient, resource: io.x.v1.Widget }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::InvalidReference { found: "client interface", .. }));
    }

    #[test]
    fn test_required_and_nullable() {
        let graph = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    fields:
      - { name: count, type: int, required: true }
      - { name: label, type: string }
"#,
        )
        .unwrap();
        let fields = fields_of(&graph, "io.x.v1", "Widget");
        assert!(!fields[0].nullable());
        assert!(fields[1].nullable());
        assert_eq!(fields[0].type_ref, TypeRef::Primitive(Primitive::Int32));
    }

    #[test]
    fn test_collection_element_names() {
        let graph = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Rule
    fields:
      - { name: verbs, type: string, cardinality: list }
      - { name: labels, type: string, cardinality: map }
      - { name: status, type: string, cardinality: list, singular: condition }
      - { name: name, type: string, singular: ignored }
"#,
        )
        .unwrap();
        let fields = fields_of(&graph, "io.x.v1", "Rule");
        assert_eq!(fields[0].collection_element_name.as_deref(), Some("verb"));
        assert_eq!(fields[1].collection_element_name.as_deref(), Some("label"));
        assert_eq!(fields[2].collection_element_name.as_deref(), Some("condition"));
        assert_eq!(fields[3].collection_element_name, None);
    }

    #[test]
    fn test_singular_override_required() {
        let err = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Rule
    fields:
      - { name: ingress, type: string, cardinality: list }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::SingularOverrideRequired { field, .. } if field == "ingress"));
    }

    #[test]
    fn test_deprecated_members_dropped() {
        let graph = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    fields:
      - { name: old, type: { ref: io.x.v1.Gone }, description: "Deprecated: use new." }
      - { name: legacy, type: string, deprecated: true }
      - { name: new, type: string }
"#,
        )
        .unwrap();
        let fields = fields_of(&graph, "io.x.v1", "Widget");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "new");
    }

    #[test]
    fn test_duplicate_rust_names_rejected() {
        let err = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Widget
    fields:
      - { name: apiVersion, type: string }
      - { name: api_version, type: string }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::DuplicateMember { .. }));
    }

    #[test]
    fn test_client_operations_sorted_and_checked() {
        let graph = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: Widget }
  - { kind: ValueObject, namespace: io.x.v1, name: GetOptions }
  - kind: ClientInterface
    namespace: io.x.client.v1
    name: WidgetClient
    resource: io.x.v1.Widget
    operations:
      - { verb: list, output: io.x.v1.Widget }
      - { verb: getSubresource, subresource: status, output: io.x.v1.Widget }
      - { verb: get, input: io.x.v1.GetOptions, output: io.x.v1.Widget }
      - { verb: create, input: io.x.v1.Widget, output: io.x.v1.Widget }
"#,
        )
        .unwrap();
        let client = graph
            .get(&QualifiedName::new("io.x.client.v1", "WidgetClient"))
            .unwrap();
        let DescriptorKind::ClientInterface { operations, resource } = &client.kind else {
            panic!("expected client");
        };
        assert_eq!(resource.name(), "Widget");
        let names: Vec<_> = operations.iter().map(Operation::method_name).collect();
        assert_eq!(names, ["create", "get", "get_status", "list"]);
        assert_eq!(operations[1].verb, Verb::Get);
    }

    #[test]
    fn test_subresource_mismatch() {
        let base = r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: Widget }
  - kind: ClientInterface
    namespace: io.x.v1
    name: WidgetClient
    resource: io.x.v1.Widget
    operations:
"#;
        let missing = format!("{base}      - {{ verb: patchSubresource }}\n");
        assert!(matches!(
            resolve_yaml(&missing).unwrap_err(),
            SchemaResolutionError::SubresourceMismatch { .. }
        ));
        let extra = format!("{base}      - {{ verb: get, subresource: status }}\n");
        assert!(matches!(
            resolve_yaml(&extra).unwrap_err(),
            SchemaResolutionError::SubresourceMismatch { .. }
        ));
    }

    #[test]
    fn test_duplicate_method_names() {
        let err = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: Widget }
  - kind: ClientInterface
    namespace: io.x.v1
    name: WidgetClient
    resource: io.x.v1.Widget
    operations:
      - { verb: get }
      - { verb: get }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::DuplicateMember { member, .. } if member == "get"));
    }

    #[test]
    fn test_invalid_names() {
        let err = resolve_yaml("definitions:\n  - { kind: ValueObject, namespace: io..v1, name: W }\n")
            .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::InvalidName { .. }));
        let err = resolve_yaml("definitions:\n  - { kind: ValueObject, namespace: io.v1, name: a/b }\n")
            .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::InvalidName { .. }));
    }

    #[test]
    fn test_builder_method_collisions() {
        // `items` adds elements through `item`, which is also a setter.
        let err = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Job
    fields:
      - { name: item, type: string }
      - { name: items, type: string, cardinality: list }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::DuplicateMember { member, .. } if member == "item"));

        // `builds` would add a second `build` next to the builder's own.
        let err = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Job
    fields:
      - { name: builds, type: string, cardinality: list }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::DuplicateMember { member, .. } if member == "build"));

        let graph = resolve_yaml(
            r#"
definitions:
  - kind: ValueObject
    namespace: io.x.v1
    name: Job
    fields:
      - { name: builds, type: string, cardinality: list, singular: buildRef }
"#,
        )
        .unwrap();
        let fields = fields_of(&graph, "io.x.v1", "Job");
        assert_eq!(fields[0].element_method().as_deref(), Some("build_ref"));
    }

    #[test]
    fn test_keyword_names() {
        // Keyword segments have a raw form and are accepted.
        let graph = resolve_yaml("definitions:\n  - { kind: ValueObject, namespace: io.x.type.v1, name: W }\n");
        assert!(graph.is_ok());

        for yaml in [
            "definitions:\n  - { kind: ValueObject, namespace: io.self.v1, name: W }\n",
            "definitions:\n  - { kind: ValueObject, namespace: io.crate, name: W }\n",
            "definitions:\n  - { kind: ValueObject, namespace: io.x.v1, name: type }\n",
            "definitions:\n  - { kind: ValueObject, namespace: io.x.v1, name: Self }\n",
        ] {
            let err = resolve_yaml(yaml).unwrap_err();
            assert!(matches!(err, SchemaResolutionError::InvalidName { .. }), "{yaml}");
        }
    }

    #[test]
    fn test_module_index_collisions() {
        // A type named like a child namespace.
        let err = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x, name: v1 }
  - { kind: ValueObject, namespace: io.x.v1, name: Widget }
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaResolutionError::ModuleCollision { namespace, item } if namespace == "io.x" && item == "v1"
        ));

        // Two types whose modules share a snake_case name.
        let err = resolve_yaml(
            r#"
definitions:
  - { kind: ValueObject, namespace: io.x.v1, name: PodIP }
  - { kind: ValueObject, namespace: io.x.v1, name: PodIp }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::ModuleCollision { item, .. } if item == "pod_ip"));
    }

    #[test]
    fn test_enum_variant_collision() {
        let err = resolve_yaml(
            r#"
definitions:
  - kind: EnumConstant
    namespace: io.x.v1
    name: PatchType
    constants:
      - { name: json, value: a }
      - { name: Json, value: b }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaResolutionError::DuplicateMember { .. }));
    }
}
