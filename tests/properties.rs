#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use kubegen::generator::PathMapper;
use kubegen::schema::naming::collection_element_name;
use kubegen::schema::{parse_schema, resolve, QualifiedName, SchemaFormat};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

fn qualified_name() -> impl Strategy<Value = QualifiedName> {
    (prop::collection::vec(identifier(), 1..4), identifier())
        .prop_map(|(segments, name)| QualifiedName::new(segments.join("."), name))
}

proptest! {
    #[test]
    fn path_mapping_is_injective(names in prop::collection::hash_set(qualified_name(), 1..64)) {
        let mapper = PathMapper::default();
        let mut seen = HashMap::new();
        for name in &names {
            let path = mapper.to_path(name);
            prop_assert_eq!(mapper.to_path(name), path.clone());
            if let Some(previous) = seen.insert(path.clone(), name.clone()) {
                prop_assert!(false, "{} and {} both map to {:?}", previous, name, path);
            }
        }
    }

    #[test]
    fn explicit_singular_is_verbatim(field in "[a-z]{1,10}", singular in "[A-Za-z]{1,10}") {
        prop_assert_eq!(
            collection_element_name(&field, Some(&singular)),
            Some(singular.clone())
        );
    }

    #[test]
    fn trailing_s_is_removed(stem in "[a-z]{1,8}[b-df-hj-np-rtv-z]") {
        // Stems ending in a consonant other than s, x, h: only the plain rule applies.
        prop_assume!(!stem.ends_with('x') && !stem.ends_with('h'));
        let field = format!("{stem}s");
        prop_assert_eq!(collection_element_name(&field, None), Some(stem));
    }

    #[test]
    fn resolution_ignores_definition_order(
        names in prop::collection::btree_set("[A-Z][a-z]{1,6}", 2..8),
        rotate in 0usize..8,
    ) {
        // YAML reads the first three as booleans and null; `Self` is a keyword.
        prop_assume!(names.iter().all(|n| !["True", "False", "Null", "Self"].contains(&n.as_str())));
        let names: Vec<_> = names.into_iter().collect();
        // Each type points at the next one, the last at the first.
        let definitions: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let next = &names[(i + 1) % names.len()];
                format!(
                    "  - {{ kind: ValueObject, namespace: io.p.v1, name: {name}, fields: [ {{ name: next, type: {{ ref: io.p.v1.{next} }} }} ] }}\n"
                )
            })
            .collect();
        let mut rotated = definitions.clone();
        rotated.rotate_left(rotate % definitions.len());

        let forward = resolve(&parse_schema(&format!("definitions:\n{}", definitions.concat()), SchemaFormat::Yaml).unwrap()).unwrap();
        let shuffled = resolve(&parse_schema(&format!("definitions:\n{}", rotated.concat()), SchemaFormat::Yaml).unwrap()).unwrap();
        prop_assert_eq!(forward, shuffled);
    }
}
