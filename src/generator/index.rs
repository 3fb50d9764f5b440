//! Module indexes: one `mod.rs` per namespace directory.
//!
//! The index of a namespace declares its child namespaces and, for every type
//! of the namespace, a module pointing at the type's file plus a re-export of
//! the type. Together with the index at the output root this turns the
//! generated tree into a module tree that can be mounted anywhere with a single
//! `mod` item.

use std::collections::{BTreeMap, BTreeSet};

use crate::schema::{QualifiedName, SchemaGraph};

/// What one namespace's index declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIndex {
    name: QualifiedName,
    namespace: String,
    children: BTreeSet<String>,
    items: Vec<QualifiedName>,
}

impl ModuleIndex {
    fn new(namespace: &str) -> Self {
        Self {
            name: QualifiedName::of_namespace(namespace),
            namespace: namespace.to_string(),
            children: BTreeSet::new(),
            items: Vec::new(),
        }
    }

    /// Name the index is reported under, see [`QualifiedName::of_namespace`].
    #[must_use]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Dotted namespace; empty for the output root.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Child namespace segments, sorted.
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(String::as_str)
    }

    /// Types declared directly in this namespace, in graph order.
    #[must_use]
    pub fn items(&self) -> &[QualifiedName] {
        &self.items
    }
}

/// Indexes for every namespace of `graph` and all of their ancestors, root
/// first. An empty graph has no indexes.
#[must_use]
pub fn module_indexes(graph: &SchemaGraph) -> Vec<ModuleIndex> {
    let mut indexes: BTreeMap<String, ModuleIndex> = BTreeMap::new();
    for descriptor in graph.iter() {
        let name = &descriptor.qualified_name;
        let segments: Vec<&str> = name.segments().collect();
        for depth in 0..segments.len() {
            let parent = segments[..depth].join(".");
            indexes
                .entry(parent.clone())
                .or_insert_with(|| ModuleIndex::new(&parent))
                .children
                .insert(segments[depth].to_string());
        }
        indexes
            .entry(name.namespace().to_string())
            .or_insert_with(|| ModuleIndex::new(name.namespace()))
            .items
            .push(name.clone());
    }
    indexes.into_values().collect()
}
