//! # Schema Module
//!
//! Turns an input document into the immutable [`SchemaGraph`] that drives
//! generation.
//!
//! ## Overview
//!
//! - [`load`] - the raw, serde-deserialized document (YAML or JSON)
//! - [`resolve`](resolve::resolve) - two-pass resolution into typed descriptors
//! - [`naming`] - identifier, pluralization and doc-wrapping rules
//! - [`types`] - the descriptor model
//!
//! ## Example
//!
//! ```rust,ignore
//! use kubegen::schema::{load_schema, resolve};
//!
//! let raw = load_schema(Path::new("api.yaml"))?;
//! let graph = resolve(&raw)?;
//! for descriptor in graph.iter() {
//!     println!("{} ({})", descriptor.qualified_name, descriptor.kind.tag());
//! }
//! ```

pub mod load;
pub mod naming;
mod resolve;
mod types;

pub use load::{load_schema, parse_schema, RawSchema, SchemaFormat};
pub use resolve::resolve;
pub use types::{
    Cardinality, Constant, DescriptorKind, Field, GroupVersionKind, KindTag, Operation, Primitive,
    QualifiedName, SchemaGraph, TypeDescriptor, TypeRef, Verb,
};
