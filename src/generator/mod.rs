//! # Generator Module
//!
//! Renders a resolved [`SchemaGraph`](crate::schema::SchemaGraph) into a source
//! tree, one file per descriptor plus a `mod.rs` per namespace directory,
//! without ever overwriting an existing file.
//!
//! ## Overview
//!
//! - **Path Mapper** ([`PathMapper`]) - `io.x.v1.Widget` → `io/x/v1/Widget.rs`
//! - **Template Renderer** ([`TemplateRenderer`]) - named minijinja templates
//!   bound to serializable view models
//! - **Generators** ([`Generator`]) - one per descriptor kind, sharing a single
//!   emission contract in [`Generator::write_to`]
//! - **Module Indexes** ([`module_indexes`]) - the `mod.rs` of each namespace,
//!   declaring child namespaces and re-exporting its types
//! - **Dispatch** ([`generate`]) - visits every descriptor once, sequentially or
//!   on a rayon pool, and collects per-descriptor failures
//! - **Observer** ([`GenerationObserver`]) - receives every written, skipped or
//!   failed path; [`TracingObserver`] logs them
//!
//! ## Architecture
//!
//! ```text
//! Schema → Resolver → SchemaGraph → Dispatch → (Path Mapper, Renderer) → Files
//! ```
//!
//! Resolution finishes before dispatch starts, so a schema error never leaves a
//! partial tree behind.
//!
//! ## Idempotency
//!
//! Targets are opened with an exclusive create. When the file already exists
//! the generator returns [`Emission::Skipped`] without reading or touching it,
//! so hand-edited output survives regeneration. Delete a file to regenerate it.
//!
//! ## Usage
//!
//! ### CLI Usage
//!
//! ```bash
//! kubegen generate --schema api.yaml --output src/generated --jobs 4
//! ```
//!
//! ### Programmatic Usage
//!
//! ```rust,ignore
//! use kubegen::generator::{generate_from_schema_file, GenerateOptions, TracingObserver};
//!
//! let report = generate_from_schema_file(
//!     Path::new("api.yaml"),
//!     Path::new("src/generated"),
//!     None,
//!     &GenerateOptions::default(),
//!     &TracingObserver,
//! )?;
//! println!("{} written, {} skipped", report.written.len(), report.skipped.len());
//! ```
//!
//! ## Template Customization
//!
//! The built-in templates live in `templates/`:
//!
//! - `value_object.rs.j2` - struct, serde attributes and builder
//! - `client_interface.rs.j2` - client trait, one method per operation
//! - `enum_constant.rs.j2` - string-backed enum
//! - `module_index.rs.j2` - a namespace's `mod.rs`
//!
//! Pass `--templates <DIR>` to replace any of them by file stem, or set a
//! descriptor's `template` to select an additional one.

mod dispatch;
mod emit;
mod index;
mod model;
mod observer;
mod path;
mod project;
mod templates;

pub use dispatch::{generate, GenerateOptions, GenerationReport};
pub use emit::{
    generator_for, ClientInterfaceGenerator, EmitContext, Emission, EnumConstantGenerator,
    Generator, ModuleIndexGenerator, ValueObjectGenerator,
};
pub use index::{module_indexes, ModuleIndex};
pub use model::{
    ClientInterfaceView, ConstantView, EnumConstantView, FieldView, GvkLiterals, Header,
    MethodView, ModuleIndexView, ModuleItemView, ValueObjectView,
};
pub use observer::{GenerationObserver, NullObserver, TracingObserver};
pub use path::{PathMapper, DEFAULT_EXTENSION, MODULE_INDEX_STEM};
pub use project::{
    build_renderer, generate_from_schema_file, load_graph, plan, GraphSummary, PlannedFile,
    MODULE_INDEX_KIND,
};
pub use templates::{
    TemplateRenderer, CLIENT_INTERFACE_TEMPLATE, ENUM_CONSTANT_TEMPLATE, MODULE_INDEX_TEMPLATE,
    VALUE_OBJECT_TEMPLATE,
};
