//! # kubegen
//!
//! **kubegen** is a schema-driven source generator. It reads a declarative
//! document describing typed API resources (value objects, CRUD-style client
//! contracts and enumerated constants) and renders one source file per
//! definition into an output tree, plus a `mod.rs` per namespace directory,
//! without ever overwriting a file that already exists.
//!
//! ## Architecture
//!
//! - **[`schema`]** - input document, descriptor model and two-pass resolver
//! - **[`generator`]** - path mapping, template rendering and dispatch
//! - **[`cli`]** - the `kubegen` command line
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`runtime_config`]** - environment defaults
//! - **[`error`]** - error taxonomy
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(kubegen)
//!     participant Load as schema::load_schema
//!     participant Resolve as schema::resolve
//!     participant Dispatch as generator::generate
//!     participant Gen as Generator
//!     participant FS as File System
//!
//!     CLI->>Load: load_schema("api.yaml")
//!     Load-->>CLI: RawSchema
//!     CLI->>Resolve: resolve(&raw)
//!     Resolve->>Resolve: Pass 1: register names
//!     Resolve->>Resolve: Pass 2: resolve references
//!     Resolve-->>CLI: SchemaGraph
//!     CLI->>Dispatch: generate(&graph, root)
//!     loop every descriptor, then every module index
//!         Dispatch->>Gen: write_to(root)
//!         Gen->>FS: create_dir_all(parent)
//!         Gen->>FS: open(create_new)
//!         alt already exists
//!             FS-->>Gen: AlreadyExists
//!             Gen-->>Dispatch: Skipped
//!         else created
//!             Gen->>Gen: render template
//!             Gen->>FS: write + flush
//!             Gen-->>Dispatch: Written
//!         end
//!     end
//!     Dispatch-->>CLI: GenerationReport
//! ```
//!
//! The generated tree is a module tree. Mount its root index once:
//!
//! ```rust,ignore
//! #[path = "generated/mod.rs"]
//! mod generated;
//!
//! use generated::io::x::v1::Widget;
//! ```
//!
//! A schema that fails to resolve is rejected before the first file is
//! created. Per-descriptor failures (missing templates, I/O errors) are
//! collected and reported together once every descriptor has been visited.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kubegen::generator::{generate_from_schema_file, GenerateOptions, TracingObserver};
//!
//! let report = generate_from_schema_file(
//!     Path::new("api.yaml"),
//!     Path::new("src/generated"),
//!     None,
//!     &GenerateOptions { jobs: 4, ..GenerateOptions::default() },
//!     &TracingObserver,
//! )?;
//! ```

pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod runtime_config;
pub mod schema;

pub use error::{Error, GenerateError, LoadError, RenderError, Result, SchemaResolutionError};
pub use generator::{generate, generate_from_schema_file, GenerateOptions, GenerationReport};
pub use schema::{load_schema, resolve, QualifiedName, SchemaGraph, TypeDescriptor};
