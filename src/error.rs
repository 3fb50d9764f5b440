//! # Error Types
//!
//! Every failure the generator can report, grouped by the stage that raises it:
//!
//! - [`LoadError`] - the input document could not be read or parsed
//! - [`SchemaResolutionError`] - the document is structurally inconsistent; raised
//!   before any file is written
//! - [`RenderError`] - a template is missing or failed to evaluate
//! - [`GenerateError`] - one descriptor could not be emitted; collected per run
//! - [`Error`] - the crate-level union returned by the top-level entry points
//!
//! An already existing target file is not an error: it is how regeneration skips
//! files it must not touch.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::QualifiedName;

/// Failure to read or deserialize the input document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read.
    #[error("failed to read schema {path:?}: {source}")]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML for the raw schema model.
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid JSON for the raw schema model.
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural inconsistency in the raw definitions.
///
/// Resolution completes (or fails) before generation starts, so a schema that
/// raises this error never produces a partial output tree.
#[derive(Debug, Error)]
pub enum SchemaResolutionError {
    /// Two definitions share the same `(namespace, name)`.
    #[error("duplicate definition '{name}'")]
    Duplicate {
        /// The repeated qualified name.
        name: QualifiedName,
    },

    /// A member references a `(namespace, name)` absent from the input.
    #[error("'{owner}' member '{member}' references undeclared type '{target}'")]
    UnresolvedReference {
        /// Descriptor declaring the member.
        owner: QualifiedName,
        /// Field, operation or resource naming the reference.
        member: String,
        /// The reference as written.
        target: String,
    },

    /// A member references a descriptor of the wrong kind.
    #[error("'{owner}' member '{member}' references {found} '{target}', expected {expected}")]
    InvalidReference {
        /// Descriptor declaring the member.
        owner: QualifiedName,
        /// Field, operation or resource naming the reference.
        member: String,
        /// The referenced descriptor.
        target: QualifiedName,
        /// Kind the member requires.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },

    /// A namespace, type name or reference is not a valid identifier path.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The offending text.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A primitive type name is not part of the supported catalogue.
    #[error("'{owner}' field '{field}' uses unknown primitive type '{type_name}'")]
    UnknownPrimitive {
        /// Descriptor declaring the field.
        owner: QualifiedName,
        /// Field name.
        field: String,
        /// Unrecognised type name.
        type_name: String,
    },

    /// A collection field name cannot be singularised without an explicit override.
    #[error("'{owner}' field '{field}' needs an explicit `singular` override")]
    SingularOverrideRequired {
        /// Descriptor declaring the field.
        owner: QualifiedName,
        /// Field name.
        field: String,
    },

    /// A subresource was given to a verb that does not route to one, or omitted
    /// from a verb that must.
    #[error("'{owner}' operation '{verb}' {problem}")]
    SubresourceMismatch {
        /// Client declaring the operation.
        owner: QualifiedName,
        /// Verb of the operation.
        verb: String,
        /// Description of the mismatch.
        problem: &'static str,
    },

    /// Two members of one descriptor collide (field names, builder methods,
    /// operation methods or constant names).
    #[error("'{owner}' declares '{member}' more than once")]
    DuplicateMember {
        /// Descriptor declaring the members.
        owner: QualifiedName,
        /// The colliding member name.
        member: String,
    },

    /// Two entries of one namespace's module index would share a name: a type,
    /// the module holding a type, or a child namespace.
    #[error("namespace '{namespace}' would declare '{item}' twice in its module index")]
    ModuleCollision {
        /// Namespace whose index collides.
        namespace: String,
        /// The colliding item name.
        item: String,
    },
}

/// Failure to render a named template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template catalogue has no template with this name.
    #[error("template '{name}' not found")]
    TemplateNotFound {
        /// Requested template name.
        name: String,
    },

    /// The template failed to compile or evaluate.
    #[error("template '{name}' failed: {source}")]
    Template {
        /// Template name.
        name: String,
        /// Engine error.
        #[source]
        source: minijinja::Error,
    },
}

/// Failure to emit one file: a descriptor's, or a namespace's module index.
///
/// Each file fails independently; files already written are kept. For a
/// module index `descriptor` is the namespace, see
/// [`QualifiedName::of_namespace`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The descriptor's template is missing from the catalogue.
    #[error("{descriptor}: template '{template}' not found")]
    TemplateNotFound {
        /// Descriptor being generated.
        descriptor: QualifiedName,
        /// Missing template name.
        template: String,
    },

    /// The descriptor's template failed to evaluate.
    #[error("{descriptor}: {source}")]
    Render {
        /// Descriptor being generated.
        descriptor: QualifiedName,
        /// Render failure.
        #[source]
        source: RenderError,
    },

    /// Directory creation or file write failed.
    #[error("{descriptor}: file system error at {path:?}: {source}")]
    FileSystem {
        /// Descriptor being generated.
        descriptor: QualifiedName,
        /// Path being created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Wraps a render failure for `descriptor`, keeping missing templates distinguishable.
    pub fn from_render(descriptor: &QualifiedName, error: RenderError) -> Self {
        match error {
            RenderError::TemplateNotFound { name } => Self::TemplateNotFound {
                descriptor: descriptor.clone(),
                template: name,
            },
            other => Self::Render {
                descriptor: descriptor.clone(),
                source: other,
            },
        }
    }

    /// Descriptor the failure belongs to.
    #[must_use]
    pub fn descriptor(&self) -> &QualifiedName {
        match self {
            Self::TemplateNotFound { descriptor, .. }
            | Self::Render { descriptor, .. }
            | Self::FileSystem { descriptor, .. } => descriptor,
        }
    }
}

/// Crate-level error returned by the top-level entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input document failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The input document is inconsistent.
    #[error(transparent)]
    Schema(#[from] SchemaResolutionError),

    /// The template catalogue could not be built.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A template override directory could not be read.
    #[error("failed to read templates from {path:?}: {source}")]
    Templates {
        /// Directory or file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The parallel worker pool could not be started.
    #[error("failed to start generation workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// One or more files failed to generate.
    #[error("{} file(s) failed to generate:\n{}", .failures.len(), summarize(.failures))]
    Generation {
        /// Every per-file failure of the run.
        failures: Vec<GenerateError>,
    },
}

fn summarize(failures: &[GenerateError]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
