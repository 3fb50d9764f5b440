use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Error;
use crate::generator::dispatch::{generate, GenerateOptions, GenerationReport};
use crate::generator::emit::{generator_for, Generator, ModuleIndexGenerator};
use crate::generator::index::module_indexes;
use crate::generator::observer::GenerationObserver;
use crate::generator::path::PathMapper;
use crate::generator::templates::TemplateRenderer;
use crate::schema::{load_schema, resolve, KindTag, QualifiedName, SchemaGraph};

/// Load and resolve the schema document at `schema_path`.
///
/// # Errors
///
/// [`Error::Load`] when the document cannot be read or parsed,
/// [`Error::Schema`] when it does not resolve.
pub fn load_graph(schema_path: &Path) -> Result<SchemaGraph, Error> {
    let raw = load_schema(schema_path)?;
    Ok(resolve(&raw)?)
}

/// Build the renderer for a run: the built-in catalogue plus optional overrides.
///
/// # Errors
///
/// Fails when a template does not compile or the override directory cannot be read.
pub fn build_renderer(templates: Option<&Path>) -> Result<TemplateRenderer, Error> {
    let renderer = TemplateRenderer::builtin()?;
    match templates {
        Some(dir) => renderer.with_template_dir(dir),
        None => Ok(renderer),
    }
}

/// Generate the output tree for the schema document at `schema_path`.
///
/// The schema is resolved completely before anything touches `output`, so a
/// document with a dangling reference or duplicate name writes nothing.
///
/// # Arguments
///
/// * `schema_path` - YAML or JSON schema document
/// * `output` - Root of the generated tree, created if missing
/// * `templates` - Optional directory of template overrides
/// * `options` - Parallelism, file extension and module indexes
/// * `observer` - Receives every written, skipped and failed path
///
/// # Errors
///
/// Load and resolution errors abort the run. Per-descriptor failures are
/// collected and returned together as [`Error::Generation`].
pub fn generate_from_schema_file(
    schema_path: &Path,
    output: &Path,
    templates: Option<&Path>,
    options: &GenerateOptions,
    observer: &dyn GenerationObserver,
) -> Result<GenerationReport, Error> {
    let graph = load_graph(schema_path)?;
    let renderer = build_renderer(templates)?;
    info!(
        schema = %schema_path.display(),
        output = %output.display(),
        descriptors = graph.len(),
        "generating"
    );
    generate(&graph, output, &renderer, options, observer)?.into_result()
}

/// One entry of a generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub descriptor: QualifiedName,
    pub kind: &'static str,
    pub template: String,
    pub path: PathBuf,
}

/// Kind reported for a namespace's `mod.rs` in a plan.
pub const MODULE_INDEX_KIND: &str = "module index";

impl PlannedFile {
    fn of(generator: &dyn Generator, kind: &'static str, paths: &PathMapper) -> Self {
        Self {
            descriptor: generator.qualified_name().clone(),
            kind,
            template: generator.template_name().to_string(),
            path: generator.target(paths),
        }
    }
}

/// Describe every file [`generate`] would write with `options`, in the same
/// order, without writing.
#[must_use]
pub fn plan(graph: &SchemaGraph, options: &GenerateOptions) -> Vec<PlannedFile> {
    let paths = PathMapper::new(options.extension.clone());
    let mut planned: Vec<PlannedFile> = graph
        .iter()
        .map(|descriptor| {
            let kind = descriptor.kind.tag().as_str();
            PlannedFile::of(generator_for(descriptor).as_ref(), kind, &paths)
        })
        .collect();
    if options.module_index {
        for index in module_indexes(graph) {
            let generator = ModuleIndexGenerator::new(&index, paths.extension());
            planned.push(PlannedFile::of(&generator, MODULE_INDEX_KIND, &paths));
        }
    }
    planned
}

/// Descriptor counts of a resolved graph, as reported by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub value_objects: usize,
    pub client_interfaces: usize,
    pub enum_constants: usize,
}

impl GraphSummary {
    #[must_use]
    pub fn of(graph: &SchemaGraph) -> Self {
        Self {
            value_objects: graph.count(KindTag::ValueObject),
            client_interfaces: graph.count(KindTag::ClientInterface),
            enum_constants: graph.count(KindTag::EnumConstant),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.value_objects + self.client_interfaces + self.enum_constants
    }
}
