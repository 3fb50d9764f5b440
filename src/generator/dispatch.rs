use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use super::emit::{generator_for, EmitContext, Emission, Generator, ModuleIndexGenerator};
use super::index::{module_indexes, ModuleIndex};
use super::observer::GenerationObserver;
use super::path::{PathMapper, DEFAULT_EXTENSION};
use super::templates::TemplateRenderer;
use crate::error::{Error, GenerateError};
use crate::schema::SchemaGraph;

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Worker threads; `1` generates sequentially on the calling thread.
    pub jobs: usize,
    /// Extension of every generated file.
    pub extension: String,
    /// Also write a `mod.rs` index for every namespace directory.
    pub module_index: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            extension: DEFAULT_EXTENSION.to_string(),
            module_index: true,
        }
    }
}

/// Outcome of a whole run. Paths are listed in descriptor order, followed by
/// the module indexes.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<GenerateError>,
}

impl GenerationReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn a report with failures into [`Error::Generation`].
    ///
    /// # Errors
    ///
    /// Returns every accumulated failure when at least one file failed.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::Generation {
                failures: self.failures,
            })
        }
    }

    fn record(&mut self, outcome: Result<Emission, GenerateError>) {
        match outcome {
            Ok(Emission::Written(path)) => self.written.push(path),
            Ok(Emission::Skipped(path)) => self.skipped.push(path),
            Err(err) => self.failures.push(err),
        }
    }
}

/// Generate one file per descriptor of `graph` under `root`, plus a `mod.rs`
/// per namespace directory when `options.module_index` is set.
///
/// Every descriptor is visited exactly once. A failing descriptor does not stop
/// the others: missing templates and file-system errors are collected in the
/// returned report. With `options.jobs > 1` files are generated on a
/// dedicated rayon pool; the resulting tree is the same as a sequential run.
///
/// # Errors
///
/// Only [`Error::ThreadPool`] when the worker pool cannot be started.
pub fn generate(
    graph: &SchemaGraph,
    root: &Path,
    renderer: &TemplateRenderer,
    options: &GenerateOptions,
    observer: &dyn GenerationObserver,
) -> Result<GenerationReport, Error> {
    let paths = PathMapper::new(options.extension.clone());
    let ctx = EmitContext {
        renderer,
        paths: &paths,
        observer,
    };
    let indexes = if options.module_index {
        module_indexes(graph)
    } else {
        Vec::new()
    };
    let generators: Vec<Box<dyn Generator + '_>> = graph
        .iter()
        .map(generator_for)
        .chain(
            indexes
                .iter()
                .map(|index| index_generator(index, paths.extension())),
        )
        .collect();
    let emit_one = |generator: &dyn Generator| generator.write_to(root, &ctx);

    let outcomes: Vec<_> = if options.jobs > 1 {
        debug!(jobs = options.jobs, files = generators.len(), "generating in parallel");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .thread_name(|i| format!("kubegen-worker-{i}"))
            .build()?;
        pool.install(|| generators.par_iter().map(|g| emit_one(g.as_ref())).collect())
    } else {
        generators.iter().map(|g| emit_one(g.as_ref())).collect()
    };

    let mut report = GenerationReport::default();
    for outcome in outcomes {
        report.record(outcome);
    }
    info!(
        root = %root.display(),
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "generation finished"
    );
    Ok(report)
}

fn index_generator<'a>(index: &'a ModuleIndex, extension: &'a str) -> Box<dyn Generator + 'a> {
    Box::new(ModuleIndexGenerator::new(index, extension))
}
