use std::path::Path;

use tracing::{debug, error, info};

use crate::error::GenerateError;
use crate::schema::QualifiedName;

/// Receives the outcome of every emission.
///
/// Dispatch calls exactly one method per descriptor. Implementations must be
/// thread-safe because parallel dispatch reports from worker threads.
pub trait GenerationObserver: Send + Sync {
    /// A new file was created at `path`.
    fn written(&self, descriptor: &QualifiedName, path: &Path);

    /// `path` already existed and was left untouched.
    fn skipped(&self, descriptor: &QualifiedName, path: &Path);

    /// Emission of the file at `path` failed.
    fn failed(&self, error: &GenerateError, path: &Path);
}

/// Logs every outcome through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GenerationObserver for TracingObserver {
    fn written(&self, descriptor: &QualifiedName, path: &Path) {
        info!(descriptor = %descriptor, path = %path.display(), "generated file");
    }

    fn skipped(&self, descriptor: &QualifiedName, path: &Path) {
        debug!(descriptor = %descriptor, path = %path.display(), "file exists, skipping");
    }

    fn failed(&self, error: &GenerateError, path: &Path) {
        error!(
            descriptor = %error.descriptor(),
            path = %path.display(),
            error = %error,
            "generation failed"
        );
    }
}

/// Discards every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GenerationObserver for NullObserver {
    fn written(&self, _: &QualifiedName, _: &Path) {}
    fn skipped(&self, _: &QualifiedName, _: &Path) {}
    fn failed(&self, _: &GenerateError, _: &Path) {}
}
