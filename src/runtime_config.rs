//! # Runtime Configuration Module
//!
//! Environment-based defaults for generation runs. Command-line flags always
//! take precedence over these values.
//!
//! ## Environment Variables
//!
//! ### `KUBEGEN_JOBS`
//!
//! Number of worker threads used to generate descriptors in parallel.
//! Values that are not a positive integer fall back to the default.
//!
//! Default: `1` (sequential, on the calling thread)
//!
//! Parallel runs produce the same tree as sequential ones: every target is
//! created with an exclusive open, so there is no ordering to preserve.
//!
//! ### `KUBEGEN_TEMPLATES`
//!
//! Directory of template overrides. Each file replaces (or adds) the template
//! named after its file stem, e.g. `value_object.rs.j2`.
//!
//! Default: unset (built-in templates only)
//!
//! ## Usage
//!
//! ```rust
//! use kubegen::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Jobs: {}", config.jobs);
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export KUBEGEN_JOBS=8
//! export KUBEGEN_TEMPLATES=./templates
//! kubegen generate --schema api.yaml --output src/generated
//! ```

use std::env;
use std::path::PathBuf;

/// Default number of generation workers.
pub const DEFAULT_JOBS: usize = 1;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads for generation (default: 1)
    pub jobs: usize,
    /// Template override directory
    pub templates: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            templates: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let jobs = lookup("KUBEGEN_JOBS")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .filter(|&jobs| jobs > 0)
            .unwrap_or(DEFAULT_JOBS);
        let templates = lookup("KUBEGEN_TEMPLATES")
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);
        Self { jobs, templates }
    }
}
