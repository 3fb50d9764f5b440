//! # CLI Module
//!
//! Command-line interface for the `kubegen` generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate one file per definition into an output tree:
//!
//! ```bash
//! kubegen generate --schema api.yaml --output src/generated
//! ```
//!
//! Options:
//! - `--schema <FILE>` - Schema document, YAML or JSON (required)
//! - `--output <DIR>` - Root of the generated tree (required)
//! - `--templates <DIR>` - Template overrides, by file stem
//! - `--jobs <N>` - Worker threads (default: `KUBEGEN_JOBS`, else 1)
//! - `--extension <EXT>` - File extension (default: `rs`)
//!
//! Existing files are skipped, never overwritten. Delete a file to regenerate it.
//!
//! ### `validate`
//!
//! Resolve the schema and report its definitions:
//!
//! ```bash
//! kubegen validate --schema api.yaml
//! ```
//!
//! ### `plan`
//!
//! Print the target path of every definition without writing:
//!
//! ```bash
//! kubegen plan --schema api.yaml --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use kubegen::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
