//! Name-addressable template catalogue backed by minijinja.
//!
//! The renderer is built once per run and only ever borrowed afterwards:
//! [`TemplateRenderer::render`] takes `&self`, so the same `(name, model)`
//! pair always yields the same text and the renderer can be shared across
//! worker threads.

use std::fs;
use std::path::Path;

use heck::{ToSnakeCase, ToUpperCamelCase};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, RenderError};
use crate::schema::naming::wrap_lines;

/// Template for value objects.
pub const VALUE_OBJECT_TEMPLATE: &str = "value_object";
/// Template for client interfaces.
pub const CLIENT_INTERFACE_TEMPLATE: &str = "client_interface";
/// Template for enumerated constants.
pub const ENUM_CONSTANT_TEMPLATE: &str = "enum_constant";
/// Template for a namespace's module index.
pub const MODULE_INDEX_TEMPLATE: &str = "module_index";

const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    (
        VALUE_OBJECT_TEMPLATE,
        include_str!("../../templates/value_object.rs.j2"),
    ),
    (
        CLIENT_INTERFACE_TEMPLATE,
        include_str!("../../templates/client_interface.rs.j2"),
    ),
    (
        ENUM_CONSTANT_TEMPLATE,
        include_str!("../../templates/enum_constant.rs.j2"),
    ),
    (
        MODULE_INDEX_TEMPLATE,
        include_str!("../../templates/module_index.rs.j2"),
    ),
];

/// Column at which `doc_lines` wraps descriptions.
const DOC_WIDTH: usize = 100;

/// Renders named templates against serializable view models.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// A renderer with no templates registered.
    #[must_use]
    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_filter("doc_lines", doc_lines);
        env.add_filter("snake", snake);
        env.add_filter("pascal", pascal);
        Self { env }
    }

    /// A renderer holding the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if a built-in template fails to compile.
    pub fn builtin() -> Result<Self, RenderError> {
        let mut renderer = Self::empty();
        for (name, source) in BUILTIN_TEMPLATES {
            renderer
                .env
                .add_template(name, source)
                .map_err(|source| RenderError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(renderer)
    }

    /// Register (or replace) a template from source text.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if the source does not compile.
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|source| RenderError::Template { name, source })?;
        Ok(self)
    }

    /// Register every file in `dir` as a template named after its file stem.
    ///
    /// `dir/value_object.rs.j2` replaces the built-in `value_object` template;
    /// files with other stems add new names that descriptors can select through
    /// their `template` override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Templates`] if the directory or one of its files cannot
    /// be read, and [`Error::Render`] if a template does not compile.
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self, Error> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| Error::Templates { path, source }
        };
        let mut entries = fs::read_dir(dir)
            .map_err(io_err(dir))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err(dir))?;
        entries.sort();

        for path in entries.into_iter().filter(|p| p.is_file()) {
            let Some(name) = template_name(&path) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(io_err(&path))?;
            debug!(template = %name, path = %path.display(), "registered template override");
            self = self.with_template(name, source)?;
        }
        Ok(self)
    }

    /// Whether a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render template `name` with `model` as its context.
    ///
    /// # Errors
    ///
    /// [`RenderError::TemplateNotFound`] when the catalogue has no such name,
    /// [`RenderError::Template`] when evaluation fails.
    pub fn render<S: Serialize>(&self, name: &str, model: &S) -> Result<String, RenderError> {
        let template = self.env.get_template(name).map_err(|err| {
            if err.kind() == ErrorKind::TemplateNotFound {
                RenderError::TemplateNotFound {
                    name: name.to_string(),
                }
            } else {
                RenderError::Template {
                    name: name.to_string(),
                    source: err,
                }
            }
        })?;
        template.render(model).map_err(|source| RenderError::Template {
            name: name.to_string(),
            source,
        })
    }
}

/// `value_object.rs.j2` → `value_object`. Hidden files are ignored.
fn template_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    let stem = file_name.split('.').next()?;
    (!stem.is_empty()).then(|| stem.to_string())
}

fn snake(value: String) -> String {
    value.to_snake_case()
}

fn pascal(value: String) -> String {
    value.to_upper_camel_case()
}

/// Wrap an optional description into doc-comment lines.
fn doc_lines(text: Option<String>, width: Option<usize>) -> Vec<String> {
    text.map(|t| wrap_lines(&t, width.unwrap_or(DOC_WIDTH)))
        .unwrap_or_default()
}
