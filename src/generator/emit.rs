//! The emission contract shared by every descriptor kind.
//!
//! Each descriptor kind, and the module index of a namespace, gets a small
//! [`Generator`] that knows its template and how to bind its view model.
//! Writing is implemented once, in [`Generator::write_to`]:
//!
//! 1. map the qualified name to a path under the output root
//! 2. create missing parent directories
//! 3. open the target with `create_new`; an existing file is skipped untouched
//! 4. render and write the full text
//!
//! Step 3 is a single exclusive-create call, so two writers racing on the same
//! path cannot both succeed and neither can truncate the other's output.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::index::ModuleIndex;
use super::model::{ClientInterfaceView, EnumConstantView, ModuleIndexView, ValueObjectView};
use super::observer::GenerationObserver;
use super::path::PathMapper;
use super::templates::{
    TemplateRenderer, CLIENT_INTERFACE_TEMPLATE, ENUM_CONSTANT_TEMPLATE, MODULE_INDEX_TEMPLATE,
    VALUE_OBJECT_TEMPLATE,
};
use crate::error::{GenerateError, RenderError};
use crate::schema::{
    Constant, DescriptorKind, Field, GroupVersionKind, Operation, QualifiedName, TypeDescriptor,
};

/// Collaborators borrowed by every emission of a run.
#[derive(Clone, Copy)]
pub struct EmitContext<'a> {
    pub renderer: &'a TemplateRenderer,
    pub paths: &'a PathMapper,
    pub observer: &'a dyn GenerationObserver,
}

/// What happened to one descriptor's target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// The file did not exist and was created.
    Written(PathBuf),
    /// The file already existed and was left as is.
    Skipped(PathBuf),
}

impl Emission {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Emission::Written(path) | Emission::Skipped(path) => path,
        }
    }
}

/// Renders one unit of the output tree into one file.
pub trait Generator: Send + Sync {
    /// Name reported to the observer and carried by errors.
    fn qualified_name(&self) -> &QualifiedName;

    /// Template used when there is no override.
    fn default_template(&self) -> &'static str;

    fn template_name(&self) -> &str {
        self.default_template()
    }

    /// Path of the generated file relative to the output root.
    fn target(&self, paths: &PathMapper) -> PathBuf {
        paths.to_path(self.qualified_name())
    }

    /// Render the template with this unit's view model.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError`] from the renderer.
    fn render(&self, renderer: &TemplateRenderer) -> Result<String, RenderError>;

    /// Emit the file under `root`, reporting the outcome to the
    /// context's observer.
    ///
    /// # Errors
    ///
    /// [`GenerateError::TemplateNotFound`] or [`GenerateError::Render`] when the
    /// template is missing or fails, [`GenerateError::FileSystem`] when a
    /// directory or the file cannot be created or written. A target that
    /// already exists is reported as [`Emission::Skipped`], never as an error.
    fn write_to(&self, root: &Path, ctx: &EmitContext<'_>) -> Result<Emission, GenerateError> {
        let name = self.qualified_name();
        let path = root.join(self.target(ctx.paths));
        let result = emit(self, &path, ctx.renderer);
        match &result {
            Ok(Emission::Written(path)) => ctx.observer.written(name, path),
            Ok(Emission::Skipped(path)) => ctx.observer.skipped(name, path),
            Err(err) => ctx.observer.failed(err, &path),
        }
        result
    }
}

fn emit<G: Generator + ?Sized>(
    generator: &G,
    path: &Path,
    renderer: &TemplateRenderer,
) -> Result<Emission, GenerateError> {
    let name = generator.qualified_name();
    let fs_error = |at: &Path| {
        let at = at.to_path_buf();
        move |source: io::Error| GenerateError::FileSystem {
            descriptor: name.clone(),
            path: at,
            source,
        }
    };

    if let Some(parent) = path.parent() {
        // create_dir_all treats a directory created concurrently as success.
        fs::create_dir_all(parent).map_err(fs_error(parent))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(Emission::Skipped(path.to_path_buf()));
        }
        Err(err) => return Err(fs_error(path)(err)),
    };

    let written = generator
        .render(renderer)
        .map_err(|err| GenerateError::from_render(name, err))
        .and_then(|text| {
            file.write_all(text.as_bytes())
                .and_then(|()| file.flush())
                .map_err(fs_error(path))
        });

    if let Err(err) = written {
        drop(file);
        // Leave no partial file behind so the next run regenerates it.
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
        }
        return Err(err);
    }
    Ok(Emission::Written(path.to_path_buf()))
}

/// The descriptor's own template override, else `default`.
fn descriptor_template<'a>(descriptor: &'a TypeDescriptor, default: &'static str) -> &'a str {
    descriptor.template.as_deref().unwrap_or(default)
}

/// Generator for [`DescriptorKind::ValueObject`].
#[derive(Debug, Clone, Copy)]
pub struct ValueObjectGenerator<'a> {
    descriptor: &'a TypeDescriptor,
    fields: &'a [Field],
    group_version_kind: Option<&'a GroupVersionKind>,
}

impl Generator for ValueObjectGenerator<'_> {
    fn qualified_name(&self) -> &QualifiedName {
        &self.descriptor.qualified_name
    }

    fn default_template(&self) -> &'static str {
        VALUE_OBJECT_TEMPLATE
    }

    fn template_name(&self) -> &str {
        descriptor_template(self.descriptor, VALUE_OBJECT_TEMPLATE)
    }

    fn render(&self, renderer: &TemplateRenderer) -> Result<String, RenderError> {
        let view = ValueObjectView::new(self.descriptor, self.fields, self.group_version_kind);
        renderer.render(self.template_name(), &view)
    }
}

/// Generator for [`DescriptorKind::ClientInterface`].
#[derive(Debug, Clone, Copy)]
pub struct ClientInterfaceGenerator<'a> {
    descriptor: &'a TypeDescriptor,
    resource: &'a QualifiedName,
    operations: &'a [Operation],
}

impl Generator for ClientInterfaceGenerator<'_> {
    fn qualified_name(&self) -> &QualifiedName {
        &self.descriptor.qualified_name
    }

    fn default_template(&self) -> &'static str {
        CLIENT_INTERFACE_TEMPLATE
    }

    fn template_name(&self) -> &str {
        descriptor_template(self.descriptor, CLIENT_INTERFACE_TEMPLATE)
    }

    fn render(&self, renderer: &TemplateRenderer) -> Result<String, RenderError> {
        let view = ClientInterfaceView::new(self.descriptor, self.resource, self.operations);
        renderer.render(self.template_name(), &view)
    }
}

/// Generator for [`DescriptorKind::EnumConstant`].
#[derive(Debug, Clone, Copy)]
pub struct EnumConstantGenerator<'a> {
    descriptor: &'a TypeDescriptor,
    constants: &'a [Constant],
}

impl Generator for EnumConstantGenerator<'_> {
    fn qualified_name(&self) -> &QualifiedName {
        &self.descriptor.qualified_name
    }

    fn default_template(&self) -> &'static str {
        ENUM_CONSTANT_TEMPLATE
    }

    fn template_name(&self) -> &str {
        descriptor_template(self.descriptor, ENUM_CONSTANT_TEMPLATE)
    }

    fn render(&self, renderer: &TemplateRenderer) -> Result<String, RenderError> {
        let view = EnumConstantView::new(self.descriptor, self.constants);
        renderer.render(self.template_name(), &view)
    }
}

/// Select the generator for a descriptor's kind.
#[must_use]
pub fn generator_for(descriptor: &TypeDescriptor) -> Box<dyn Generator + '_> {
    match &descriptor.kind {
        DescriptorKind::ValueObject {
            fields,
            group_version_kind,
        } => Box::new(ValueObjectGenerator {
            descriptor,
            fields,
            group_version_kind: group_version_kind.as_ref(),
        }),
        DescriptorKind::ClientInterface {
            resource,
            operations,
        } => Box::new(ClientInterfaceGenerator {
            descriptor,
            resource,
            operations,
        }),
        DescriptorKind::EnumConstant { constants } => Box::new(EnumConstantGenerator {
            descriptor,
            constants,
        }),
    }
}

/// Generator for the `mod.rs` of one namespace directory.
#[derive(Debug, Clone, Copy)]
pub struct ModuleIndexGenerator<'a> {
    index: &'a ModuleIndex,
    extension: &'a str,
}

impl<'a> ModuleIndexGenerator<'a> {
    /// `extension` names the type files the index points at.
    #[must_use]
    pub fn new(index: &'a ModuleIndex, extension: &'a str) -> Self {
        Self { index, extension }
    }
}

impl Generator for ModuleIndexGenerator<'_> {
    fn qualified_name(&self) -> &QualifiedName {
        self.index.name()
    }

    fn default_template(&self) -> &'static str {
        MODULE_INDEX_TEMPLATE
    }

    fn target(&self, paths: &PathMapper) -> PathBuf {
        paths.index_path(self.index.namespace())
    }

    fn render(&self, renderer: &TemplateRenderer) -> Result<String, RenderError> {
        let view = ModuleIndexView::new(self.index, self.extension);
        renderer.render(self.template_name(), &view)
    }
}
