use std::path::PathBuf;

use crate::schema::QualifiedName;

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "rs";

/// File stem of a namespace's module index.
pub const MODULE_INDEX_STEM: &str = "mod";

/// Maps qualified names to output paths relative to the output root.
///
/// Every namespace segment becomes a directory and the name becomes the file
/// stem: `io.x.v1.Widget` maps to `io/x/v1/Widget.rs`. Segments and names are
/// identifiers, so no two distinct names share a path. Type names are never
/// keywords, so no type lands on a namespace's `mod.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    extension: String,
}

impl Default for PathMapper {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl PathMapper {
    /// A leading dot in `extension` is ignored.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = extension
            .strip_prefix('.')
            .map(str::to_string)
            .unwrap_or(extension);
        Self { extension }
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Relative path of the file generated for `name`.
    #[must_use]
    pub fn to_path(&self, name: &QualifiedName) -> PathBuf {
        let mut path: PathBuf = name.segments().collect();
        path.push(format!("{}.{}", name.name(), self.extension));
        path
    }

    /// Relative path of the module index of `namespace`; the empty namespace
    /// maps to the index at the output root.
    #[must_use]
    pub fn index_path(&self, namespace: &str) -> PathBuf {
        let mut path: PathBuf = namespace.split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{MODULE_INDEX_STEM}.{}", self.extension));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_namespace_segments_become_directories() {
        let mapper = PathMapper::default();
        let path = mapper.to_path(&QualifiedName::new("io.x.v1", "Widget"));
        assert_eq!(path, Path::new("io").join("x").join("v1").join("Widget.rs"));
    }

    #[test]
    fn test_single_segment_namespace() {
        let mapper = PathMapper::new(".java");
        assert_eq!(mapper.extension(), "java");
        let path = mapper.to_path(&QualifiedName::new("core", "Pod"));
        assert_eq!(path, Path::new("core").join("Pod.java"));
    }

    #[test]
    fn test_index_paths() {
        let mapper = PathMapper::default();
        assert_eq!(mapper.index_path(""), Path::new("mod.rs"));
        assert_eq!(
            mapper.index_path("io.x.v1"),
            Path::new("io").join("x").join("v1").join("mod.rs")
        );
        assert_ne!(
            mapper.index_path("io.x.v1"),
            mapper.to_path(&QualifiedName::new("io.x", "v1"))
        );
    }

    #[test]
    fn test_distinct_names_distinct_paths() {
        let mapper = PathMapper::default();
        let a = mapper.to_path(&QualifiedName::new("io.x", "v1"));
        let b = mapper.to_path(&QualifiedName::new("io.x.v1", "Widget"));
        let c = mapper.to_path(&QualifiedName::new("io", "x"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, Path::new("io").join("x").join("v1.rs"));
    }
}
