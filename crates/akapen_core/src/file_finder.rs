//! Input file discovery.

use std::path::{Path, PathBuf};

use akapen_parser::DocumentFormat;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::LinterError;

/// Resolves command line inputs to the files to lint.
///
/// An input naming a file is taken as is, an input naming a directory
/// yields every file below it with a known document extension, and any
/// other input is a glob matched while walking the base directory.
/// The configured include and exclude patterns apply to all of them.
#[derive(Debug)]
pub struct FileFinder {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileFinder {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, LinterError> {
        Ok(Self {
            include: build_globset(include)?,
            exclude: build_globset(exclude)?,
        })
    }

    /// Returns whether a path is filtered out by include/exclude patterns.
    ///
    /// Exclusion wins over inclusion.
    pub fn is_filtered(&self, path: &Path) -> bool {
        if self.exclude.as_ref().is_some_and(|set| set.is_match(path)) {
            return true;
        }
        self.include.as_ref().is_some_and(|set| !set.is_match(path))
    }

    /// Discovers files for `inputs`, relative to `base_dir`.
    ///
    /// The result is sorted and free of duplicates.
    pub fn discover(&self, inputs: &[String], base_dir: &Path) -> Result<Vec<PathBuf>, LinterError> {
        let mut files = Vec::new();
        let mut globs = GlobSetBuilder::new();
        let mut has_globs = false;

        for input in inputs {
            let path = Path::new(input);
            match path.symlink_metadata() {
                Ok(meta) if meta.is_file() => {
                    let path = path.canonicalize()?;
                    if !self.is_filtered(&path) {
                        files.push(path);
                    }
                }
                Ok(meta) if meta.is_dir() => {
                    debug!("Walking directory {}", path.display());
                    files.extend(
                        self.walk(path)
                            .filter(|file| DocumentFormat::from_path(file).is_some()),
                    );
                }
                _ => {
                    let glob = Glob::new(input).map_err(|e| {
                        LinterError::config(format!("Invalid pattern '{}': {}", input, e))
                    })?;
                    globs.add(glob);
                    has_globs = true;
                }
            }
        }

        if has_globs {
            let globs = globs
                .build()
                .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;
            files.extend(self.walk(base_dir).filter(|file| globs.is_match(file)));
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }

    fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(move |path| !self.is_filtered(path))
    }
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;
    Ok(Some(globset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_globset() {
        assert!(build_globset(&strings(&["**/*.md", "*.txt"])).unwrap().is_some());
        assert!(build_globset(&[]).unwrap().is_none());
        assert!(build_globset(&strings(&["[invalid"])).is_err());
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let finder = FileFinder::new(&strings(&["**/*.md"]), &strings(&["**/drafts/**"])).unwrap();
        assert!(!finder.is_filtered(Path::new("docs/guide.md")));
        assert!(finder.is_filtered(Path::new("docs/drafts/guide.md")));
        assert!(finder.is_filtered(Path::new("docs/guide.rst")));
    }

    #[test]
    fn test_discover_glob_respects_filters() {
        let dir = tempdir().unwrap();
        let drafts = dir.path().join("drafts");
        fs::create_dir(&drafts).unwrap();
        fs::write(dir.path().join("guide.md"), "# Guide").unwrap();
        fs::write(drafts.join("draft.md"), "# Draft").unwrap();
        fs::write(dir.path().join("notes.txt"), "Notes.").unwrap();

        let finder = FileFinder::new(&[], &strings(&["**/drafts/**"])).unwrap();
        let files = finder.discover(&strings(&["**/*.md"]), dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("guide.md"));
    }

    #[test]
    fn test_discover_directory_keeps_known_formats() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# A").unwrap();
        fs::write(dir.path().join("b.rst"), "B").unwrap();
        fs::write(dir.path().join("c.png"), "binary").unwrap();

        let finder = FileFinder::new(&[], &[]).unwrap();
        let input = dir.path().to_string_lossy().to_string();
        let files = finder.discover(&[input], Path::new(".")).unwrap();

        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.rst"]);
    }

    #[test]
    fn test_discover_explicit_file_deduplicates() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "# A").unwrap();

        let finder = FileFinder::new(&[], &[]).unwrap();
        let input = file.to_string_lossy().to_string();
        let files = finder
            .discover(&[input.clone(), input], Path::new("."))
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_invalid_glob() {
        let finder = FileFinder::new(&[], &[]).unwrap();
        let result = finder.discover(&strings(&["[invalid-glob"]), Path::new("."));
        assert!(matches!(result, Err(LinterError::Config(_))));
    }
}
