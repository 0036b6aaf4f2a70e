//! Turning command-line paths into a list of documents
//!
//! Directories are walked recursively and filtered by extension; files named
//! explicitly are always taken. The result is sorted and free of duplicates
//! so repeated runs see documents in the same order.

use crate::error::{MatterQError, Result};
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for document discovery
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links while walking directories
    pub follow_links: bool,
    /// Maximum recursion depth for directory traversal
    pub max_depth: Option<usize>,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
    /// Extensions picked up from directories, lowercase, without the dot
    pub extensions: Vec<String>,
    /// Glob-style patterns (`*`, `?`) matched against the full path
    pub exclude_patterns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
            include_hidden: false,
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude_patterns: Vec::new(),
        }
    }
}

/// Expands files and directories into document paths
pub struct DocumentResolver {
    config: ResolverConfig,
    excludes: Vec<Regex>,
}

impl DocumentResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            excludes: Vec::new(),
        }
    }

    /// Create a new resolver with custom configuration
    ///
    /// Fails if an exclude pattern does not translate to a valid regex.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let excludes = config
            .exclude_patterns
            .iter()
            .map(|pattern| glob_to_regex(pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { config, excludes })
    }

    /// Resolve multiple paths to a sorted list of documents
    pub fn resolve<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut documents = Vec::new();

        for path in paths {
            for file in self.resolve_single(path.as_ref())? {
                if self.is_excluded(&file) {
                    continue;
                }
                if seen.insert(file.clone()) {
                    documents.push(file);
                }
            }
        }

        documents.sort();
        debug!("resolved {} documents", documents.len());
        Ok(documents)
    }

    fn resolve_single(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            Ok(vec![path.to_path_buf()])
        } else if path.is_dir() {
            self.walk(path)
        } else {
            Err(MatterQError::file_not_found(path))
        }
    }

    fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || self.config.include_hidden || !is_hidden(entry)
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                MatterQError::path_resolution(format!("error walking {}: {}", dir.display(), e))
            })?;
            if entry.file_type().is_file() && self.has_wanted_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.config.extensions.iter().any(|wanted| *wanted == ext)
            })
            .unwrap_or(false)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.excludes.iter().any(|re| re.is_match(&path))
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl Default for DocumentResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Translate a `*`/`?` glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Ok(Regex::new(&re)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_vault(dir: &Path) -> Result<()> {
        fs::write(dir.join("dune.md"), "# Dune")?;
        fs::write(dir.join("serial.markdown"), "# Serial")?;
        fs::write(dir.join("readme.txt"), "not a note")?;
        fs::write(dir.join(".draft.md"), "# Draft")?;

        let books = dir.join("books");
        fs::create_dir(&books)?;
        fs::write(books.join("hyperion.md"), "# Hyperion")?;

        let hidden = dir.join(".obsidian");
        fs::create_dir(&hidden)?;
        fs::write(hidden.join("workspace.md"), "# internal")?;
        Ok(())
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_resolve_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let resolved = DocumentResolver::new().resolve(&[temp_dir.path()]).unwrap();
        let names = names(&resolved);
        assert_eq!(resolved.len(), 3);
        assert!(names.contains(&"dune.md".to_string()));
        assert!(names.contains(&"serial.markdown".to_string()));
        assert!(names.contains(&"hyperion.md".to_string()));
    }

    #[test]
    fn test_results_are_sorted() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let resolved = DocumentResolver::new().resolve(&[temp_dir.path()]).unwrap();
        let mut sorted = resolved.clone();
        sorted.sort();
        assert_eq!(resolved, sorted);
    }

    #[test]
    fn test_include_hidden() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let config = ResolverConfig {
            include_hidden: true,
            ..Default::default()
        };
        let resolved = DocumentResolver::with_config(config)
            .unwrap()
            .resolve(&[temp_dir.path()])
            .unwrap();
        let names = names(&resolved);
        assert_eq!(resolved.len(), 5);
        assert!(names.contains(&".draft.md".to_string()));
        assert!(names.contains(&"workspace.md".to_string()));
    }

    #[test]
    fn test_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let config = ResolverConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let resolved = DocumentResolver::with_config(config)
            .unwrap()
            .resolve(&[temp_dir.path()])
            .unwrap();
        assert!(!names(&resolved).contains(&"hyperion.md".to_string()));
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_exclude_patterns() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let config = ResolverConfig {
            exclude_patterns: vec!["*/books/*".to_string()],
            ..Default::default()
        };
        let resolved = DocumentResolver::with_config(config)
            .unwrap()
            .resolve(&[temp_dir.path()])
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(!names(&resolved).contains(&"hyperion.md".to_string()));
    }

    #[test]
    fn test_explicit_file_ignores_extension_filter() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();
        let txt = temp_dir.path().join("readme.txt");

        let resolved = DocumentResolver::new().resolve(&[&txt, &txt]).unwrap();
        assert_eq!(resolved, vec![txt]);
    }

    #[test]
    fn test_nonexistent_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.md");

        let result = DocumentResolver::new().resolve(&[&missing]);
        assert!(matches!(result, Err(MatterQError::FileNotFound { .. })));
    }

    #[test]
    fn test_glob_to_regex() {
        let re = glob_to_regex("*.draft.md").unwrap();
        assert!(re.is_match("notes/a.draft.md"));
        assert!(!re.is_match("notes/a_draft.md"));
        assert!(glob_to_regex("note?.md").unwrap().is_match("note1.md"));
    }
}
