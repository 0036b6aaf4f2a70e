//! Reading documents from disk into records
//!
//! The loader is the glue between the filesystem and the (I/O-free) parser:
//! it reads each file, checks it against the configured size limit, and
//! hands `(text, path)` to [`FrontmatterParser`].

use crate::core::{FrontmatterParser, Record};
use crate::error::{MatterQError, Result};
use crate::io::resolver::DocumentResolver;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Configuration for the document loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
    /// Skip files that cannot be read instead of failing the whole batch
    pub skip_unreadable: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            skip_unreadable: true,
        }
    }
}

/// Loads documents and parses their front matter
pub struct DocumentLoader {
    config: LoaderConfig,
    parser: FrontmatterParser,
}

impl DocumentLoader {
    /// Create a new loader with default configuration
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a new loader with custom configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            parser: FrontmatterParser::new(),
        }
    }

    /// Read and parse a single document
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Record> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(MatterQError::file_not_found(path));
        }

        if let Some(limit) = self.config.max_file_size {
            let size = fs::metadata(path)?.len();
            if size > limit {
                return Err(MatterQError::file_too_large(path, size, limit));
            }
        }

        let content = fs::read_to_string(path)?;
        Ok(self.parser.parse(&content, &path.to_string_lossy()))
    }

    /// Read and parse many documents, keeping their order
    pub fn load_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            match self.load_file(path) {
                Ok(record) => records.push(record),
                Err(e) if self.config.skip_unreadable && e.is_recoverable() => {
                    warn!("skipping {}: {}", path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("loaded {} of {} documents", records.len(), paths.len());
        Ok(records)
    }

    /// Resolve paths with `resolver` and load every document found
    pub fn load_paths<P: AsRef<Path>>(
        &self,
        resolver: &DocumentResolver,
        paths: &[P],
    ) -> Result<Vec<Record>> {
        let files = resolver.resolve(paths)?;
        self.load_files(&files)
    }

    /// Get the loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
