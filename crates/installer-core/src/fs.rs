//! Filesystem primitives behind an injectable capability
//!
//! Higher-level logic (notably `DatabaseConfigurator`) takes a `FileManager`
//! rather than touching `std::fs` directly so it can be exercised against an
//! in-memory implementation. Nothing here caches: every substitution re-reads
//! from disk, so back-to-back mutations on the same file must be sequenced by
//! the caller.

use crate::error::Error;
use regex::Regex;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

pub trait FileManager {
    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn delete(&self, path: &Path) -> Result<()>;

    fn copy(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Replace every occurrence of `search` with `replace`.
    fn replace(&self, path: &Path, search: &str, replace: &str) -> Result<()> {
        self.replace_each(path, &[(search, replace)])
    }

    /// Apply parallel-indexed substitutions in order: the nth search string
    /// maps to the nth replacement.
    fn replace_each(&self, path: &Path, pairs: &[(&str, &str)]) -> Result<()> {
        let mut contents = self.read(path)?;
        for (search, replace) in pairs {
            contents = contents.replace(search, replace);
        }
        self.write(path, &contents)
    }

    /// Apply a single regular-expression substitution across the full file.
    fn regex_replace(&self, path: &Path, pattern: &Regex, replacement: &str) -> Result<()> {
        let contents = self.read(path)?;
        let replaced = pattern.replace_all(&contents, replacement);
        self.write(path, &replaced)
    }
}

/// The real, disk-backed implementation.
#[derive(Debug, Clone, Default)]
pub struct DiskFileManager;

impl FileManager for DiskFileManager {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| Error::io("read", path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).map_err(|e| Error::io("write", path, e))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| Error::io("delete", path, e))
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<()> {
        std::fs::copy(source, destination)
            .map(|_| ())
            .map_err(|e| Error::io("copy", source, e))
    }
}
