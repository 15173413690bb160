//! Configuration document subsystem.
//!
//! # Data Flow
//! ```text
//! file on disk
//!     → format.rs (parse, string-valued sections only)
//!     → Document (section table + source path)
//!     → section/key lookups and mutations
//!     → format.rs (render)
//!     → file on disk
//! ```
//!
//! # Design Decisions
//! - A document remembers the path it was loaded from; reload re-reads from
//!   that path in place
//! - Lookups return typed errors instead of options so callers can surface
//!   exactly which section or key was missing
//! - Mutations never touch the disk; persistence is a separate, explicit step

mod format;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use format::SectionTable;

/// Error type for document I/O and lookups.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading the file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a table of string-valued sections.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Rendering the section table failed.
    #[error("failed to serialize document for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    /// Writing the file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A named section is absent.
    #[error("section [{section}] not found")]
    MissingSection { section: String },

    /// A key is absent from an existing section.
    #[error("key '{key}' not found in section [{section}]")]
    MissingKey { section: String, key: String },
}

/// A single configuration document bound to its source file.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    sections: SectionTable,
}

impl Document {
    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        let sections = format::parse(&text).map_err(|source| DocumentError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, sections })
    }

    /// Serialize the document and write it to `path`.
    ///
    /// The document's own source path is not changed by saving elsewhere.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let text = format::render(&self.sections).map_err(|source| DocumentError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Re-read the document from its source path in place.
    ///
    /// On failure the in-memory contents are left untouched.
    pub fn reload(&mut self) -> Result<(), DocumentError> {
        let fresh = Self::load(&self.path)?;
        self.sections = fresh.sections;
        Ok(())
    }

    /// Path this document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all sections.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.0.keys().map(String::as_str)
    }

    /// Whether a section with `name` exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.0.contains_key(name)
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.0.len()
    }

    /// Full contents of one section.
    pub fn section(&self, name: &str) -> Result<&BTreeMap<String, String>, DocumentError> {
        self.sections
            .0
            .get(name)
            .ok_or_else(|| DocumentError::MissingSection {
                section: name.to_string(),
            })
    }

    /// Value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, DocumentError> {
        self.section(section)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DocumentError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Set `key` in `section` to `value`, creating both if absent.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .0
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Remove `key` from `section`, returning its prior value.
    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections.0.get_mut(section)?.remove(key)
    }

    /// Remove a whole section. Returns false if no such section existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        self.sections.0.remove(name).is_some()
    }

    pub(crate) fn table(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.sections.0
    }

    /// Empty document with no backing file, for in-crate tests.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            sections: SectionTable::default(),
        }
    }
}
