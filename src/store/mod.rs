//! Guarded store over a current/backup document pair.
//!
//! # Data Flow
//! ```text
//! GuardedStore::load(path)
//!     → current  (independent read)
//!     → backup   (independent read)
//!
//! set_record / set_value / removals mutate current only
//!
//! save(path, write_backup):
//!     documents_equal(current, backup)?
//!         equal    → no-op, no I/O
//!         diverged → [backup → path.bak]   (optional, pre-save snapshot)
//!                    current → path
//!                    backup  ← re-read of path
//!
//! reload(): current and backup re-read independently, edits discarded
//! ```
//!
//! # Design Decisions
//! - Dirtiness is recomputed from the document pair, never stored
//! - One coarse RwLock guards the pair; a save holds it across disk I/O
//! - The post-save backup refresh re-reads the written file instead of
//!   cloning current, so backup mirrors what actually landed on disk

mod diff;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::document::{Document, DocumentError};
use crate::record::Record;

/// Which of the two in-memory copies an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentCopy {
    Current,
    Backup,
}

impl std::fmt::Display for DocumentCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentCopy::Current => f.write_str("current"),
            DocumentCopy::Backup => f.write_str("backup"),
        }
    }
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record did not name a section.
    #[error("record does not name a section")]
    InvalidRecord,

    /// Loading or re-reading one of the document copies failed.
    #[error("failed to load {copy} document: {source}")]
    Load {
        copy: DocumentCopy,
        #[source]
        source: DocumentError,
    },

    /// Writing the primary or backup file failed.
    #[error("failed to persist configuration: {0}")]
    Persist(#[source] DocumentError),

    /// A section or key lookup failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug)]
struct State {
    current: Document,
    backup: Document,
}

/// Configuration store guarding persistence behind a snapshot diff.
///
/// The store owns two independently loaded copies of the same document:
/// `current`, which callers mutate, and `backup`, the last state known to be
/// in sync with disk. A save is a no-op unless the two have diverged.
///
/// Handles are cheap to clone and share one underlying document pair.
#[derive(Debug, Clone)]
pub struct GuardedStore {
    state: Arc<RwLock<State>>,
}

impl GuardedStore {
    /// Read the file at `path` twice into an equal, independent document pair.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let current = Document::load(path).map_err(|source| StoreError::Load {
            copy: DocumentCopy::Current,
            source,
        })?;
        let backup = Document::load(path).map_err(|source| StoreError::Load {
            copy: DocumentCopy::Backup,
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            sections = current.section_count(),
            "configuration loaded"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(State { current, backup })),
        })
    }

    /// Populate `dest`'s fields from its bound section.
    ///
    /// Fails on the first missing section or key, leaving later fields
    /// unpopulated.
    pub fn get_record<R: Record>(&self, dest: &mut R) -> Result<(), StoreError> {
        let section = dest.section();
        if section.is_empty() {
            return Err(StoreError::InvalidRecord);
        }
        let state = self.state.read().expect("store lock poisoned");
        for (key, slot) in dest.fields_mut() {
            *slot = state.current.get(section, key)?.to_string();
        }
        Ok(())
    }

    /// Copy `src`'s fields into its bound section, creating sections and keys
    /// as needed. Touches only the current document; nothing is persisted.
    pub fn set_record<R: Record>(&self, src: &R) -> Result<(), StoreError> {
        let section = src.section();
        if section.is_empty() {
            return Err(StoreError::InvalidRecord);
        }
        let mut state = self.state.write().expect("store lock poisoned");
        for (key, value) in src.fields() {
            state.current.set(section, key, value);
        }
        Ok(())
    }

    /// Value of a single key in the current document.
    pub fn get_value(&self, section: &str, key: &str) -> Result<String, StoreError> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.current.get(section, key)?.to_string())
    }

    /// Set a single key in the current document.
    pub fn set_value(&self, section: &str, key: &str, value: &str) {
        let mut state = self.state.write().expect("store lock poisoned");
        state.current.set(section, key, value);
    }

    /// Remove a single key from the current document.
    pub fn remove_key(&self, section: &str, key: &str) -> Option<String> {
        let mut state = self.state.write().expect("store lock poisoned");
        state.current.remove_key(section, key)
    }

    /// Remove a whole section from the current document.
    pub fn remove_section(&self, name: &str) -> bool {
        let mut state = self.state.write().expect("store lock poisoned");
        state.current.remove_section(name)
    }

    /// Section names in the current document.
    pub fn section_names(&self) -> Vec<String> {
        let state = self.state.read().expect("store lock poisoned");
        state.current.section_names().map(str::to_string).collect()
    }

    /// Whether the current document has diverged from the backup snapshot.
    pub fn is_dirty(&self) -> bool {
        let state = self.state.read().expect("store lock poisoned");
        !diff::documents_equal(&state.current, &state.backup)
    }

    /// Persist the current document to `path` if it has diverged from backup.
    ///
    /// With `write_backup` set, the pre-save backup document is written to
    /// `path` with a `.bak` suffix before the primary write; a backup write
    /// failure aborts the save. After a successful primary write the backup
    /// document is refreshed by re-reading the file just written.
    pub fn save(&self, path: impl AsRef<Path>, write_backup: bool) -> Result<(), StoreError> {
        let path = path.as_ref();

        {
            let state = self.state.read().expect("store lock poisoned");
            if diff::documents_equal(&state.current, &state.backup) {
                tracing::debug!(path = %path.display(), "configuration unchanged, skipping save");
                return Ok(());
            }
        }

        let mut state = self.state.write().expect("store lock poisoned");

        if write_backup {
            let bak = backup_path(path);
            state.backup.save_to(&bak).map_err(StoreError::Persist)?;
            tracing::debug!(path = %bak.display(), "backup file written");
        }

        state.current.save_to(path).map_err(StoreError::Persist)?;
        state.backup = Document::load(path).map_err(|source| StoreError::Load {
            copy: DocumentCopy::Backup,
            source,
        })?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Re-read both documents from their source paths, discarding unsaved
    /// edits to the current document.
    ///
    /// The error names which copy failed to re-read; that copy keeps its
    /// prior contents.
    pub fn reload(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().expect("store lock poisoned");
        state.current.reload().map_err(|source| StoreError::Load {
            copy: DocumentCopy::Current,
            source,
        })?;
        state.backup.reload().map_err(|source| StoreError::Load {
            copy: DocumentCopy::Backup,
            source,
        })?;
        tracing::info!(path = %state.current.path().display(), "configuration reloaded");
        Ok(())
    }
}

/// Backup file convention: the original path with a `.bak` suffix appended.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}
