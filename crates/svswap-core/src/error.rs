//! Typed errors for the core crate.
//!
//! One variant per failure family, each carrying the tag/path context the
//! call sites and the CLI's exit-code mapping rely on.

use std::path::PathBuf;

use thiserror::Error;

/// The single error type returned across the core crate's public surface.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed XML: a byte offset into the input plus a description.
    #[error("XML parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// The document's root tag was not the expected `SaveGame`.
    #[error("unexpected root element <{0}>, expected <SaveGame>")]
    UnexpectedRoot(String),

    /// A scoped structural lookup found no matching child.
    #[error("no <{tag}> child found under <{parent}>")]
    ElementNotFound { tag: String, parent: String },

    /// A scoped structural lookup found more than one matching child.
    #[error("ambiguous document: multiple <{tag}> children under <{parent}>")]
    DuplicateElement { tag: String, parent: String },

    /// A required text value (e.g. a player `name`) was absent or empty.
    #[error("missing required text for <{0}>")]
    MissingText(String),

    /// The selected cabin slot is unoccupied.
    #[error("cabin {index} is empty")]
    EmptySlot { index: usize },

    /// The selected slot index is outside the roster.
    #[error("cabin {index} is out of range (only {len} present)")]
    SlotOutOfRange { index: usize, len: usize },

    /// The path is not a usable save directory.
    #[error("not a valid save directory {path}: {reason}", path = path.display())]
    BadSaveDir { path: PathBuf, reason: String },

    /// The directory is missing the save contract (marker or save file).
    #[error("{path} is not a save: missing {missing}", path = path.display())]
    NotASave { path: PathBuf, missing: String },

    /// A backup file already exists; persistence refuses to overwrite it.
    #[error("backup already exists at {}", .0.display())]
    BackupExists(PathBuf),

    /// Writing the new save failed after the original was moved aside.
    #[error(
        "failed to write {path} (original preserved at {backup}): {source}",
        path = path.display(),
        backup = backup.display(),
    )]
    WriteFailed {
        path: PathBuf,
        backup: PathBuf,
        source: std::io::Error,
    },

    /// An underlying read/rename/write failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Construct an [`CoreError::ElementNotFound`] from borrowed context.
    pub fn not_found(tag: &str, parent: &str) -> Self {
        CoreError::ElementNotFound {
            tag: tag.to_string(),
            parent: parent.to_string(),
        }
    }

    /// Construct a [`CoreError::DuplicateElement`] from borrowed context.
    pub fn duplicate(tag: &str, parent: &str) -> Self {
        CoreError::DuplicateElement {
            tag: tag.to_string(),
            parent: parent.to_string(),
        }
    }
}
