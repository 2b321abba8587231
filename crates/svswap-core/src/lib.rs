//! svswap-core: XML model, structural lookup, and swap logic for Stardew
//! Valley saves
//!
//! This crate focuses on a small, well-factored surface:
//! - In-memory XML tree (`Document`/`Element`) with order-preserving
//!   attributes, plus a purpose-built reader and writer for the save format
//! - `find_one_child`: single-child structural lookup scoped to a parent,
//!   failing on ambiguity
//! - Roster extraction and the six-step player/farmhand swap sequence
//! - Persistence with a `.orig` backup of the original save
//! - Save-directory validation (marker file + equally-named save file)
//!
pub mod edit;
pub mod error;
pub mod model;
pub mod saves;
pub mod swap;
pub mod xmlfmt;
pub mod xmlfmt_write;

pub use edit::{find_one_child, find_one_child_index, find_one_child_mut};
pub use error::CoreError;
pub use model::{Content, Document, Element};
pub use saves::{SENTINEL_FILE, locate_save_file};
pub use swap::{
    BACKUP_SUFFIX, Roster, STORED_PLAYER_TAG, apply_swap, backup_path, load_save, read_roster,
    write_save_with_backup,
};
pub use xmlfmt::parse_document;
pub use xmlfmt_write::{XmlWriteOpts, write_document, write_document_file};
