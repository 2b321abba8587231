use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::edit::{find_one_child, find_one_child_index, find_one_child_mut};
use crate::error::CoreError;
use crate::model::{Content, Document};
use crate::xmlfmt;
use crate::xmlfmt_write::{self, XmlWriteOpts};

/// Tag a demoted player takes inside the farmhand roster.
pub const STORED_PLAYER_TAG: &str = "Farmer";

/// Suffix appended to the save file name before the new content is written.
pub const BACKUP_SUFFIX: &str = ".orig";

/// The names involved in a swap: the active player and one entry per
/// roster slot, `None` where the slot is unoccupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub player_name: String,
    pub farmhand_names: Vec<Option<String>>,
}

impl Roster {
    /// 1-based display indices of the occupied slots, with names.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &str)> {
        self.farmhand_names
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_deref().map(|n| (i + 1, n)))
    }
}

/// Read and parse the save file, checking the root tag.
pub fn load_save(path: &Path) -> Result<Document, CoreError> {
    log::debug!("Parsing XML from {}", path.display());
    let text = fs::read_to_string(path)?;
    let doc = xmlfmt::parse_document(&text)?;
    if doc.root.name != "SaveGame" {
        return Err(CoreError::UnexpectedRoot(doc.root.name.clone()));
    }
    Ok(doc)
}

/// Extract the player name and per-slot farmhand names.
///
/// A slot whose `<name>` lookup fails is recorded as unoccupied rather than
/// failing the whole operation; a `<name>` that exists but holds no text is
/// an error, matching the treatment of the player's own name.
pub fn read_roster(doc: &Document) -> Result<Roster, CoreError> {
    let player = find_one_child(&doc.root, "player", None)?;
    let player_name = find_one_child(player, "name", None)?
        .text()
        .ok_or_else(|| CoreError::MissingText("name".into()))?
        .to_owned();

    let farmhands = find_one_child(&doc.root, "farmhands", None)?;
    log::debug!("Checking farmhand occupancy");
    let mut farmhand_names = Vec::new();
    for hand in farmhands.child_elements() {
        match find_one_child(hand, "name", None) {
            Ok(name) => {
                let name = name
                    .text()
                    .ok_or_else(|| CoreError::MissingText("name".into()))?;
                farmhand_names.push(Some(name.to_owned()));
            }
            Err(_) => farmhand_names.push(None),
        }
    }
    Ok(Roster {
        player_name,
        farmhand_names,
    })
}

/// Swap the active player with the farmhand in `slot` (0-based).
///
/// The sequence is order-sensitive: detach both records, retag them, swap
/// their `homeLocation` texts, then re-attach. The ex-player lands at the
/// end of the roster and the new player becomes the first child of the
/// root, where downstream readers expect the active player. Every
/// precondition is checked before the first detach, so on error the
/// document is untouched.
pub fn apply_swap(doc: &mut Document, slot: usize) -> Result<(), CoreError> {
    let root = &mut doc.root;

    // Preconditions: unique player and roster, occupied target slot, and a
    // homeLocation on both sides.
    let player_index = find_one_child_index(root, "player", None)?;
    {
        let farmhands = find_one_child(root, "farmhands", None)?;
        let len = farmhands.child_elements().count();
        let hand = farmhands
            .child_elements()
            .nth(slot)
            .ok_or(CoreError::SlotOutOfRange { index: slot, len })?;
        if find_one_child(hand, "name", None)
            .ok()
            .and_then(|n| n.text())
            .is_none()
        {
            return Err(CoreError::EmptySlot { index: slot });
        }
        find_one_child(hand, "homeLocation", None)?;
        let Content::Element(player) = &root.children[player_index] else {
            return Err(CoreError::not_found("player", &root.name));
        };
        find_one_child(player, "homeLocation", None)?;
    }

    // Detach the player from the root and the farmhand from the roster.
    log::debug!("Step: Remove player and farmhand");
    let Content::Element(mut player) = root.children.remove(player_index) else {
        return Err(CoreError::not_found("player", &root.name));
    };
    let farmhands = find_one_child_mut(root, "farmhands", None)?;
    let slot_index = farmhands
        .nth_element_index(slot)
        .ok_or_else(|| CoreError::SlotOutOfRange {
            index: slot,
            len: farmhands.child_elements().count(),
        })?;
    let Content::Element(mut hand) = farmhands.children.remove(slot_index) else {
        return Err(CoreError::not_found("farmhand", &farmhands.name));
    };

    // Retag: the player becomes a stored roster record, the farmhand the
    // active player.
    log::debug!("Step: Change tags");
    player.name = STORED_PLAYER_TAG.to_string();
    hand.name = "player".to_string();

    // Home location travels with the character identity, not the slot.
    log::debug!("Step: Swap home locations");
    let player_home = find_one_child_mut(&mut player, "homeLocation", None)?.take_text();
    let hand_home_el = find_one_child_mut(&mut hand, "homeLocation", None)?;
    let hand_home = hand_home_el.take_text();
    hand_home_el.set_text(player_home);
    find_one_child_mut(&mut player, "homeLocation", None)?.set_text(hand_home);

    // Re-attach: ex-player last in the roster, new player first under root.
    log::debug!("Step: Insert back into tree");
    farmhands.children.push(Content::Element(player));
    root.children.insert(0, Content::Element(hand));
    Ok(())
}

/// Path of the backup written beside the save file.
pub fn backup_path(save_file: &Path) -> PathBuf {
    let mut name = save_file
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    save_file.with_file_name(name)
}

/// Persist the mutated document: move the original aside, then serialize.
///
/// The rename happens only immediately before the write, and never on top
/// of an existing backup. Returns the backup path on success. A write
/// failure after the rename reports the backup location so the user can
/// recover by hand.
pub fn write_save_with_backup(
    save_file: &Path,
    doc: &Document,
    opts: XmlWriteOpts,
) -> Result<PathBuf, CoreError> {
    let backup = backup_path(save_file);
    if backup.exists() {
        return Err(CoreError::BackupExists(backup));
    }
    fs::rename(save_file, &backup)?;
    log::debug!("Original renamed to {}", backup.display());
    xmlfmt_write::write_document_file(save_file, doc, opts).map_err(|e| match e {
        CoreError::Io(source) => CoreError::WriteFailed {
            path: save_file.to_path_buf(),
            backup: backup.clone(),
            source,
        },
        other => other,
    })?;
    Ok(backup)
}
