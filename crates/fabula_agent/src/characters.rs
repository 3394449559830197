//! Character registry: a keyed collection of character records.

use fabula_core::Character;
use fabula_error::{StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File-backed collection of [`Character`] records keyed by name.
///
/// The backing document is a JSON array loaded at construction and written
/// back after each mutation. No generation or validation logic lives here.
#[derive(Debug)]
pub struct CharacterRegistry {
    path: PathBuf,
    characters: BTreeMap<String, Character>,
}

impl CharacterRegistry {
    /// Open a registry backed by the given file, loading existing records.
    ///
    /// A missing file yields an empty registry; the file is created on the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Fails if an existing file cannot be read or does not parse as a
    /// character list.
    #[tracing::instrument(skip(path))]
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let characters = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let records: Vec<Character> = serde_json::from_str(&raw).map_err(|e| {
                    StorageError::new(StorageErrorKind::FileRead(format!(
                        "{}: invalid character list: {}",
                        path.display(),
                        e
                    )))
                })?;
                records
                    .into_iter()
                    .map(|c| (c.name.clone(), c))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
            }
        };

        tracing::debug!(path = %path.display(), count = characters.len(), "Opened character registry");
        Ok(Self { path, characters })
    }

    /// Insert or replace the record with the character's name.
    ///
    /// # Errors
    ///
    /// Fails if the backing file cannot be written; the in-memory state is
    /// only updated on a successful write.
    pub fn upsert(&mut self, character: Character) -> Result<(), StorageError> {
        let mut next = self.characters.clone();
        next.insert(character.name.clone(), character);
        persist(&self.path, &next)?;
        self.characters = next;
        Ok(())
    }

    /// Look up a character by name.
    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    /// All characters, ordered by name.
    pub fn list(&self) -> Vec<&Character> {
        self.characters.values().collect()
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write the record list through a temp file promoted by rename.
fn persist(path: &Path, characters: &BTreeMap<String, Character>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }
    }

    let records: Vec<&Character> = characters.values().collect();
    let raw = serde_json::to_string_pretty(&records)
        .map_err(|e| StorageError::new(StorageErrorKind::Serialize(e.to_string())))?;

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, raw).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            tmp.display(),
            e
        )))
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        StorageError::new(StorageErrorKind::Promote(format!(
            "{} -> {}: {}",
            tmp.display(),
            path.display(),
            e
        )))
    })
}
