//! Filesystem story store implementation.

use chrono::Utc;
use fabula_core::StoryArtifact;
use fabula_error::{StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Bound on disambiguating suffixes within one save call.
const MAX_KEY_ATTEMPTS: u32 = 100;

/// Where a saved artifact landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLocation {
    /// Sanitized partition token the artifact was filed under
    pub partition: String,
    /// Timestamp-derived base name shared by both representations
    pub key: String,
    /// Path of the structured (JSON) representation
    pub structured_path: PathBuf,
    /// Path of the human-readable representation
    pub text_path: PathBuf,
}

/// Filesystem store for validated story artifacts.
///
/// Layout: `{root}/{sanitized-genre}/{key}.json` plus `{key}.txt`, where the
/// key is derived from the save timestamp with a numeric suffix appended on
/// collision. Writes go to a temp file promoted by rename; on any failure
/// both representations are rolled back so the artifact is committed fully
/// or not at all.
#[derive(Debug, Clone)]
pub struct StoryStore {
    root: PathBuf,
}

impl StoryStore {
    /// Create a new store rooted at `root`.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::debug!(path = %root.display(), "Opened story store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an artifact under the partition for `genre`.
    ///
    /// A regenerated story for the same genre always produces a new
    /// timestamped artifact; existing artifacts are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition cannot be created, either
    /// representation cannot be written or promoted, or the timestamp key
    /// space within the partition is exhausted. On failure neither
    /// representation is left committed.
    #[tracing::instrument(skip(self, artifact), fields(genre = %genre))]
    pub fn save(
        &self,
        genre: &str,
        artifact: &StoryArtifact,
    ) -> Result<StoredLocation, StorageError> {
        let partition = sanitize_partition(genre)?;
        let partition_dir = self.root.join(&partition);

        std::fs::create_dir_all(&partition_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                partition_dir.display(),
                e
            )))
        })?;

        let key = self.claim_key(&partition_dir, &partition)?;
        let structured_path = partition_dir.join(format!("{key}.json"));
        let text_path = partition_dir.join(format!("{key}.txt"));

        let structured = serde_json::to_string_pretty(artifact)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialize(e.to_string())))?;
        let text = artifact.render_text();

        self.commit(&structured_path, structured.as_bytes(), &text_path, text.as_bytes())?;

        tracing::info!(
            partition = %partition,
            key = %key,
            path = %structured_path.display(),
            "Stored story artifact"
        );

        Ok(StoredLocation {
            partition,
            key,
            structured_path,
            text_path,
        })
    }

    /// Read a persisted structured representation back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or no longer
    /// parses as a story artifact.
    #[tracing::instrument(skip(self, location), fields(path = %location.structured_path.display()))]
    pub fn read_structured(&self, location: &StoredLocation) -> Result<StoryArtifact, StorageError> {
        let raw = std::fs::read_to_string(&location.structured_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(
                    location.structured_path.display().to_string(),
                ))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    location.structured_path.display(),
                    e
                )))
            }
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: invalid artifact: {}",
                location.structured_path.display(),
                e
            )))
        })
    }

    /// Derive a timestamp key unique within the partition.
    ///
    /// On collision the numeric suffix is incremented and the probe
    /// retried within the same call; the bound keeps a pathological clock
    /// from looping forever.
    fn claim_key(&self, partition_dir: &Path, partition: &str) -> Result<String, StorageError> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let base = format!("story_{timestamp}");

        for attempt in 0..MAX_KEY_ATTEMPTS {
            let key = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}_{attempt}")
            };
            let taken = partition_dir.join(format!("{key}.json")).exists()
                || partition_dir.join(format!("{key}.txt")).exists();
            if !taken {
                return Ok(key);
            }
        }

        Err(StorageError::new(StorageErrorKind::CollisionExhausted(
            partition.to_string(),
        )))
    }

    /// Write both representations through temp files and promote by rename.
    ///
    /// Failure anywhere removes every temp target and rolls back an
    /// already-promoted sibling.
    fn commit(
        &self,
        structured_path: &Path,
        structured: &[u8],
        text_path: &Path,
        text: &[u8],
    ) -> Result<(), StorageError> {
        let structured_tmp = tmp_target(structured_path);
        let text_tmp = tmp_target(text_path);

        std::fs::write(&structured_tmp, structured).map_err(|e| {
            let _ = std::fs::remove_file(&structured_tmp);
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                structured_tmp.display(),
                e
            )))
        })?;

        if let Err(e) = std::fs::write(&text_tmp, text) {
            let _ = std::fs::remove_file(&structured_tmp);
            let _ = std::fs::remove_file(&text_tmp);
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                text_tmp.display(),
                e
            ))));
        }

        if let Err(e) = std::fs::rename(&structured_tmp, structured_path) {
            let _ = std::fs::remove_file(&structured_tmp);
            let _ = std::fs::remove_file(&text_tmp);
            return Err(StorageError::new(StorageErrorKind::Promote(format!(
                "{} -> {}: {}",
                structured_tmp.display(),
                structured_path.display(),
                e
            ))));
        }

        if let Err(e) = std::fs::rename(&text_tmp, text_path) {
            // roll back the committed sibling so nothing partial remains
            let _ = std::fs::remove_file(&text_tmp);
            let _ = std::fs::remove_file(structured_path);
            return Err(StorageError::new(StorageErrorKind::Promote(format!(
                "{} -> {}: {}",
                text_tmp.display(),
                text_path.display(),
                e
            ))));
        }

        Ok(())
    }
}

fn tmp_target(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Sanitize a genre into a filesystem-safe partition token.
///
/// Lowercases, maps anything outside `[a-z0-9_-]` to `_`, and collapses
/// runs. An input with no usable characters is rejected rather than filed
/// under a default partition.
fn sanitize_partition(genre: &str) -> Result<String, StorageError> {
    let mut token = String::with_capacity(genre.len());
    let mut last_was_fill = false;
    for ch in genre.trim().chars() {
        let lowered = ch.to_ascii_lowercase();
        if lowered.is_ascii_alphanumeric() || lowered == '-' || lowered == '_' {
            token.push(lowered);
            last_was_fill = false;
        } else if !last_was_fill && !token.is_empty() {
            token.push('_');
            last_was_fill = true;
        }
    }
    let token = token.trim_end_matches('_').to_string();

    if token.is_empty() {
        return Err(StorageError::new(StorageErrorKind::InvalidPartition(
            genre.to_string(),
        )));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::{sanitize_partition, StoryStore};
    use tempfile::TempDir;

    #[test]
    fn sanitizes_to_filesystem_safe_tokens() {
        assert_eq!(sanitize_partition("fantasy").unwrap(), "fantasy");
        assert_eq!(sanitize_partition("Sci Fi / Space").unwrap(), "sci_fi_space");
        assert_eq!(sanitize_partition("  mystery  ").unwrap(), "mystery");
    }

    #[test]
    fn rejects_unusable_genres() {
        assert!(sanitize_partition("").is_err());
        assert!(sanitize_partition("!!!").is_err());
    }

    #[test]
    fn aborted_write_leaves_no_visible_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = StoryStore::new(temp_dir.path()).unwrap();
        let partition = temp_dir.path().join("fantasy");
        std::fs::create_dir_all(&partition).unwrap();

        // text target in a nonexistent subdirectory fails mid-write
        let structured_path = partition.join("story_x.json");
        let text_path = partition.join("missing").join("story_x.txt");
        let result = store.commit(&structured_path, b"{}", &text_path, b"text");
        assert!(result.is_err());

        let visible: Vec<_> = std::fs::read_dir(&partition).unwrap().collect();
        assert!(visible.is_empty(), "partial files left behind: {visible:?}");
    }

    #[test]
    fn failed_promotion_rolls_back_the_committed_sibling() {
        let temp_dir = TempDir::new().unwrap();
        let store = StoryStore::new(temp_dir.path()).unwrap();
        let partition = temp_dir.path().join("fantasy");
        std::fs::create_dir_all(&partition).unwrap();

        let structured_path = partition.join("story_x.json");
        let text_path = partition.join("story_x.txt");
        // a directory squatting on the text target makes its rename fail
        std::fs::create_dir(&text_path).unwrap();

        let result = store.commit(&structured_path, b"{}", &text_path, b"text");
        assert!(result.is_err());
        assert!(
            !structured_path.exists(),
            "structured representation survived a failed save"
        );
    }
}
