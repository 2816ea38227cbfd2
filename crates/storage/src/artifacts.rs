//! Artifact store for uploaded image payloads.
//!
//! Payloads are written under a generated unique name inside a configured
//! root directory. The root is created on demand; write failures are fatal
//! for the request that triggered them, while deletion is best-effort and
//! never fails the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use records::{Result, ServiceError};
use tracing::{debug, warn};
use uuid::Uuid;

/// Writes opaque byte payloads under collision-resistant names.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a payload and return the path it was written to.
    ///
    /// The generated name combines a nanosecond timestamp, an opaque uuid
    /// token, and a sanitized version of the client-supplied name hint, so
    /// concurrent writers never collide.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageIo` if the root directory cannot be
    /// created or the file cannot be written.
    pub fn save(&self, bytes: &[u8], name_hint: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .map_err(|err| ServiceError::storage_io(self.root.display().to_string(), err))?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let token: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let filename = format!("{}_{}_{}", nanos, token, sanitize(name_hint));

        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .map_err(|err| ServiceError::storage_io(path.display().to_string(), err))?;

        debug!(path = %path.display(), bytes = bytes.len(), "stored artifact");
        Ok(path)
    }

    /// Remove an artifact by path. Best-effort: a failure is logged and
    /// swallowed so record cleanup never fails on a missing file.
    pub fn delete(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), "failed to remove artifact: {err}");
        }
    }
}

/// Reduce a client-supplied filename to a safe path component.
///
/// Directory separators and anything outside a conservative character set
/// are replaced; an empty hint falls back to a fixed name.
fn sanitize(hint: &str) -> String {
    let cleaned: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '-').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("artifact-{}-{}", tag, Uuid::new_v4().simple()))
    }

    #[test]
    fn test_save_creates_root_on_demand() {
        let root = temp_root("create");
        assert!(!root.exists());

        let store = ArtifactStore::new(&root);
        let path = store.save(b"payload", "front.jpg").unwrap();

        assert!(root.is_dir());
        assert_eq!(fs::read(&path).unwrap(), b"payload");

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_save_generates_distinct_paths() {
        let root = temp_root("distinct");
        let store = ArtifactStore::new(&root);

        let first = store.save(b"a", "image.jpg").unwrap();
        let second = store.save(b"b", "image.jpg").unwrap();
        assert_ne!(first, second);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_hint_is_sanitized() {
        let root = temp_root("sanitize");
        let store = ArtifactStore::new(&root);

        let path = store.save(b"x", "../../etc/passwd").unwrap();
        // The artifact must land inside the root, not wherever the hint points
        assert!(path.starts_with(&root));
        assert!(!path.to_string_lossy().contains(".."));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_empty_hint_falls_back() {
        assert_eq!(sanitize(""), "upload");
        assert_eq!(sanitize("..."), "upload");
        assert_eq!(sanitize("front image.png"), "front-image.png");
    }

    #[test]
    fn test_delete_is_best_effort() {
        let root = temp_root("delete");
        let store = ArtifactStore::new(&root);

        let path = store.save(b"gone", "side.png").unwrap();
        store.delete(&path);
        assert!(!path.exists());

        // Deleting again must not panic or error
        store.delete(&path);

        fs::remove_dir_all(&root).unwrap();
    }
}
