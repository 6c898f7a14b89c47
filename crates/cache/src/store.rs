use crate::error::{ErrorKind, Result};
use crate::snapshot::CacheSnapshot;
use exn::ResultExt;
use std::ffi::OsString;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// A single JSON snapshot file on local disk.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}
impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that a snapshot is written to before being moved into
    /// place, so a reader never sees a half-written snapshot.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<CacheSnapshot> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == IoErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(self.path.clone())),
            Err(err) => Err(err).or_raise(|| ErrorKind::Unreadable(self.path.clone()))?,
        };
        Ok(serde_json::from_slice(&data).or_raise(|| ErrorKind::InvalidData)?)
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display(), links = snapshot.links.len()))]
    pub async fn save(&self, snapshot: &CacheSnapshot) -> Result<()> {
        let data = serde_json::to_vec_pretty(snapshot).or_raise(|| ErrorKind::InvalidData)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Unwritable(self.path.clone()))?;
        }
        let staging = self.staging_path();
        fs::write(&staging, &data).await.or_raise(|| ErrorKind::Unwritable(self.path.clone()))?;
        if let Err(err) = fs::rename(&staging, &self.path).await {
            // Leave nothing behind; the rename error is the one worth reporting.
            let _ = fs::remove_file(&staging).await;
            return Err(err).or_raise(|| ErrorKind::Unwritable(self.path.clone()));
        }
        tracing::debug!("Saved link snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envkit_listing::Links;

    fn snapshot() -> CacheSnapshot {
        CacheSnapshot::new(Links::from([("jdk".to_string(), "https://example.com/jdk_1.zip".to_string())]))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("links.json"));
        let snapshot = snapshot();
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("a/b/links.json"));
        store.save(&snapshot()).await.unwrap();
        assert!(store.path().is_file());
        assert!(!temp_dir.path().join("a/b/links.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("links.json"));
        store.save(&snapshot()).await.unwrap();
        let replacement = CacheSnapshot::new(Links::new());
        store.save(&replacement).await.unwrap();
        assert_eq!(store.load().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_load_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("missing.json"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_corrupt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("links.json");
        std::fs::write(&path, b"{\"timestamp\": 12, \"links\": []").unwrap();
        let err = SnapshotStore::new(path).load().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData));
    }

    #[tokio::test]
    async fn test_load_directory_is_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = SnapshotStore::new(temp_dir.path()).load().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unreadable(_)));
    }

    #[tokio::test]
    async fn test_save_under_a_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = SnapshotStore::new(blocker.join("links.json"));
        let err = store.save(&snapshot()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unwritable(_)));
    }
}
