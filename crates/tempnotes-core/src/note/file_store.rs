use std::io::ErrorKind;

use tracing::{debug, info};

use crate::error::NoteError;
use crate::util::ensure_dir;

use super::{compose_append, NoteRead, StorageLocation};

/// File-backed store for the single note.
///
/// The file's full contents are the note. A missing file is an empty note;
/// the directory is created lazily on first use.
pub struct NoteStore {
    location: StorageLocation,
}

impl NoteStore {
    pub fn new(location: StorageLocation) -> Self {
        info!("Note store at {}", location.note_path().display());
        Self { location }
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Create the storage directory and any missing parents. Safe to repeat.
    pub async fn ensure_storage_ready(&self) -> Result<(), NoteError> {
        ensure_dir(self.location.dir())
            .await
            .map(|_| ())
            .map_err(|source| NoteError::CreateDir {
                path: self.location.dir().to_path_buf(),
                source,
            })
    }

    /// Read the note. A missing file yields [`NoteRead::Absent`] and leaves
    /// the storage directory in place.
    pub async fn read(&self) -> Result<NoteRead, NoteError> {
        let note = self.load().await?;
        if note.is_absent() {
            self.ensure_storage_ready().await?;
        }
        Ok(note)
    }

    /// Replace the note with `content` verbatim.
    pub async fn write(&self, content: &str) -> Result<(), NoteError> {
        self.ensure_storage_ready().await?;
        self.persist(content).await
    }

    /// Set the note to the empty string.
    pub async fn clear(&self) -> Result<(), NoteError> {
        self.ensure_storage_ready().await?;
        self.persist("").await
    }

    /// Append `content`, separated from existing text per [`compose_append`].
    pub async fn append(&self, content: &str, include_separator: bool) -> Result<(), NoteError> {
        self.ensure_storage_ready().await?;
        let existing = self.load().await?.into_content();
        let updated = compose_append(&existing, content, include_separator);
        self.persist(&updated).await
    }

    async fn load(&self) -> Result<NoteRead, NoteError> {
        let path = self.location.note_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(NoteRead::Found(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(NoteRead::Absent),
            Err(source) => Err(NoteError::Read { path, source }),
        }
    }

    async fn persist(&self, content: &str) -> Result<(), NoteError> {
        let path = self.location.note_path();
        debug!("Writing {} bytes to {}", content.len(), path.display());
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| NoteError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> NoteStore {
        NoteStore::new(StorageLocation::new(dir.join(".mcp_config"), "temp_notes.txt"))
    }

    #[tokio::test]
    async fn test_read_fresh_location_is_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        assert!(!store.location().dir().exists());
        let note = store.read().await.unwrap();
        assert_eq!(note, NoteRead::Absent);
        // Reading creates the directory but not the file
        assert!(store.location().dir().exists());
        assert!(!store.location().note_path().exists());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        let text = "line one\nline two\n\nこんにちは 🐈\n";
        store.write(text).await.unwrap();
        assert_eq!(store.read().await.unwrap(), NoteRead::Found(text.to_string()));

        store.write("replaced").await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "replaced");
    }

    #[tokio::test]
    async fn test_read_is_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.write("  padded  \n\n").await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "  padded  \n\n");
    }

    #[tokio::test]
    async fn test_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.write("something").await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap(), NoteRead::Found(String::new()));

        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "");
    }

    #[tokio::test]
    async fn test_clear_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.clear().await.unwrap();
        assert!(store.location().note_path().exists());
    }

    #[tokio::test]
    async fn test_append_sequence() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.append("A", true).await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "A");

        store.append("B", true).await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "A\n\n---\n\nB");

        store.append("C", false).await.unwrap();
        assert_eq!(
            store.read().await.unwrap().into_content(),
            "A\n\n---\n\nB\n\nC"
        );
    }

    #[tokio::test]
    async fn test_append_to_blank_note_has_no_separator() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.write(" \n\t").await.unwrap();
        store.append("first", true).await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), " \n\tfirst");

        store.write("\u{FEFF}").await.unwrap();
        store.append("first", false).await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "\u{FEFF}first");
    }

    #[tokio::test]
    async fn test_append_after_clear_has_no_separator() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.write("old").await.unwrap();
        store.clear().await.unwrap();
        store.append("fresh", true).await.unwrap();
        assert_eq!(store.read().await.unwrap().into_content(), "fresh");
    }

    #[tokio::test]
    async fn test_ensure_storage_ready_keeps_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.write("keep me").await.unwrap();
        for _ in 0..3 {
            store.ensure_storage_ready().await.unwrap();
        }
        assert_eq!(store.read().await.unwrap().into_content(), "keep me");
    }

    #[tokio::test]
    async fn test_blocked_directory_reports_create_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = NoteStore::new(StorageLocation::new(blocker.join("notes"), "temp_notes.txt"));

        let err = store.write("hello").await.unwrap_err();
        assert!(matches!(err, NoteError::CreateDir { .. }));
        assert!(err.to_string().contains("blocked"));

        assert!(matches!(store.clear().await, Err(NoteError::CreateDir { .. })));
        assert!(matches!(store.append("x", true).await, Err(NoteError::CreateDir { .. })));
    }

    #[tokio::test]
    async fn test_read_non_utf8_is_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.ensure_storage_ready().await.unwrap();
        std::fs::write(store.location().note_path(), [0xff, 0xfe, 0xfd]).unwrap();

        let err = store.read().await.unwrap_err();
        assert!(matches!(err, NoteError::Read { .. }));
    }
}
