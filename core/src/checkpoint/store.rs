use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tokio::io::AsyncWriteExt;

use crate::error::CheckpointError;

use super::CheckpointRecord;

/// File-system safe key for a stanza name. Every byte outside `[A-Za-z0-9_.~-]` is
/// percent-encoded, so distinct names always give distinct keys.
pub fn checkpoint_key(stanza: &str) -> String {
    urlencoding::encode(stanza).into_owned()
}

/// One JSON file per stanza under the checkpoint directory.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stanza: &str) -> PathBuf {
        self.dir.join(format!("{}.json", checkpoint_key(stanza)))
    }

    fn temp_path_for(&self, stanza: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", checkpoint_key(stanza)))
    }

    fn lock_path_for(&self, stanza: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", checkpoint_key(stanza)))
    }

    /// `Ok(None)` when the stanza has never been checkpointed.
    pub async fn load(&self, stanza: &str) -> Result<Option<CheckpointRecord>, CheckpointError> {
        let path = self.path_for(stanza);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::io(path, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CheckpointError::Corrupt { path, source })
    }

    /// Writes the record through a temp file and a rename, so a reader sees either
    /// the old record or the new one. `last_run` is never moved backwards relative to
    /// what is already on disk.
    pub async fn save(&self, stanza: &str, record: &CheckpointRecord) -> Result<(), CheckpointError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CheckpointError::io(&self.dir, e))?;

        let mut record = record.clone();
        if let Ok(Some(existing)) = self.load(stanza).await {
            record.advance_last_run(existing.last_run);
        }

        let json = serde_json::to_vec_pretty(&record).map_err(CheckpointError::Serialize)?;
        let path = self.path_for(stanza);
        let temp_path = self.temp_path_for(stanza);

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| CheckpointError::io(&temp_path, e))?;
        file.write_all(&json)
            .await
            .map_err(|e| CheckpointError::io(&temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| CheckpointError::io(&temp_path, e))?;
        drop(file);

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| CheckpointError::io(&path, e))?;

        tracing::debug!(
            target: "modinput.checkpoint",
            stanza = %stanza,
            path = %path.display(),
            "checkpoint saved"
        );
        Ok(())
    }

    /// Removes the stored record. Returns whether anything was deleted.
    pub async fn reset(&self, stanza: &str) -> Result<bool, CheckpointError> {
        let path = self.path_for(stanza);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    target: "modinput.checkpoint",
                    stanza = %stanza,
                    "checkpoint reset"
                );
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CheckpointError::io(path, e)),
        }
    }

    /// Takes the stanza's exclusive lock without waiting. A lock held elsewhere is
    /// reported as [`CheckpointError::Busy`].
    pub fn lock(&self, stanza: &str) -> Result<StanzaLock, CheckpointError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CheckpointError::io(&self.dir, e))?;

        let path = self.lock_path_for(stanza);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| CheckpointError::io(&path, e))?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(StanzaLock { file, path }),
            Err(e) if is_contended(&e) => Err(CheckpointError::Busy {
                stanza: stanza.to_string(),
            }),
            Err(e) => Err(CheckpointError::io(path, e)),
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Held for the whole load, run, save sequence of one stanza. Released on drop.
#[derive(Debug)]
pub struct StanzaLock {
    file: std::fs::File,
    path: PathBuf,
}

impl StanzaLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StanzaLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
