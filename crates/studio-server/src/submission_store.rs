use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use studio_core::Submission;

/// Append-only CSV file holding every contact submission.
///
/// All file access goes through `write_lock`, so header creation, appends and
/// exports never interleave within this process.
pub struct SubmissionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and a header-only file if absent.
    /// Existing files are left untouched.
    pub async fn ensure_ready(&self) -> io::Result<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_ready_locked().await
    }

    /// Append one submission as a single CSV line.
    pub async fn append(&self, submission: &Submission) -> io::Result<()> {
        let line = submission.to_csv_line().map_err(io::Error::other)?;

        let _guard = self.write_lock.lock().await;
        self.ensure_ready_locked().await?;

        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// Open the file for export. The returned length is taken under the
    /// lock, so reading exactly that many bytes yields only whole rows even
    /// if appends land while the export streams. Returns `None` when no
    /// file exists even after trying to create it.
    pub async fn open_export(&self) -> io::Result<Option<(File, u64)>> {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.ensure_ready_locked().await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Could not prepare submissions file"
            );
        }

        let is_file = tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Ok(None);
        }
        let file = File::open(&self.path).await?;
        let len = file.metadata().await?.len();
        Ok(Some((file, len)))
    }

    async fn ensure_ready_locked(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(e),
        };

        let header = Submission::header_line().map_err(io::Error::other)?;
        let written = async {
            file.write_all(&header).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            // A headerless file would break every later row, so drop it.
            drop(file);
            if let Err(rm) = tokio::fs::remove_file(&self.path).await {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %rm,
                    "Failed to remove headerless submissions file"
                );
            }
            return Err(e);
        }

        tracing::info!(path = %self.path.display(), "Created submissions file");
        Ok(())
    }
}
