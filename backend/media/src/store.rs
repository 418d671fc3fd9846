//! Audio file store.
//!
//! Synthesized audio lands here under a fresh uuid filename. Bytes are
//! streamed into a hidden `.part` file and renamed into place only once the
//! stream has completed, so a filename handed out always names a whole file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use ringforge_core::{AudioStream, RingError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: Arc<PathBuf>,
    extension: String,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
            extension: "mp3".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Create the audio directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<(), RingError> {
        fs::create_dir_all(self.dir.as_path()).await?;
        Ok(())
    }

    /// Drain `stream` into a new file and return its filename.
    pub async fn write_stream(&self, stream: AudioStream) -> Result<String, RingError> {
        let filename = format!("{}.{}", Uuid::new_v4(), self.extension);
        let final_path = self.dir.join(&filename);
        let mut partial = PartialFile::new(self.dir.join(format!(".{filename}.part")));

        let written = copy_stream(&partial.path, stream).await?;
        fs::rename(&partial.path, &final_path).await?;
        partial.keep();

        debug!(file = %filename, bytes = written, "Stored synthesized audio");
        Ok(filename)
    }
}

async fn copy_stream(path: &Path, mut stream: AudioStream) -> Result<u64, RingError> {
    let mut file = fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    if written == 0 {
        return Err(RingError::Storage("audio stream was empty".to_string()));
    }
    Ok(written)
}

/// Removes an unfinished `.part` file unless the write completed, including
/// when the writing future is dropped by a timeout.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn keep(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
