// File-per-key backend

use super::{KeyValueStore, validate_key};
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores each key as `<key>.json` inside a directory
///
/// Writes go to a temp file that is synced and then renamed over the target,
/// under an exclusive lock on `.<key>.lock`.
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open or create a file store in the given directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create store directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.blob_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let blob = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(blob))
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.blob_path(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(format!(".{}.lock", key)))
            .context("Failed to open lock file")?;

        // Acquire exclusive lock before writing
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut tmp = fs::File::create(&tmp_path).context("Failed to create temp file")?;
        tmp.write_all(blob.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        sync_dir(&self.dir)?;
        debug!(key, bytes = blob.len(), "Wrote blob");

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// Flush the directory entry so a completed rename survives a crash
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .with_context(|| format!("Failed to sync directory {}", dir.display()))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
