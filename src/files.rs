//! Config artifact writing.
//!
//! Rendered artifacts land in the engine's config include directory as
//! single-shot atomic writes (temp file + rename), so a shutdown signal
//! arriving during the later poll phase can never expose a partially
//! written config or marker file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

/// Writes named artifacts into the config directory.
#[derive(Debug)]
pub struct FileManager {
    config_dir: PathBuf,
}

impl FileManager {
    pub fn new(config_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config_dir = config_dir.into();
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("creating config directory {}", config_dir.display()))?;
        Ok(FileManager { config_dir })
    }

    /// Atomically write (or replace) `name` in the config directory.
    pub fn write_config(&self, name: &str, contents: &[u8]) -> anyhow::Result<()> {
        let target = self.config_dir.join(name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.config_dir)
            .with_context(|| format!("creating temp file in {}", self.config_dir.display()))?;
        tmp.write_all(contents)
            .with_context(|| format!("writing {name}"))?;
        tmp.persist(&target)
            .with_context(|| format!("persisting {}", target.display()))?;
        Ok(())
    }
}
