// File: ./src/context.rs
/*! Where quickcap looks for its configuration.

The parser itself never touches the filesystem. Only the optional
`capture.toml` (see [`crate::config`]) is read from disk, and its location is
resolved through the `AppContext` trait:

- `StandardContext`: platform config directory from `directories::ProjectDirs`,
  or an explicit override root (CLI `--config-dir`, embedding apps).
- `TestContext`: a unique temporary directory, removed on drop.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "capture.toml";

/// Resolves configuration paths. Object-safe so callers can hold `&dyn AppContext`.
pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join(CONFIG_FILE_NAME))
    }
}

// --- Production Implementation ---

#[derive(Clone, Debug, Default)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    /// When `override_root` is `Some(path)`, the configuration lives directly in `path`.
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
        if !path.exists() {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(path)
    }
}

impl AppContext for StandardContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            return Self::ensure_exists(root.clone());
        }
        let proj = ProjectDirs::from("com", "quickcap", "quickcap")
            .ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        Self::ensure_exists(proj.config_dir().to_path_buf())
    }
}

// --- Test Implementation ---

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// A fresh directory under the OS temp dir; tests panic if it cannot be created.
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("quickcap_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("config");
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Best-effort cleanup; ignore errors.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
