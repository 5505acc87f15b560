//! Filesystem-based asset source for loading the sprite sheet and other assets.

use gpui::{AssetSource, SharedString};
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Filesystem-based asset source that looks for assets in multiple locations
#[derive(Clone, Debug)]
pub struct FileAssets {
    base_path: Option<PathBuf>,
}

impl FileAssets {
    pub fn new() -> Self {
        let base_path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));
        Self { base_path }
    }

    /// Asset source rooted at a fixed directory
    #[allow(dead_code)]
    pub fn with_base(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    /// Candidate locations for a relative asset path, most specific first
    fn candidates(&self, path: &str) -> Vec<PathBuf> {
        let relative = Path::new(path);
        let mut paths = Vec::new();
        if let Some(base) = &self.base_path {
            paths.push(base.join(relative));
        }
        paths.push(relative.to_path_buf());
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(relative));
        }
        paths
    }

    /// First existing location of an asset, if any
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.candidates(path).into_iter().find(|p| p.is_file())
    }
}

impl Default for FileAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for FileAssets {
    /// `Ok(None)` only when no candidate exists; any other read error is returned
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        for p in self.candidates(path) {
            match fs::read(&p) {
                Ok(data) => return Ok(Some(Cow::Owned(data))),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(anyhow::anyhow!("reading {}: {e}", p.display())),
            }
        }
        Ok(None)
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        let Some(dir_path) = self.resolve_dir(path) else {
            return Ok(Vec::new());
        };
        let mut results = Vec::new();

        if let Ok(entries) = fs::read_dir(&dir_path) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    results.push(SharedString::from(name.to_string()));
                }
            }
        }
        Ok(results)
    }
}

impl FileAssets {
    fn resolve_dir(&self, path: &str) -> Option<PathBuf> {
        self.candidates(path).into_iter().find(|p| p.is_dir())
    }
}
