use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quiesce_core::file_tree::FileItem;
use quiesce_core::manifest::load_manifest;

pub trait ItemLoader: Send + Sync {
    fn load(&self) -> Result<Vec<FileItem>>;
}

impl<F> ItemLoader for F
where
    F: Fn() -> Result<Vec<FileItem>> + Send + Sync,
{
    fn load(&self) -> Result<Vec<FileItem>> {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemLoader for ManifestLoader {
    fn load(&self) -> Result<Vec<FileItem>> {
        load_manifest(&self.path)
            .with_context(|| format!("failed to load file list from {}", self.path.display()))
    }
}
