use std::sync::Arc;

use anyhow::{Context, Result};
use quiesce_core::file_tree::{FileTreeViewModel, SharedItems};

use crate::loader::ItemLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    Sync,
    Async,
}

#[derive(Clone)]
pub(crate) struct RefreshPipeline {
    pub(crate) loader: Arc<dyn ItemLoader>,
    pub(crate) items: Arc<SharedItems>,
    pub(crate) tree: Arc<FileTreeViewModel>,
}

impl RefreshPipeline {
    pub(crate) fn run(&self) -> Result<usize> {
        let items = self.loader.load().context("failed to refresh files")?;
        let count = items.len();

        self.items.replace(items);
        self.tree.set_tree();
        self.tree.clamp_selection();

        tracing::debug!(files = count, rows = self.tree.snapshot().len(), "files refreshed");
        Ok(count)
    }
}
