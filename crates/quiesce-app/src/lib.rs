mod loader;
mod refresh;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quiesce_core::config::{QuiesceConfig, load_config_or_default, resolve_config_path};
use quiesce_core::file_tree::{FileTreeViewModel, SharedItems};
use quiesce_core::{PendingTask, Signal, TaskError, TaskRegistry};
use thiserror::Error;

pub use loader::{ItemLoader, ManifestLoader};
pub use refresh::RefreshMode;
pub use worker::{PendingHandle, PendingOptions, PendingOutcome, WorkerHandle};

use refresh::RefreshPipeline;
use worker::{spawn_pending, spawn_worker};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to spawn worker thread '{name}'")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("worker thread '{name}' panicked")]
    WorkerPanicked { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub busy: bool,
    pub pending_labels: Vec<String>,
}

pub fn load_user_config() -> Result<QuiesceConfig> {
    let config_path = resolve_config_path().context("failed to resolve config path")?;
    load_config_or_default(&config_path).with_context(|| {
        format!(
            "invalid config at {}\nFix the config and retry.",
            config_path.display()
        )
    })
}

pub struct App {
    config: QuiesceConfig,
    registry: TaskRegistry,
    items: Arc<SharedItems>,
    tree: Arc<FileTreeViewModel>,
    loader: Arc<dyn ItemLoader>,
}

impl App {
    pub fn new(config: QuiesceConfig, loader: Arc<dyn ItemLoader>) -> Self {
        let items = Arc::new(SharedItems::default());
        let tree = Arc::new(FileTreeViewModel::new(
            items.clone(),
            config.tree.options(),
            config.tree.default_filter,
        ));

        Self {
            config,
            registry: TaskRegistry::new(),
            items,
            tree,
            loader,
        }
    }

    pub fn config(&self) -> &QuiesceConfig {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn tree(&self) -> &Arc<FileTreeViewModel> {
        &self.tree
    }

    pub fn items(&self) -> &Arc<SharedItems> {
        &self.items
    }

    pub fn refresh_files(&self, mode: RefreshMode) -> Result<()> {
        let pipeline = self.pipeline();
        match mode {
            RefreshMode::Sync => {
                let task = self.registry.new_task();
                let result = pipeline.run();
                task.done();
                result.map(|_| ())
            }
            RefreshMode::Async => {
                self.run_in_background("quiesce-refresh", move || pipeline.run())?;
                Ok(())
            }
        }
    }

    pub fn run_in_background<T, F>(
        &self,
        name: &str,
        work: F,
    ) -> Result<WorkerHandle<T>, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let task = self.registry.new_task();
        tracing::debug!(worker = name, task = %task.id(), "starting background work");
        spawn_worker(name.to_string(), move || {
            let result = work();
            task.done();
            result
        })
    }

    pub fn start_pending<T, F>(
        &self,
        label: &str,
        options: PendingOptions,
        work: F,
    ) -> Result<PendingHandle<T>, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&PendingTask) -> Result<T> + Send + 'static,
    {
        let cancel = Signal::new();
        let begin = if options.deferred {
            Signal::new()
        } else {
            Signal::raised()
        };
        let pending = self
            .registry
            .new_pending_task(label, cancel.clone(), begin.clone());
        tracing::debug!(pending = %pending.id(), label, deferred = options.deferred, "pending work queued");

        spawn_pending(pending, cancel, begin, work)
    }

    /// Runs a fetch/pull style operation as pending work and refreshes the
    /// file tree before the work is reported finished. Skips the refresh
    /// when cancelled.
    pub fn run_then_refresh<T, F>(&self, label: &str, op: F) -> Result<PendingHandle<T>, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&PendingTask) -> Result<T> + Send + 'static,
    {
        let pipeline = self.pipeline();
        let owned_label = label.to_string();
        self.start_pending(label, PendingOptions::default(), move |pending| {
            let value = op(pending).with_context(|| format!("{owned_label} failed"))?;
            if !pending.is_cancel_requested() {
                pipeline
                    .run()
                    .with_context(|| format!("refresh after {owned_label} failed"))?;
            }
            Ok(value)
        })
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            busy: self.registry.is_busy(),
            pending_labels: self.registry.pending_task_labels(),
        }
    }

    pub fn wait_until_idle(&self) -> Result<(), TaskError> {
        self.wait_until_idle_for(self.config.tasks.idle_timeout())
    }

    pub fn wait_until_idle_for(&self, timeout: Duration) -> Result<(), TaskError> {
        self.registry.wait_until_idle(timeout)
    }

    fn pipeline(&self) -> RefreshPipeline {
        RefreshPipeline {
            loader: self.loader.clone(),
            items: self.items.clone(),
            tree: self.tree.clone(),
        }
    }
}
