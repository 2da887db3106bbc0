use std::thread::{self, JoinHandle};

use anyhow::Result;
use quiesce_core::{BeginOutcome, PendingTask, Signal, TaskId};

use crate::AppError;

#[derive(Debug)]
pub struct WorkerHandle<T> {
    name: String,
    handle: JoinHandle<Result<T>>,
}

impl<T> WorkerHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join(self) -> Result<T> {
        let name = self.name;
        self.handle
            .join()
            .map_err(|_| AppError::WorkerPanicked { name })?
    }
}

pub(crate) fn spawn_worker<T, F>(name: String, work: F) -> Result<WorkerHandle<T>, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let thread_name = name.clone();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let result = work();
            if let Err(error) = &result {
                let message = format!("{error:#}");
                tracing::warn!(worker = %thread_name, error = %message, "background work failed");
            }
            result
        })
        .map_err(|source| AppError::Spawn {
            name: name.clone(),
            source,
        })?;

    Ok(WorkerHandle { name, handle })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingOptions {
    pub deferred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> PendingOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

#[derive(Debug)]
pub struct PendingHandle<T> {
    id: TaskId,
    label: String,
    cancel: Signal,
    begin: Signal,
    worker: WorkerHandle<PendingOutcome<T>>,
}

impl<T> PendingHandle<T> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn begin(&self) {
        self.begin.raise();
    }

    pub fn cancel(&self) {
        tracing::debug!(pending = %self.id, label = %self.label, "cancel requested");
        self.cancel.raise();
    }

    pub fn join(self) -> Result<PendingOutcome<T>> {
        self.worker.join()
    }
}

pub(crate) fn spawn_pending<T, F>(
    pending: PendingTask,
    cancel: Signal,
    begin: Signal,
    work: F,
) -> Result<PendingHandle<T>, AppError>
where
    T: Send + 'static,
    F: FnOnce(&PendingTask) -> Result<T> + Send + 'static,
{
    let id = pending.id();
    let label = pending.label().to_string();

    let worker = spawn_worker(format!("quiesce-pending-{id}"), move || {
        if pending.wait_for_begin() == BeginOutcome::Cancelled {
            pending.acknowledge_cancel();
            return Ok(PendingOutcome::Cancelled);
        }

        let result = work(&pending);
        if pending.is_cancel_requested() {
            pending.acknowledge_cancel();
            return result.map(|_| PendingOutcome::Cancelled);
        }
        pending.done();
        result.map(PendingOutcome::Completed)
    })?;

    Ok(PendingHandle {
        id,
        label,
        cancel,
        begin,
        worker,
    })
}
