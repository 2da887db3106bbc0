use std::fmt;
use std::time::Duration;

use crate::registry::TaskRegistry;
use crate::signal::Signal;

const BEGIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of in-flight work. The registry counts as busy while any task
/// is alive.
///
/// `done` consumes the handle, so a task cannot be completed twice. A task
/// that is dropped without `done` is completed on drop.
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    registry: Option<TaskRegistry>,
}

impl Task {
    pub(crate) fn new(id: TaskId, registry: TaskRegistry) -> Self {
        Self {
            id,
            registry: Some(registry),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_busy(&self) -> bool {
        self.registry.is_some()
    }

    pub fn done(mut self) {
        self.complete();
    }

    fn complete(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.complete_task(self.id);
        }
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if self.registry.is_some() {
            tracing::debug!(task = %self.id, "task dropped before completion");
            self.complete();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Done,
    Cancelled,
    Dropped,
}

impl Completion {
    fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Dropped => "dropped",
        }
    }
}

/// A labelled task the user can see in a "running" indicator and cancel.
///
/// Cancellation is cooperative: the worker polls [`PendingTask::is_cancel_requested`]
/// and finishes with [`PendingTask::acknowledge_cancel`]. Finishing in any way
/// removes the entry from the pending list and then completes the wrapped task.
#[derive(Debug)]
pub struct PendingTask {
    id: TaskId,
    label: String,
    cancel: Signal,
    begin: Signal,
    underlying: Option<Task>,
    registry: Option<TaskRegistry>,
}

impl PendingTask {
    pub(crate) fn new(
        id: TaskId,
        label: String,
        cancel: Signal,
        begin: Signal,
        underlying: Task,
        registry: TaskRegistry,
    ) -> Self {
        Self {
            id,
            label,
            cancel,
            begin,
            underlying: Some(underlying),
            registry: Some(registry),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn task_id(&self) -> Option<TaskId> {
        self.underlying.as_ref().map(Task::id)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cancel_signal(&self) -> &Signal {
        &self.cancel
    }

    pub fn begin_signal(&self) -> &Signal {
        &self.begin
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_raised()
    }

    /// Blocks until the begin signal or the cancel signal is raised.
    /// Cancellation wins when both are raised.
    pub fn wait_for_begin(&self) -> BeginOutcome {
        loop {
            if self.cancel.is_raised() {
                return BeginOutcome::Cancelled;
            }
            if self.begin.wait_timeout(BEGIN_POLL_INTERVAL) {
                return if self.cancel.is_raised() {
                    BeginOutcome::Cancelled
                } else {
                    BeginOutcome::Started
                };
            }
        }
    }

    pub fn done(mut self) {
        self.finish(Completion::Done);
    }

    pub fn acknowledge_cancel(mut self) {
        self.finish(Completion::Cancelled);
    }

    fn finish(&mut self, completion: Completion) {
        let Some(registry) = self.registry.take() else {
            return;
        };

        registry.remove_pending_task(self.id);
        if let Some(task) = self.underlying.take() {
            task.done();
        }

        tracing::debug!(
            pending = %self.id,
            label = %self.label,
            outcome = completion.as_str(),
            "pending task finished"
        );
    }
}

impl Drop for PendingTask {
    fn drop(&mut self) {
        self.finish(Completion::Dropped);
    }
}
