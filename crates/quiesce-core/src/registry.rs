use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::signal::Signal;
use crate::task::{PendingTask, Task, TaskId};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(
        "background work still running after {waited:?} ({in_flight} task(s) in flight, pending: [{}])",
        .pending.join(", ")
    )]
    IdleTimeout {
        waited: Duration,
        in_flight: usize,
        pending: Vec<String>,
    },
}

#[derive(Debug)]
struct TaskRecord {
    started_at: Instant,
}

#[derive(Debug)]
struct PendingRecord {
    id: TaskId,
    label: String,
}

#[derive(Debug)]
struct IdleListener {
    id: u64,
    sender: SyncSender<()>,
}

#[derive(Debug, Default)]
struct RegistryState {
    tasks: HashMap<TaskId, TaskRecord>,
    pending: Vec<PendingRecord>,
    idle_listeners: Vec<IdleListener>,
    next_id: u64,
    next_listener_id: u64,
}

impl RegistryState {
    fn issue_id(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId::new(self.next_id)
    }

    fn is_busy(&self) -> bool {
        !self.tasks.is_empty()
    }

    fn register_listener(&mut self, sender: SyncSender<()>) {
        self.next_listener_id += 1;
        self.idle_listeners.push(IdleListener {
            id: self.next_listener_id,
            sender,
        });
    }
}

/// Idle listeners are notified with a blocking `send` once per busy -> idle
/// transition, before the call that completed the last task returns. A
/// listener must receive promptly or use a buffered channel; a full
/// rendezvous channel stalls the completing worker until it is drained.
/// Dropping the receiver unsubscribes the listener.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_task(&self) -> Task {
        let mut state = self.lock();
        let id = state.issue_id();
        state.tasks.insert(
            id,
            TaskRecord {
                started_at: Instant::now(),
            },
        );
        tracing::trace!(task = %id, in_flight = state.tasks.len(), "task started");
        Task::new(id, self.clone())
    }

    pub fn new_pending_task(
        &self,
        label: impl Into<String>,
        cancel: Signal,
        begin: Signal,
    ) -> PendingTask {
        let underlying = self.new_task();
        let label = label.into();

        let id = {
            let mut state = self.lock();
            let id = state.issue_id();
            state.pending.push(PendingRecord {
                id,
                label: label.clone(),
            });
            id
        };

        tracing::debug!(pending = %id, task = %underlying.id(), label = %label, "pending task started");
        PendingTask::new(id, label, cancel, begin, underlying, self.clone())
    }

    pub fn pending_task_labels(&self) -> Vec<String> {
        self.lock()
            .pending
            .iter()
            .map(|pending| pending.label.clone())
            .collect()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn add_idle_listener(&self, listener: SyncSender<()>) {
        self.lock().register_listener(listener);
    }

    pub fn wait_until_idle(&self, timeout: Duration) -> Result<(), TaskError> {
        let (sender, receiver) = mpsc::sync_channel(1);
        {
            let mut state = self.lock();
            if !state.is_busy() {
                return Ok(());
            }
            state.register_listener(sender);
        }

        match receiver.recv_timeout(timeout) {
            Ok(()) => Ok(()),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                let state = self.lock();
                Err(TaskError::IdleTimeout {
                    waited: timeout,
                    in_flight: state.tasks.len(),
                    pending: state
                        .pending
                        .iter()
                        .map(|pending| pending.label.clone())
                        .collect(),
                })
            }
        }
    }

    pub(crate) fn complete_task(&self, id: TaskId) {
        self.mutate(|state| {
            if let Some(record) = state.tasks.remove(&id) {
                tracing::trace!(
                    task = %id,
                    elapsed_ms = record.started_at.elapsed().as_millis() as u64,
                    in_flight = state.tasks.len(),
                    "task completed"
                );
            }
        });
    }

    pub(crate) fn remove_pending_task(&self, id: TaskId) {
        self.mutate(|state| state.pending.retain(|pending| pending.id != id));
    }

    fn mutate(&self, change: impl FnOnce(&mut RegistryState)) {
        let to_notify = {
            let mut state = self.lock();
            let was_busy = state.is_busy();
            change(&mut state);

            if was_busy && !state.is_busy() {
                tracing::debug!(listeners = state.idle_listeners.len(), "registry is idle");
                state
                    .idle_listeners
                    .iter()
                    .map(|listener| (listener.id, listener.sender.clone()))
                    .collect::<Vec<_>>()
            } else {
                Vec::new()
            }
        };

        self.notify_idle(to_notify);
    }

    fn notify_idle(&self, listeners: Vec<(u64, SyncSender<()>)>) {
        let mut disconnected = Vec::new();
        for (id, sender) in listeners {
            if sender.send(()).is_err() {
                disconnected.push(id);
            }
        }

        if disconnected.is_empty() {
            return;
        }

        let mut state = self.lock();
        state
            .idle_listeners
            .retain(|listener| !disconnected.contains(&listener.id));
        tracing::debug!(count = disconnected.len(), "dropped idle listeners without receivers");
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::{TaskError, TaskRegistry};
    use crate::signal::Signal;

    fn drain(receiver: &mpsc::Receiver<()>) -> usize {
        receiver.try_iter().count()
    }

    #[test]
    fn starts_idle_and_tracks_task_map() {
        let registry = TaskRegistry::new();
        assert!(!registry.is_busy());

        let first = registry.new_task();
        let second = registry.new_task();
        assert!(registry.is_busy());
        assert_eq!(registry.in_flight_count(), 2);
        assert!(first.is_busy());

        first.done();
        assert!(registry.is_busy());
        second.done();
        assert!(!registry.is_busy());
        assert_eq!(registry.in_flight_count(), 0);
    }

    #[test]
    fn identities_are_never_reused() {
        let registry = TaskRegistry::new();
        let first = registry.new_task();
        let first_id = first.id();
        first.done();

        let second = registry.new_task();
        assert!(second.id() > first_id);

        let pending = registry.new_pending_task("fetch", Signal::new(), Signal::new());
        assert!(pending.id() > second.id());
        assert_ne!(pending.task_id(), Some(pending.id()));
    }

    #[test]
    fn notifies_each_listener_once_per_busy_period() {
        let registry = TaskRegistry::new();
        let (first_tx, first_rx) = mpsc::sync_channel(8);
        let (second_tx, second_rx) = mpsc::sync_channel(8);
        registry.add_idle_listener(first_tx);
        registry.add_idle_listener(second_tx);

        let a = registry.new_task();
        let b = registry.new_task();
        a.done();
        assert_eq!(drain(&first_rx), 0);
        b.done();
        assert_eq!(drain(&first_rx), 1);
        assert_eq!(drain(&second_rx), 1);

        registry.new_task().done();
        assert_eq!(drain(&first_rx), 1);
        assert_eq!(drain(&second_rx), 1);
    }

    #[test]
    fn starting_work_never_notifies() {
        let registry = TaskRegistry::new();
        let (tx, rx) = mpsc::sync_channel(8);
        registry.add_idle_listener(tx);

        let task = registry.new_task();
        assert_eq!(drain(&rx), 0);
        drop(task);
        assert_eq!(drain(&rx), 1);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let registry = TaskRegistry::new();
        let (gone_tx, gone_rx) = mpsc::sync_channel(1);
        let (live_tx, live_rx) = mpsc::sync_channel(8);
        registry.add_idle_listener(gone_tx);
        registry.add_idle_listener(live_tx);
        drop(gone_rx);

        registry.new_task().done();
        registry.new_task().done();

        assert_eq!(drain(&live_rx), 2);
        assert_eq!(registry.lock().idle_listeners.len(), 1);
    }

    #[test]
    fn pending_labels_follow_start_order_after_out_of_order_completion() {
        let registry = TaskRegistry::new();
        let fetch = registry.new_pending_task("Fetching", Signal::new(), Signal::new());
        let pull = registry.new_pending_task("Pulling", Signal::new(), Signal::new());
        let push = registry.new_pending_task("Pushing", Signal::new(), Signal::new());
        assert_eq!(
            registry.pending_task_labels(),
            vec!["Fetching", "Pulling", "Pushing"]
        );

        pull.done();
        assert_eq!(registry.pending_task_labels(), vec!["Fetching", "Pushing"]);
        assert!(registry.is_busy());

        push.acknowledge_cancel();
        fetch.done();
        assert!(registry.pending_task_labels().is_empty());
        assert!(!registry.is_busy());
    }

    #[test]
    fn pending_completion_fires_idle_once() {
        let registry = TaskRegistry::new();
        let (tx, rx) = mpsc::sync_channel(8);
        registry.add_idle_listener(tx);

        let pending = registry.new_pending_task("Fetching", Signal::new(), Signal::new());
        assert!(registry.is_busy());
        pending.done();

        assert!(!registry.is_busy());
        assert_eq!(drain(&rx), 1);
    }

    #[test]
    fn wait_until_idle_returns_when_workers_finish() {
        let registry = TaskRegistry::new();
        assert!(registry.wait_until_idle(Duration::from_millis(1)).is_ok());

        let workers: Vec<_> = (0..8)
            .map(|index| {
                let task = registry.new_task();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(5 * index));
                    task.done();
                })
            })
            .collect();

        registry
            .wait_until_idle(Duration::from_secs(5))
            .expect("idle after workers");
        assert!(!registry.is_busy());
        for worker in workers {
            worker.join().expect("worker");
        }
    }

    #[test]
    fn wait_until_idle_reports_outstanding_work() {
        let registry = TaskRegistry::new();
        let _pending = registry.new_pending_task("Pulling", Signal::new(), Signal::new());

        let error = registry
            .wait_until_idle(Duration::from_millis(20))
            .expect_err("still busy");
        let TaskError::IdleTimeout {
            in_flight, pending, ..
        } = &error;
        assert_eq!(*in_flight, 1);
        assert_eq!(pending, &vec!["Pulling".to_string()]);
        assert!(error.to_string().contains("Pulling"));
    }

    #[test]
    fn concurrent_churn_ends_idle_with_consistent_notifications() {
        let registry = TaskRegistry::new();
        let (tx, rx) = mpsc::sync_channel(1024);
        registry.add_idle_listener(tx);

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let task = registry.new_task();
                        let pending =
                            registry.new_pending_task("churn", Signal::new(), Signal::new());
                        pending.done();
                        task.done();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker");
        }

        assert!(!registry.is_busy());
        assert!(registry.pending_task_labels().is_empty());
        let notifications = drain(&rx);
        assert!(notifications >= 1);
        assert!(notifications <= 400);
    }

    #[test]
    fn rendezvous_listener_holds_the_completing_call_until_received() {
        let registry = TaskRegistry::new();
        let (tx, rx) = mpsc::sync_channel(0);
        registry.add_idle_listener(tx);

        let task = registry.new_task();
        let (returned_tx, returned_rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            task.done();
            returned_tx.send(()).expect("report return");
        });

        assert!(returned_rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert!(!registry.is_busy());

        rx.recv_timeout(Duration::from_secs(5))
            .expect("idle notification");
        returned_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("completion returns after delivery");
        worker.join().expect("worker");
    }

    #[test]
    fn each_busy_period_notifies_exactly_once() {
        let registry = TaskRegistry::new();
        let (tx, rx) = mpsc::sync_channel(1024);
        registry.add_idle_listener(tx);

        for round in 0..500 {
            if round % 2 == 0 {
                registry
                    .new_pending_task("Fetching", Signal::new(), Signal::new())
                    .done();
            } else {
                registry.new_task().done();
            }
        }

        assert_eq!(drain(&rx), 500);
    }
}
