pub mod config;
pub mod file_tree;
pub mod manifest;
pub mod registry;
pub mod signal;
pub mod task;
#[cfg(test)]
pub(crate) mod test_support;

pub use registry::{TaskError, TaskRegistry};
pub use signal::Signal;
pub use task::{BeginOutcome, PendingTask, Task, TaskId};
