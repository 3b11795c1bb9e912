use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Filter, Task};
use crate::mutation::{Mutation, TaskState};

/// Shared handle to the single authoritative [`TaskState`].
///
/// Clones point at the same state. Every dispatch is applied atomically and
/// observers obtained from [`TaskStore::subscribe`] are woken once per changing
/// dispatch.
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<watch::Sender<TaskState>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_state(TaskState::default())
    }

    pub fn with_state(state: TaskState) -> Self {
        let (sender, _receiver) = watch::channel(state);
        Self {
            inner: Arc::new(sender),
        }
    }

    /// Applies `mutation`. Never performs I/O and never fails.
    pub fn dispatch(&self, mutation: Mutation) {
        let kind = mutation.kind();
        let changed = self.inner.send_if_modified(|state| state.apply(mutation));
        log::debug!("dispatch kind={kind} changed={changed}");
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.inner.subscribe()
    }

    /// Drops everything back to the initial state and notifies observers.
    pub fn reset(&self) {
        self.inner.send_replace(TaskState::default());
    }

    pub fn state(&self) -> TaskState {
        self.inner.borrow().clone()
    }

    pub fn local_tasks(&self) -> Vec<Task> {
        self.inner.borrow().local_tasks.clone()
    }

    pub fn api_tasks(&self) -> Vec<Task> {
        self.inner.borrow().api_tasks.clone()
    }

    pub fn filter(&self) -> Filter {
        self.inner.borrow().filter
    }

    pub fn filtered_local_tasks(&self) -> Vec<Task> {
        self.inner.borrow().filtered_local_tasks()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
