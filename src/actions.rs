use crate::models::{Filter, NewTask, OrderEntry, Task, TaskPatch};
use crate::mutation::Mutation;
use crate::remote::TaskService;
use crate::reorder::{merge_persisted_order, move_task, order_entries};
use crate::state::TaskStore;
use crate::storage::{KeyValueStore, StorageError, API_ORDER_KEY, LOCAL_TASKS_KEY};

/// Side-effecting operations. Each one does its storage or HTTP work first and then
/// dispatches the matching [`Mutation`] to the store.
pub struct TaskActions<K, R> {
    store: TaskStore,
    storage: K,
    remote: R,
}

impl<K: KeyValueStore, R: TaskService> TaskActions<K, R> {
    pub fn new(store: TaskStore, storage: K, remote: R) -> Self {
        Self {
            store,
            storage,
            remote,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    fn persist_local(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.storage.set(LOCAL_TASKS_KEY, tasks)
    }

    /// Missing or unreadable data loads as an empty list.
    pub fn load_local_tasks(&self) {
        let tasks = match self.storage.get::<Vec<Task>>(LOCAL_TASKS_KEY) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(error) => {
                log::warn!("local tasks unreadable, starting empty: {error}");
                Vec::new()
            }
        };
        log::info!("loaded local tasks count={}", tasks.len());
        self.store.dispatch(Mutation::LoadLocalTasks(tasks));
    }

    pub fn add_local_task(&self, task: Task) -> Result<(), StorageError> {
        let mut tasks = self.store.local_tasks();
        tasks.push(task.clone());
        self.persist_local(&tasks)?;
        self.store.dispatch(Mutation::AddLocalTask(task));
        Ok(())
    }

    pub fn update_local_task(&self, id: &str, patch: TaskPatch) -> Result<(), StorageError> {
        let mut tasks = self.store.local_tasks();
        if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
            task.apply_patch(&patch);
        }
        self.persist_local(&tasks)?;
        self.store.dispatch(Mutation::UpdateLocalTask {
            id: id.to_string(),
            patch,
        });
        Ok(())
    }

    pub fn delete_local_task(&self, id: &str) -> Result<(), StorageError> {
        let mut tasks = self.store.local_tasks();
        tasks.retain(|task| task.id != id);
        self.persist_local(&tasks)?;
        self.store.dispatch(Mutation::DeleteLocalTask(id.to_string()));
        Ok(())
    }

    /// Persists `tasks` as given; callers compute the new order (see [`move_task`]).
    pub fn reorder_local_tasks(&self, tasks: Vec<Task>) -> Result<(), StorageError> {
        self.persist_local(&tasks)?;
        self.store.dispatch(Mutation::ReorderLocalTasks(tasks));
        Ok(())
    }

    pub fn set_filter(&self, filter: Filter) {
        self.store.dispatch(Mutation::SetFilter(filter));
    }

    /// Failures end up in the state's `error` slot; this never errors to the caller.
    pub async fn fetch_api_tasks(&self, search: Option<&str>) {
        self.store.dispatch(Mutation::FetchApiTasksRequest);
        match self.remote.list(search).await {
            Ok(tasks) => {
                log::info!("fetched api tasks count={}", tasks.len());
                self.store.dispatch(Mutation::FetchApiTasksSuccess(tasks));
            }
            Err(error) => {
                log::warn!("fetching api tasks failed: {error}");
                self.store
                    .dispatch(Mutation::FetchApiTasksFailure(error.to_string()));
            }
        }
    }

    /// Remote mutation failures are logged and otherwise dropped; the returned flag
    /// is the only signal the caller gets.
    pub async fn add_api_task(&self, task: NewTask) -> bool {
        match self.remote.create(&task).await {
            Ok(created) => {
                self.store.dispatch(Mutation::AddApiTask(created));
                true
            }
            Err(error) => {
                log::error!("adding api task failed: {error}");
                false
            }
        }
    }

    pub async fn update_api_task(&self, id: &str, patch: TaskPatch) -> bool {
        match self.remote.update(id, &patch).await {
            Ok(updated) => {
                self.store.dispatch(Mutation::UpdateApiTask(updated));
                true
            }
            Err(error) => {
                log::error!("updating api task id={id} failed: {error}");
                false
            }
        }
    }

    pub async fn delete_api_task(&self, id: &str) -> bool {
        match self.remote.delete(id).await {
            Ok(()) => {
                self.store.dispatch(Mutation::DeleteApiTask(id.to_string()));
                true
            }
            Err(error) => {
                log::error!("deleting api task id={id} failed: {error}");
                false
            }
        }
    }

    /// Cached drag order for remote tasks. `None` if there is none or it is corrupt.
    fn api_order(&self) -> Option<Vec<OrderEntry>> {
        match self.storage.get::<Vec<OrderEntry>>(API_ORDER_KEY) {
            Ok(cache) => cache,
            Err(error) => {
                log::warn!("api order cache unreadable, ignoring it: {error}");
                None
            }
        }
    }

    /// Remote tasks in display order: the last fetch merged with the cached drag order.
    pub fn api_tasks_view(&self) -> Vec<Task> {
        let fetched = self.store.api_tasks();
        match self.api_order() {
            Some(cache) if !fetched.is_empty() => merge_persisted_order(&fetched, &cache),
            _ => fetched,
        }
    }

    /// Drag reorder over [`Self::api_tasks_view`]; only the order cache is written.
    pub fn reorder_api_tasks(&self, dragged_id: &str, target: usize) -> Result<bool, StorageError> {
        let view = self.api_tasks_view();
        let Some(reordered) = move_task(&view, dragged_id, target) else {
            return Ok(false);
        };
        self.storage.set(API_ORDER_KEY, &order_entries(&reordered))?;
        Ok(true)
    }

    /// Drops `id` from the order cache, typically after deleting the remote task.
    pub fn forget_api_order(&self, id: &str) -> Result<(), StorageError> {
        let Some(mut cache) = self.api_order() else {
            return Ok(());
        };
        cache.retain(|entry| entry.id != id);
        self.storage.set(API_ORDER_KEY, &cache)
    }
}
