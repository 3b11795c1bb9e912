use crate::models::{Filter, Task, TaskId, TaskPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub local_tasks: Vec<Task>,
    pub api_tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: Filter,
}

/// Every state transition the store knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    LoadLocalTasks(Vec<Task>),
    AddLocalTask(Task),
    /// Merges the present fields of `patch` into the task with `id`.
    UpdateLocalTask { id: TaskId, patch: TaskPatch },
    DeleteLocalTask(TaskId),
    ReorderLocalTasks(Vec<Task>),
    SetFilter(Filter),
    FetchApiTasksRequest,
    FetchApiTasksSuccess(Vec<Task>),
    FetchApiTasksFailure(String),
    AddApiTask(Task),
    /// Replaces the whole record; the service answers updates with the full task.
    UpdateApiTask(Task),
    DeleteApiTask(TaskId),
}

impl Mutation {
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::LoadLocalTasks(_) => "load_local_tasks",
            Mutation::AddLocalTask(_) => "add_local_task",
            Mutation::UpdateLocalTask { .. } => "update_local_task",
            Mutation::DeleteLocalTask(_) => "delete_local_task",
            Mutation::ReorderLocalTasks(_) => "reorder_local_tasks",
            Mutation::SetFilter(_) => "set_filter",
            Mutation::FetchApiTasksRequest => "fetch_api_tasks_request",
            Mutation::FetchApiTasksSuccess(_) => "fetch_api_tasks_success",
            Mutation::FetchApiTasksFailure(_) => "fetch_api_tasks_failure",
            Mutation::AddApiTask(_) => "add_api_task",
            Mutation::UpdateApiTask(_) => "update_api_task",
            Mutation::DeleteApiTask(_) => "delete_api_task",
        }
    }
}

impl TaskState {
    /// Applies `mutation` in place and reports whether anything changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::LoadLocalTasks(tasks) | Mutation::ReorderLocalTasks(tasks) => {
                replace(&mut self.local_tasks, tasks)
            }
            Mutation::AddLocalTask(task) => {
                self.local_tasks.push(task);
                true
            }
            Mutation::UpdateLocalTask { id, patch } => {
                match self.local_tasks.iter_mut().find(|t| t.id == id) {
                    Some(task) => {
                        let before = task.clone();
                        task.apply_patch(&patch);
                        *task != before
                    }
                    None => false,
                }
            }
            Mutation::DeleteLocalTask(id) => remove_by_id(&mut self.local_tasks, &id),
            Mutation::SetFilter(filter) => replace(&mut self.filter, filter),
            Mutation::FetchApiTasksRequest => {
                let changed = !self.loading || self.error.is_some();
                self.loading = true;
                self.error = None;
                changed
            }
            Mutation::FetchApiTasksSuccess(tasks) => {
                let changed = self.loading || self.error.is_some() || self.api_tasks != tasks;
                self.loading = false;
                self.error = None;
                self.api_tasks = tasks;
                changed
            }
            Mutation::FetchApiTasksFailure(message) => {
                let changed = self.loading || self.error.as_deref() != Some(message.as_str());
                self.loading = false;
                self.error = Some(message);
                changed
            }
            Mutation::AddApiTask(task) => {
                self.api_tasks.push(task);
                true
            }
            Mutation::UpdateApiTask(task) => {
                match self.api_tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(existing) => replace(existing, task),
                    None => false,
                }
            }
            Mutation::DeleteApiTask(id) => remove_by_id(&mut self.api_tasks, &id),
        }
    }

    pub fn filtered_local_tasks(&self) -> Vec<Task> {
        self.local_tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .cloned()
            .collect()
    }
}

/// Pure transition: `(state, mutation) -> state'`.
pub fn reduce(mut state: TaskState, mutation: Mutation) -> TaskState {
    state.apply(mutation);
    state
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn remove_by_id(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task-{id}"),
            completed,
            order: None,
            created_at: None,
        }
    }

    fn with_local(tasks: Vec<Task>) -> TaskState {
        reduce(TaskState::default(), Mutation::LoadLocalTasks(tasks))
    }

    #[test]
    fn default_state_is_empty_and_idle() {
        let state = TaskState::default();
        assert!(state.local_tasks.is_empty());
        assert!(state.api_tasks.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.filter, Filter::All);
    }

    #[test]
    fn add_appends_and_load_replaces() {
        let state = with_local(vec![make_task("a", false)]);
        let state = reduce(state, Mutation::AddLocalTask(make_task("b", false)));
        let ids: Vec<_> = state.local_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);

        let state = reduce(state, Mutation::LoadLocalTasks(vec![make_task("z", true)]));
        assert_eq!(state.local_tasks.len(), 1);
        assert_eq!(state.local_tasks[0].id, "z");
    }

    #[test]
    fn update_local_merges_fields() {
        let mut task = make_task("a", false);
        task.order = Some(3);
        task.created_at = Some("2024-01-01T00:00:00.000Z".to_string());
        let state = with_local(vec![task]);

        let state = reduce(
            state,
            Mutation::UpdateLocalTask {
                id: "a".to_string(),
                patch: TaskPatch::completed(true),
            },
        );
        let updated = &state.local_tasks[0];
        assert!(updated.completed);
        assert_eq!(updated.title, "task-a");
        assert_eq!(updated.order, Some(3));
        assert!(updated.created_at.is_some());
    }

    #[test]
    fn update_local_with_unknown_id_is_a_no_op() {
        let mut state = with_local(vec![make_task("a", false), make_task("b", true)]);
        let before = state.clone();
        let changed = state.apply(Mutation::UpdateLocalTask {
            id: "missing".to_string(),
            patch: TaskPatch::title("nope"),
        });
        assert!(!changed);
        assert_eq!(state, before);
    }

    #[test]
    fn delete_local_twice_equals_once() {
        let state = with_local(vec![make_task("a", false), make_task("b", false)]);
        let once = reduce(state, Mutation::DeleteLocalTask("a".to_string()));
        let mut twice = once.clone();
        assert!(!twice.apply(Mutation::DeleteLocalTask("a".to_string())));
        assert_eq!(once, twice);
        assert_eq!(once.local_tasks.len(), 1);
    }

    #[test]
    fn fetch_lifecycle_tracks_loading_and_error() {
        let state = reduce(TaskState::default(), Mutation::FetchApiTasksRequest);
        assert!(state.loading);
        assert_eq!(state.error, None);

        let state = reduce(
            state,
            Mutation::FetchApiTasksSuccess(vec![make_task("r1", false)]),
        );
        assert!(!state.loading);
        assert_eq!(state.api_tasks.len(), 1);

        let state = reduce(state, Mutation::FetchApiTasksRequest);
        let state = reduce(state, Mutation::FetchApiTasksFailure("boom".to_string()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));

        let state = reduce(state, Mutation::FetchApiTasksRequest);
        assert_eq!(state.error, None);
    }

    #[test]
    fn fetch_failure_keeps_previous_api_tasks() {
        let state = reduce(
            TaskState::default(),
            Mutation::FetchApiTasksSuccess(vec![make_task("r1", false), make_task("r2", true)]),
        );
        let before = state.api_tasks.clone();
        let state = reduce(state, Mutation::FetchApiTasksRequest);
        let state = reduce(state, Mutation::FetchApiTasksFailure("offline".to_string()));
        assert_eq!(state.api_tasks, before);
    }

    #[test]
    fn update_api_replaces_the_whole_record() {
        let mut original = make_task("r1", false);
        original.order = Some(5);
        let state = reduce(
            TaskState::default(),
            Mutation::FetchApiTasksSuccess(vec![original]),
        );

        let state = reduce(state, Mutation::UpdateApiTask(make_task("r1", true)));
        let updated = &state.api_tasks[0];
        assert!(updated.completed);
        assert_eq!(updated.order, None);

        let unknown = reduce(state.clone(), Mutation::UpdateApiTask(make_task("nope", true)));
        assert_eq!(unknown, state);
    }

    #[test]
    fn add_and_delete_api_tasks() {
        let state = reduce(TaskState::default(), Mutation::AddApiTask(make_task("r1", false)));
        let state = reduce(state, Mutation::AddApiTask(make_task("r2", false)));
        let state = reduce(state, Mutation::DeleteApiTask("r1".to_string()));
        assert_eq!(state.api_tasks.len(), 1);
        assert_eq!(state.api_tasks[0].id, "r2");
    }

    #[test]
    fn filter_changes_view_but_not_collection() {
        let state = with_local(vec![make_task("a", true), make_task("b", false)]);
        let state = reduce(state, Mutation::SetFilter(Filter::Completed));
        let view = state.filtered_local_tasks();
        assert_eq!(view.len(), 1);
        assert!(view.iter().all(|t| t.completed));
        assert_eq!(state.local_tasks.len(), 2);

        let state = reduce(state, Mutation::SetFilter(Filter::Pending));
        assert_eq!(state.filtered_local_tasks()[0].id, "b");
        assert_eq!(state.local_tasks.len(), 2);
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(Mutation::FetchApiTasksRequest.kind(), "fetch_api_tasks_request");
        assert_eq!(
            Mutation::DeleteLocalTask("a".to_string()).kind(),
            "delete_local_task"
        );
    }
}
