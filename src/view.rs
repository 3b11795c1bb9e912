//! Read-side helpers for presenting task lists: filter, search and sort.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};

use crate::models::{Filter, Task};
use crate::mutation::TaskState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Order,
    Title,
    CreatedAt,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Picking the active key again flips the direction; a new key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            Self { key, direction }
        } else {
            Self {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "order" => Ok(SortKey::Order),
            "title" => Ok(SortKey::Title),
            "created_at" | "created" | "date" => Ok(SortKey::CreatedAt),
            "status" => Ok(SortKey::Status),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalQuery {
    pub search: String,
    pub sort: SortSpec,
}

pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

/// Case-insensitive title substring match. An empty term keeps everything.
pub fn search_tasks(tasks: &[Task], term: &str) -> Vec<Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable sort; ties keep their incoming order.
pub fn sort_tasks(tasks: &[Task], spec: SortSpec) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, spec.key);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Order => a.sort_order().cmp(&b.sort_order()),
        SortKey::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortKey::CreatedAt => created_at(a).cmp(&created_at(b)),
        // Completed first when ascending.
        SortKey::Status => b.completed.cmp(&a.completed),
    }
}

fn created_at(task: &Task) -> Option<DateTime<FixedOffset>> {
    task.created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

/// Local tasks as displayed: the state's filter, then the search term, then the sort.
pub fn local_view(state: &TaskState, query: &LocalQuery) -> Vec<Task> {
    let filtered = filter_tasks(&state.local_tasks, state.filter);
    let searched = search_tasks(&filtered, &query.search);
    sort_tasks(&searched, query.sort)
}

/// Detail lookup: the local collection wins over the remote one.
pub fn find_task<'a>(state: &'a TaskState, id: &str) -> Option<(&'a Task, bool)> {
    if let Some(task) = state.local_tasks.iter().find(|t| t.id == id) {
        return Some((task, true));
    }
    state
        .api_tasks
        .iter()
        .find(|t| t.id == id)
        .map(|task| (task, false))
}
