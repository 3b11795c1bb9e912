//! List surgery for manual ordering.
//!
//! `move_task` implements a drag-and-drop move, `merge_persisted_order` re-applies a
//! cached ordering to a freshly fetched remote list.

use std::collections::HashMap;

use crate::models::{OrderEntry, Task};

/// Moves the task `dragged_id` to `target` and renumbers `order` densely from 0.
///
/// `target` is a position in whatever view the drop happened in; it is clamped to
/// the end of the list. Returns `None` when the task is unknown or already sits at
/// `target`, in which case nothing should be persisted or dispatched.
pub fn move_task(tasks: &[Task], dragged_id: &str, target: usize) -> Option<Vec<Task>> {
    let source = tasks.iter().position(|task| task.id == dragged_id)?;
    let target = target.min(tasks.len() - 1);
    if source == target {
        return None;
    }

    let mut reordered = tasks.to_vec();
    let dragged = reordered.remove(source);
    reordered.insert(target, dragged);
    for (index, task) in reordered.iter_mut().enumerate() {
        task.order = Some(index as i64);
    }
    Some(reordered)
}

/// Attaches cached orders to `fetched` and stable-sorts ascending by order.
///
/// Tasks without a cached order keep whatever `order` they arrived with (usually
/// none, which sorts as 0). Cache entries for ids that no longer exist are ignored.
pub fn merge_persisted_order(fetched: &[Task], cache: &[OrderEntry]) -> Vec<Task> {
    let orders: HashMap<&str, i64> = cache
        .iter()
        .map(|entry| (entry.id.as_str(), entry.order))
        .collect();

    let mut merged: Vec<Task> = fetched
        .iter()
        .cloned()
        .map(|mut task| {
            if let Some(order) = orders.get(task.id.as_str()) {
                task.order = Some(*order);
            }
            task
        })
        .collect();
    merged.sort_by_key(Task::sort_order);
    merged
}

pub fn order_entries(tasks: &[Task]) -> Vec<OrderEntry> {
    tasks
        .iter()
        .map(|task| OrderEntry {
            id: task.id.clone(),
            order: task.sort_order(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task-{id}"),
            completed: false,
            order: None,
            created_at: None,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn entry(id: &str, order: i64) -> OrderEntry {
        OrderEntry {
            id: id.to_string(),
            order,
        }
    }

    #[test]
    fn moving_first_to_last_renumbers_densely() {
        let tasks = vec![make_task("A"), make_task("B"), make_task("C")];
        let moved = move_task(&tasks, "A", 2).expect("move happens");
        assert_eq!(ids(&moved), ["B", "C", "A"]);
        let orders: Vec<_> = moved.iter().map(|t| t.order).collect();
        assert_eq!(orders, [Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn moving_last_to_front() {
        let tasks = vec![make_task("A"), make_task("B"), make_task("C")];
        let moved = move_task(&tasks, "C", 0).expect("move happens");
        assert_eq!(ids(&moved), ["C", "A", "B"]);
        assert_eq!(moved[0].order, Some(0));
    }

    #[test]
    fn same_position_is_a_no_op() {
        let tasks = vec![make_task("A"), make_task("B")];
        assert!(move_task(&tasks, "B", 1).is_none());
    }

    #[test]
    fn unknown_task_is_a_no_op() {
        let tasks = vec![make_task("A"), make_task("B")];
        assert!(move_task(&tasks, "Z", 0).is_none());
    }

    #[test]
    fn target_past_the_end_appends() {
        let tasks = vec![make_task("A"), make_task("B"), make_task("C")];
        let moved = move_task(&tasks, "A", 10).expect("move happens");
        assert_eq!(ids(&moved), ["B", "C", "A"]);
        assert!(move_task(&tasks, "C", 10).is_none());
    }

    #[test]
    fn merge_attaches_cached_orders_with_stable_ties() {
        let fetched = vec![make_task("y"), make_task("x"), make_task("z")];
        let cache = vec![entry("x", 2), entry("y", 0)];
        let merged = merge_persisted_order(&fetched, &cache);

        // z has no cached order, ties with y at 0 and keeps its fetch position after y.
        assert_eq!(ids(&merged), ["y", "z", "x"]);
        assert_eq!(merged[0].order, Some(0));
        assert_eq!(merged[1].order, None);
        assert_eq!(merged[2].order, Some(2));
    }

    #[test]
    fn merge_drops_cache_entries_that_no_longer_exist() {
        let fetched = vec![make_task("a"), make_task("b")];
        let cache = vec![entry("gone", 0), entry("b", 0), entry("a", 1)];
        let merged = merge_persisted_order(&fetched, &cache);
        assert_eq!(ids(&merged), ["b", "a"]);
    }

    #[test]
    fn merge_with_empty_cache_keeps_fetch_order() {
        let fetched = vec![make_task("c"), make_task("a"), make_task("b")];
        let merged = merge_persisted_order(&fetched, &[]);
        assert_eq!(ids(&merged), ["c", "a", "b"]);
    }

    #[test]
    fn order_entries_mirror_reordered_list() {
        let tasks = vec![make_task("A"), make_task("B")];
        let moved = move_task(&tasks, "B", 0).expect("move happens");
        assert_eq!(order_entries(&moved), vec![entry("B", 0), entry("A", 1)]);
    }
}
