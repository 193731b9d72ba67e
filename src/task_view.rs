//! What the task page shows: the filtered, ordered list plus the counters
//! around it. Everything here is pure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::status_filter::StatusFilter;
use crate::task::Task;

/// Status filter, then category, then search, then the display order.
pub fn visible_tasks(tasks: &[Task], status: StatusFilter, category_id: Option<i64>, search: &str) -> Vec<Task> {
    // The query keeps its surrounding whitespace; only the emptiness check trims.
    let query = (!search.trim().is_empty()).then(|| search.to_lowercase());

    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| status.admits(task.completed))
        .filter(|task| category_id.map_or(true, |id| task.category_id == Some(id)))
        .filter(|task| query.as_deref().map_or(true, |q| matches_search(task, q)))
        .cloned()
        .collect();

    visible.sort_by(display_order);
    visible
}

fn matches_search(task: &Task, query: &str) -> bool {
    task.title.to_lowercase().contains(query)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
}

/// Priority high to low, then due date soonest first (undated last), then
/// newest created first.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now)
}

/// Counters shown next to the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Rounded to the nearest whole percent; 0 when there are no tasks.
    pub completion_percent: u32,
    pub overdue: usize,
    pub active_by_category: BTreeMap<i64, usize>,
}

pub fn summarize(tasks: &[Task], now: DateTime<Utc>) -> TaskSummary {
    let mut summary = TaskSummary { total: tasks.len(), ..TaskSummary::default() };

    for task in tasks {
        if task.completed {
            summary.completed += 1;
            continue;
        }
        summary.active += 1;
        if is_overdue(task, now) {
            summary.overdue += 1;
        }
        if let Some(category_id) = task.category_id {
            *summary.active_by_category.entry(category_id).or_insert(0) += 1;
        }
    }

    if summary.total > 0 {
        summary.completion_percent = (summary.completed as f64 * 100.0 / summary.total as f64).round() as u32;
    }
    summary
}
