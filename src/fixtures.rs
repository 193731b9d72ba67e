//! Sample data for a fresh store.

use chrono::{DateTime, Duration, Utc};

use crate::data_access::mapper::{self, category_to_storage, task_to_storage, CategoryFields, TaskFields};
use crate::data_access::record_service::Table;
use crate::task::TaskPriority;
use crate::world::{Change, World};

const CATEGORIES: [(&str, &str, &str); 5] = [
    ("Work", "#5B4FE8", "Briefcase"),
    ("Personal", "#8B7FF5", "User"),
    ("Shopping", "#10B981", "ShoppingCart"),
    ("Health", "#EF4444", "Heart"),
    ("Learning", "#F59E0B", "BookOpen"),
];

struct SampleTask {
    title: &'static str,
    description: &'static str,
    priority: TaskPriority,
    due_in_days: Option<i64>,
    completed: bool,
    category: i64,
    assigned_to: Option<i64>,
}

const TASKS: [SampleTask; 8] = [
    SampleTask {
        title: "Prepare quarterly report",
        description: "Collect the numbers from every team and draft the summary",
        priority: TaskPriority::High,
        due_in_days: Some(2),
        completed: false,
        category: 1,
        assigned_to: Some(1),
    },
    SampleTask {
        title: "Review pull requests",
        description: "Go through the open reviews before the release branch is cut",
        priority: TaskPriority::Medium,
        due_in_days: Some(1),
        completed: false,
        category: 1,
        assigned_to: Some(2),
    },
    SampleTask {
        title: "Update landing page mockups",
        description: "",
        priority: TaskPriority::Low,
        due_in_days: None,
        completed: true,
        category: 1,
        assigned_to: Some(3),
    },
    SampleTask {
        title: "Call the bank",
        description: "Ask about the new savings account",
        priority: TaskPriority::Medium,
        due_in_days: Some(-1),
        completed: false,
        category: 2,
        assigned_to: None,
    },
    SampleTask {
        title: "Buy groceries",
        description: "Milk, eggs, bread, coffee",
        priority: TaskPriority::Low,
        due_in_days: Some(1),
        completed: false,
        category: 3,
        assigned_to: None,
    },
    SampleTask {
        title: "Book dentist appointment",
        description: "",
        priority: TaskPriority::High,
        due_in_days: Some(7),
        completed: false,
        category: 4,
        assigned_to: None,
    },
    SampleTask {
        title: "Morning run",
        description: "5km around the park",
        priority: TaskPriority::Medium,
        due_in_days: None,
        completed: true,
        category: 4,
        assigned_to: None,
    },
    SampleTask {
        title: "Finish Rust ownership chapter",
        description: "Work through the borrowing exercises",
        priority: TaskPriority::Low,
        due_in_days: Some(14),
        completed: false,
        category: 5,
        assigned_to: None,
    },
];

/// Fill an empty World with the default categories and sample tasks.
/// Does nothing if the World already holds records.
pub fn seed(world: &mut World) -> Vec<Change> {
    seed_at(world, mapper::now())
}

fn seed_at(world: &mut World, now: DateTime<Utc>) -> Vec<Change> {
    if !world.is_empty() {
        return Vec::new();
    }

    let categories = CATEGORIES
        .iter()
        .map(|&(name, color, icon)| {
            category_to_storage(&CategoryFields {
                name: Some(name.to_string()),
                color: Some(color.to_string()),
                icon: Some(icon.to_string()),
                task_count: Some(0),
            })
        })
        .collect();
    let mut changes = world.create(Table::Category, categories).changes;

    let count = TASKS.len() as i64;
    let tasks = TASKS
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            // Oldest first, an hour apart.
            let created_at = now - Duration::hours(count - i as i64);
            task_to_storage(&TaskFields {
                title: Some(sample.title.to_string()),
                description: Some(Some(sample.description.to_string()).filter(|d| !d.is_empty())),
                generated_description: Some(None),
                priority: Some(sample.priority),
                due_date: Some(sample.due_in_days.map(|days| now + Duration::days(days))),
                completed: Some(sample.completed),
                created_at: Some(created_at),
                completed_at: Some(sample.completed.then_some(created_at + Duration::minutes(30))),
                category_id: Some(Some(sample.category)),
                assigned_to: Some(sample.assigned_to),
            })
        })
        .collect();
    changes.extend(world.create(Table::Task, tasks).changes);

    tracing::info!(
        categories = world.len(Table::Category),
        tasks = world.len(Table::Task),
        "seeded fixtures"
    );
    changes
}
