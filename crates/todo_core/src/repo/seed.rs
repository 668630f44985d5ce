//! Demo data for empty stores.
//!
//! # Invariants
//! - Seeding only writes when the store holds no records.
//! - The demo batch is written atomically: all five records or none.
//! - Seeded records satisfy `updated_at >= created_at`.

use crate::clock::Clock;
use crate::model::todo::{NewTodo, Priority};
use crate::repo::todo_repo::{RepoResult, TodoRepository};
use log::info;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

struct SeedRow {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    is_completed: bool,
    due_in_days: Option<i64>,
    created_days_ago: i64,
    updated_days_ago: i64,
}

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        title: "Finish CRUD endpoints",
        description: "Implement GET/POST/PUT/DELETE for todos",
        priority: Priority::High,
        is_completed: false,
        due_in_days: Some(3),
        created_days_ago: 0,
        updated_days_ago: 0,
    },
    SeedRow {
        title: "Add PATCH /complete endpoint",
        description: "Set IsCompleted=true and update UpdatedAt",
        priority: Priority::Medium,
        is_completed: false,
        due_in_days: Some(2),
        created_days_ago: 0,
        updated_days_ago: 0,
    },
    SeedRow {
        title: "Write a clean README",
        description: "Include setup steps, migrations, endpoints",
        priority: Priority::Low,
        is_completed: false,
        due_in_days: Some(5),
        created_days_ago: 0,
        updated_days_ago: 0,
    },
    SeedRow {
        title: "Refactor LINQ queries",
        description: "Keep filtering + pagination readable",
        priority: Priority::Medium,
        is_completed: true,
        due_in_days: None,
        created_days_ago: 2,
        updated_days_ago: 1,
    },
    SeedRow {
        title: "Polish Swagger docs",
        description: "Add summaries and response codes",
        priority: Priority::High,
        is_completed: false,
        due_in_days: Some(1),
        created_days_ago: 0,
        updated_days_ago: 0,
    },
];

/// Inserts the demo records when the store is empty.
///
/// Returns the number of inserted records (`0` when data already exists).
pub fn seed_if_empty<R, C>(repo: &R, clock: &C) -> RepoResult<usize>
where
    R: TodoRepository + ?Sized,
    C: Clock + ?Sized,
{
    if repo.count()? > 0 {
        info!("event=seed module=repo status=skipped reason=not_empty");
        return Ok(0);
    }

    let now = clock.now_ms();
    let batch: Vec<NewTodo> = SEED_ROWS
        .iter()
        .map(|row| NewTodo {
            title: row.title.to_string(),
            description: Some(row.description.to_string()),
            is_completed: row.is_completed,
            due_date: row.due_in_days.map(|days| now + days * DAY_MS),
            priority: row.priority,
            created_at: now - row.created_days_ago * DAY_MS,
            updated_at: now - row.updated_days_ago * DAY_MS,
        })
        .collect();

    let inserted = repo.insert_all(&batch)?.len();
    info!("event=seed module=repo status=ok inserted={inserted}");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::seed_if_empty;
    use crate::clock::ManualClock;
    use crate::repo::memory_repo::InMemoryTodoRepository;
    use crate::repo::todo_repo::TodoRepository;

    #[test]
    fn seeds_once_and_keeps_one_completed_record() {
        let repo = InMemoryTodoRepository::new();
        let clock = ManualClock::new(10 * 24 * 60 * 60 * 1000);

        assert_eq!(seed_if_empty(&repo, &clock).unwrap(), 5);
        assert_eq!(seed_if_empty(&repo, &clock).unwrap(), 0);

        let completed = repo.find_all(&|todo| todo.is_completed).unwrap();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].updated_at > completed[0].created_at);
        assert!(completed[0].due_date.is_none());
    }

    #[test]
    fn seeds_the_demo_titles_in_order() {
        let repo = InMemoryTodoRepository::new();
        seed_if_empty(&repo, &ManualClock::new(0)).unwrap();

        let titles: Vec<String> = repo
            .find_all(&|_| true)
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(
            titles,
            [
                "Finish CRUD endpoints",
                "Add PATCH /complete endpoint",
                "Write a clean README",
                "Refactor LINQ queries",
                "Polish Swagger docs",
            ]
        );
    }
}
