use std::collections::HashSet;
use todo_core::db::open_db_in_memory;
use todo_core::{
    CreateTodoInput, InMemoryTodoRepository, ManualClock, Priority, SqliteTodoRepository,
    TodoFilter, TodoRepository, TodoService, TodoServiceError, UpdateTodoInput,
};

const START_MS: i64 = 1_700_000_000_000;

/// Runs one scenario against both storage engines.
fn with_each_engine(scenario: impl Fn(&dyn TodoRepository, &str)) {
    let memory = InMemoryTodoRepository::new();
    scenario(&memory, "memory");

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteTodoRepository::try_new(&conn).unwrap();
    scenario(&sqlite, "sqlite");
}

fn create_input(title: &str, priority: Priority) -> CreateTodoInput {
    CreateTodoInput {
        title: title.to_string(),
        description: None,
        due_date: None,
        priority,
    }
}

fn update_input(title: &str, is_completed: bool) -> UpdateTodoInput {
    UpdateTodoInput {
        title: title.to_string(),
        description: None,
        due_date: None,
        priority: Priority::Low,
        is_completed,
    }
}

#[test]
fn create_then_get_returns_trimmed_uncompleted_record() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);

        let created = service
            .create(&CreateTodoInput {
                title: "  Buy milk  ".to_string(),
                description: Some("\t two litres \n".to_string()),
                due_date: Some(START_MS - 1),
                priority: Priority::High,
            })
            .unwrap();

        let fetched = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(fetched, created, "engine {engine}");
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.description.as_deref(), Some("two litres"));
        assert!(!fetched.is_completed);
        assert_eq!(fetched.created_at, START_MS);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.due_date, Some(START_MS - 1));
    });
}

#[test]
fn whitespace_description_is_kept_as_empty_string() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);

        let created = service
            .create(&CreateTodoInput {
                description: Some("   ".to_string()),
                ..create_input("Buy milk", Priority::Medium)
            })
            .unwrap();
        assert_eq!(created.description.as_deref(), Some(""), "engine {engine}");
        let fetched = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some(""), "engine {engine}");

        let replaced = UpdateTodoInput {
            description: Some(" \t ".to_string()),
            ..update_input("Buy milk", false)
        };
        assert!(service.update(created.id, &replaced).unwrap());
        let updated = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(updated.description.as_deref(), Some(""), "engine {engine}");
    });
}

#[test]
fn create_rejects_blank_title_without_writing() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);

        let err = service.create(&create_input("    ", Priority::Low)).unwrap_err();
        assert!(
            matches!(err, TodoServiceError::InvalidInput(_)),
            "engine {engine}"
        );
        assert!(repo.find_all(&|_| true).unwrap().is_empty());
    });
}

#[test]
fn list_returns_newest_uncompleted_first_with_page_size() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);

        let first = service.create(&create_input("first", Priority::High)).unwrap();
        clock.advance(1_000);
        let second = service.create(&create_input("second", Priority::Medium)).unwrap();
        clock.advance(1_000);
        let third = service.create(&create_input("third", Priority::Low)).unwrap();

        let filter = TodoFilter {
            is_completed: Some(false),
            search: None,
        };
        let page = service.list(&filter, 1, 2).unwrap();
        let ids: Vec<_> = page.iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![third.id, second.id], "engine {engine}");

        let next = service.list(&filter, 2, 2).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, first.id);
    });
}

#[test]
fn list_clamps_page_and_page_size() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        for index in 0..120 {
            clock.advance(1);
            service
                .create(&create_input(&format!("todo {index}"), Priority::Medium))
                .unwrap();
        }

        let filter = TodoFilter::default();
        assert_eq!(service.list(&filter, 1, 1_000).unwrap().len(), 100);
        assert_eq!(service.list(&filter, 1, 0).unwrap().len(), 10);
        assert_eq!(service.list(&filter, 1, -3).unwrap().len(), 10);

        let first_page = service.list(&filter, 1, 7).unwrap();
        assert_eq!(service.list(&filter, 0, 7).unwrap(), first_page, "engine {engine}");
        assert_eq!(service.list(&filter, -9, 7).unwrap(), first_page);
    });
}

#[test]
fn list_beyond_last_page_is_empty() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        service.create(&create_input("only one", Priority::Low)).unwrap();

        let filter = TodoFilter::default();
        assert!(service.list(&filter, 2, 10).unwrap().is_empty(), "engine {engine}");
        assert!(service.list(&filter, i64::MAX, 100).unwrap().is_empty());
    });
}

#[test]
fn list_equal_timestamps_keep_insertion_order() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        let a = service.create(&create_input("same a", Priority::Low)).unwrap();
        let b = service.create(&create_input("same b", Priority::Low)).unwrap();
        clock.advance(10);
        let newer = service.create(&create_input("newer", Priority::Low)).unwrap();

        let ids: Vec<_> = service
            .list(&TodoFilter::default(), 1, 100)
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(ids, vec![newer.id, a.id, b.id], "engine {engine}");
    });
}

#[test]
fn search_is_case_insensitive_and_combines_with_status() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        let readme = service.create(&create_input("Write README", Priority::Low)).unwrap();
        clock.advance(1);
        let other = service.create(&create_input("Polish docs", Priority::Low)).unwrap();
        clock.advance(1);
        let done = service.create(&create_input("Review readme", Priority::Low)).unwrap();
        assert!(service.complete(done.id).unwrap());

        for term in ["write", "README", "te RE"] {
            let filter = TodoFilter {
                is_completed: Some(false),
                search: Some(term.to_string()),
            };
            let hits = service.list(&filter, 1, 100).unwrap();
            assert_eq!(hits.len(), 1, "engine {engine} term {term}");
            assert_eq!(hits[0].id, readme.id);
        }

        let blank = TodoFilter {
            is_completed: None,
            search: Some("  ".to_string()),
        };
        assert_eq!(service.list(&blank, 1, 10).unwrap().len(), 3);

        let completed_readme = TodoFilter {
            is_completed: Some(true),
            search: Some("readme".to_string()),
        };
        let hits = service.list(&completed_readme, 1, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, done.id);

        let open = TodoFilter {
            is_completed: Some(false),
            search: None,
        };
        let open_ids: HashSet<_> = service
            .list(&open, 1, 10)
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(open_ids, HashSet::from([readme.id, other.id]));
    });
}

#[test]
fn update_is_full_replace_and_refreshes_updated_at() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        let created = service
            .create(&CreateTodoInput {
                title: "draft".to_string(),
                description: Some("old description".to_string()),
                due_date: Some(START_MS + 5),
                priority: Priority::High,
            })
            .unwrap();

        clock.advance(60_000);
        assert!(service
            .update(created.id, &update_input("  final  ", true))
            .unwrap());

        let loaded = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded.title, "final", "engine {engine}");
        assert!(loaded.description.is_none());
        assert!(loaded.due_date.is_none());
        assert_eq!(loaded.priority, Priority::Low);
        assert!(loaded.is_completed);
        assert_eq!(loaded.created_at, START_MS);
        assert_eq!(loaded.updated_at, START_MS + 60_000);
    });
}

#[test]
fn update_can_reopen_a_completed_record() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        let created = service.create(&create_input("reopen me", Priority::Low)).unwrap();
        assert!(service.complete(created.id).unwrap());

        assert!(service.update(created.id, &update_input("reopen me", false)).unwrap());
        let loaded = service.get_by_id(created.id).unwrap().unwrap();
        assert!(!loaded.is_completed, "engine {engine}");
    });
}

#[test]
fn update_missing_record_returns_false_and_leaves_storage_untouched() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        service.create(&create_input("existing", Priority::Low)).unwrap();
        let before = service.list(&TodoFilter::default(), 1, 100).unwrap();

        assert!(!service.update(9_999, &update_input("ghost", true)).unwrap());

        let after = service.list(&TodoFilter::default(), 1, 100).unwrap();
        assert_eq!(after, before, "engine {engine}");
    });
}

#[test]
fn update_with_blank_title_is_invalid_input() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        let created = service.create(&create_input("valid", Priority::Low)).unwrap();

        let err = service.update(created.id, &update_input(" \t ", false)).unwrap_err();
        assert!(
            matches!(err, TodoServiceError::InvalidInput(_)),
            "engine {engine}"
        );
        assert_eq!(service.get_by_id(created.id).unwrap().unwrap().title, "valid");
    });
}

#[test]
fn delete_then_get_and_second_delete_report_not_found() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        let created = service.create(&create_input("temporary", Priority::Low)).unwrap();

        assert!(service.delete(created.id).unwrap(), "engine {engine}");
        assert!(service.get_by_id(created.id).unwrap().is_none());
        assert!(!service.delete(created.id).unwrap());
    });
}

#[test]
fn complete_is_idempotent_and_does_not_touch_updated_at_twice() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        let created = service.create(&create_input("finish me", Priority::Medium)).unwrap();

        clock.advance(1_000);
        assert!(service.complete(created.id).unwrap());
        let first = service.get_by_id(created.id).unwrap().unwrap();
        assert!(first.is_completed, "engine {engine}");
        assert_eq!(first.updated_at, START_MS + 1_000);

        clock.advance(1_000);
        assert!(service.complete(created.id).unwrap());
        let second = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(second, first);
    });
}

#[test]
fn complete_missing_record_returns_false() {
    with_each_engine(|repo, engine| {
        let service = TodoService::new(repo);
        assert!(!service.complete(12_345).unwrap(), "engine {engine}");
    });
}

#[test]
fn updated_at_never_precedes_created_at_when_clock_moves_backwards() {
    with_each_engine(|repo, engine| {
        let clock = ManualClock::new(START_MS);
        let service = TodoService::with_clock(repo, &clock);
        let created = service.create(&create_input("time travel", Priority::Low)).unwrap();

        clock.set(START_MS - 10_000);
        assert!(service.complete(created.id).unwrap());
        let loaded = service.get_by_id(created.id).unwrap().unwrap();
        assert!(loaded.updated_at >= loaded.created_at, "engine {engine}");
    });
}

#[test]
fn concurrent_creates_on_shared_memory_store_get_unique_ids() {
    let repo = InMemoryTodoRepository::new();

    let ids: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let repo = repo.clone();
                scope.spawn(move || {
                    let service = TodoService::new(repo);
                    (0..25)
                        .map(|index| {
                            service
                                .create(&create_input(
                                    &format!("worker {worker} item {index}"),
                                    Priority::Medium,
                                ))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 200);
    assert_eq!(repo.len().unwrap(), 200);
}
