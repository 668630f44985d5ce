//! Maps parsed commands onto core operations.
//!
//! # Responsibility
//! - Run boundary validation before the core sees any input.
//! - Translate core results into `Outcome`s.
//!
//! # Invariants
//! - Validation failures answer 400 without touching storage.
//! - Storage and other unexpected errors are returned, never rendered here.

use crate::args::{Command, TodoFields};
use crate::error::CliError;
use crate::outcome::Outcome;
use todo_core::{
    seed_if_empty, Clock, CreateTodoInput, Priority, TodoFilter, TodoRepository, TodoService,
    TodoServiceError, UpdateTodoInput,
};

pub fn dispatch<R, C>(service: &TodoService<R, C>, command: &Command) -> Result<Outcome, CliError>
where
    R: TodoRepository,
    C: Clock,
{
    match command {
        Command::List {
            is_completed,
            search,
            page,
            page_size,
        } => {
            let filter = TodoFilter {
                is_completed: *is_completed,
                search: search.clone(),
            };
            let todos = service.list(&filter, *page, *page_size)?;
            Ok(Outcome::Ok(serde_json::to_value(todos)?))
        }
        Command::Get { id } => match service.get_by_id(*id)? {
            Some(todo) => Ok(Outcome::Ok(serde_json::to_value(todo)?)),
            None => Ok(Outcome::NotFound),
        },
        Command::Create(fields) => {
            let input = match create_input(fields) {
                Ok(input) => input,
                Err(message) => return Ok(Outcome::BadRequest(message)),
            };
            match service.create(&input) {
                Ok(todo) => Ok(Outcome::Created {
                    location: format!("/todos/{}", todo.id),
                    body: serde_json::to_value(todo)?,
                }),
                Err(TodoServiceError::InvalidInput(err)) => Ok(Outcome::BadRequest(err.to_string())),
                Err(err) => Err(err.into()),
            }
        }
        Command::Update {
            id,
            fields,
            completed,
        } => {
            let input = match update_input(fields, *completed) {
                Ok(input) => input,
                Err(message) => return Ok(Outcome::BadRequest(message)),
            };
            match service.update(*id, &input) {
                Ok(found) => Ok(Outcome::from_found(found)),
                Err(TodoServiceError::InvalidInput(err)) => Ok(Outcome::BadRequest(err.to_string())),
                Err(err) => Err(err.into()),
            }
        }
        Command::Delete { id } => Ok(Outcome::from_found(service.delete(*id)?)),
        Command::Complete { id } => Ok(Outcome::from_found(service.complete(*id)?)),
        Command::Seed => {
            let inserted = seed_if_empty(service.repository(), service.clock())?;
            Ok(Outcome::Ok(serde_json::json!({ "inserted": inserted })))
        }
    }
}

fn create_input(fields: &TodoFields) -> Result<CreateTodoInput, String> {
    let input = CreateTodoInput {
        title: fields.title.clone(),
        description: fields.description.clone(),
        due_date: fields.due,
        priority: Priority::try_from(fields.priority).map_err(|err| err.to_string())?,
    };
    input.validate().map_err(|err| err.to_string())?;
    Ok(input)
}

fn update_input(fields: &TodoFields, is_completed: bool) -> Result<UpdateTodoInput, String> {
    let input = UpdateTodoInput {
        title: fields.title.clone(),
        description: fields.description.clone(),
        due_date: fields.due,
        priority: Priority::try_from(fields.priority).map_err(|err| err.to_string())?,
        is_completed,
    };
    input.validate().map_err(|err| err.to_string())?;
    Ok(input)
}
