//! Core use-case services.
//!
//! # Responsibility
//! - Normalize commands and apply todo business rules.
//! - Keep transport layers decoupled from storage details.

pub mod query;
pub mod todo_service;
