//! HTTP-style result of one command.
//!
//! # Invariants
//! - Failure bodies are opaque: only a fixed message and a trace id.
//! - Exit codes: 0 for 2xx, 2 for 400, 3 for 404, 1 for 500.

use serde_json::{json, Value};
use uuid::Uuid;

pub const FAILURE_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok(Value),
    Created { location: String, body: Value },
    NoContent,
    BadRequest(String),
    NotFound,
    Failure { trace_id: Uuid },
}

impl Outcome {
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(_) => 200,
            Self::Created { .. } => 201,
            Self::NoContent => 204,
            Self::BadRequest(_) => 400,
            Self::NotFound => 404,
            Self::Failure { .. } => 500,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.status() {
            200..=299 => 0,
            400 => 2,
            404 => 3,
            _ => 1,
        }
    }

    /// Maps the "not found" boolean of a mutation to 204/404.
    pub fn from_found(found: bool) -> Self {
        if found {
            Self::NoContent
        } else {
            Self::NotFound
        }
    }

    /// JSON body, if the outcome carries one.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Ok(body) | Self::Created { body, .. } => Some(body.clone()),
            Self::NoContent => None,
            Self::BadRequest(message) => Some(json!({ "error": message })),
            Self::NotFound => Some(json!({ "error": "todo not found" })),
            Self::Failure { trace_id } => Some(json!({
                "error": FAILURE_MESSAGE,
                "traceId": trace_id.to_string(),
            })),
        }
    }

    /// Writes the outcome: success bodies to stdout, the status line,
    /// location and error bodies to stderr.
    pub fn emit(&self) {
        eprintln!("status={}", self.status());
        if let Self::Created { location, .. } = self {
            eprintln!("location={location}");
        }

        let Some(body) = self.body() else {
            return;
        };
        let rendered = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        if self.exit_code() == 0 {
            println!("{rendered}");
        } else {
            eprintln!("{rendered}");
        }
    }
}
