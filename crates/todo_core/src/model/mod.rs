//! Domain model for todo records.
//!
//! # Responsibility
//! - Define the canonical todo record shared by storage and service layers.
//! - Keep invariant checks next to the data they protect.
//!
//! # Invariants
//! - Every record is identified by a storage-assigned `TodoId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod todo;
