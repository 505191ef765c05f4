//! Smart Todo REST API contract types
//!
//! This crate defines the wire types exchanged with the Smart Todo backend
//! (tasks, categories, context entries and the AI endpoints). These types are
//! shared between the REST client, the mock client and the CLI.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
