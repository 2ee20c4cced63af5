//! Core types and trait definitions for the Roster teacher/student store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the web layer both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cast;
pub mod error;
pub mod store;
pub mod student;
pub mod teacher;
pub mod validation;

pub use error::{Error, Result};
pub use validation::ValidationErrors;
