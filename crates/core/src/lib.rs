//! Domain logic for the MoodJournal application.
//!
//! This crate is pure: no I/O, no async, no database types. The `db` crate
//! persists what is defined here; the `web` crate renders it.

pub mod entry;
pub mod error;
pub mod forms;
pub mod quote;
pub mod types;
