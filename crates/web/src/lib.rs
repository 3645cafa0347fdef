//! HTTP layer: handlers, router, session auth, flash messages, templates.

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod router;
pub mod state;
pub mod templates;
