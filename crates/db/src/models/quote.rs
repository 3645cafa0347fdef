use std::fmt;

use moodjournal_core::quote::excerpt;
use moodjournal_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quotes` table. Seeded by migration, read-only at runtime.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quote {
    pub id: DbId,
    pub text: String,
    /// May be blank.
    pub author: String,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", excerpt(&self.text), self.author)
    }
}
