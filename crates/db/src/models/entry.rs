//! Entry and gratitude item rows, plus the paginated listing shape.

use moodjournal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Entry {
    pub id: DbId,
    pub user_id: DbId,
    /// User-chosen timestamp of the entry. Independent of `created_at`.
    pub date: Timestamp,
    /// Stored lowercase mood label; always one of `Mood::ALL`.
    pub mood: String,
    pub mood_rating: i32,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// A row from the `gratitude_items` table. Lifetime is bound to its parent
/// entry via `ON DELETE CASCADE`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GratitudeItem {
    pub id: DbId,
    pub entry_id: DbId,
    pub item_text: String,
}

/// One page of a user's entry listing.
#[derive(Debug, Clone, Serialize)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    /// 1-based page number.
    pub page: i64,
    pub per_page: i64,
    pub total_entries: i64,
    pub total_pages: i64,
}

impl EntryPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
