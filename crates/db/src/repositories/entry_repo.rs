//! Repository for the `entries` table and its gratitude sub-collection.
//!
//! Every operation takes the owning user's id and filters on it in SQL, so
//! another user's entry is indistinguishable from a missing one. Writes that
//! touch both an entry and its items run in a single transaction.

use chrono::Utc;
use moodjournal_core::entry::NewEntry;
use moodjournal_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::entry::{Entry, EntryPage, GratitudeItem};

/// Column list for entries queries.
const COLUMNS: &str = "id, user_id, date, mood, mood_rating, title, content, created_at";

/// Entries per listing page.
pub const PAGE_SIZE: i64 = 10;

/// Provides owner-scoped CRUD and search for journal entries.
pub struct EntryRepo;

impl EntryRepo {
    /// Create an entry together with its gratitude items, atomically.
    /// The owner is always the authenticated caller.
    pub async fn create(
        pool: &SqlitePool,
        user_id: DbId,
        input: &NewEntry,
        gratitude_texts: &[String],
    ) -> Result<Entry, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO entries (user_id, date, mood, mood_rating, title, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, Entry>(&query)
            .bind(user_id)
            .bind(input.date)
            .bind(input.mood.as_str())
            .bind(input.mood_rating)
            .bind(&input.title)
            .bind(&input.content)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        for text in gratitude_texts {
            sqlx::query("INSERT INTO gratitude_items (entry_id, item_text) VALUES (?, ?)")
                .bind(entry.id)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(entry)
    }

    /// Find one of the user's entries by id. `None` covers both "does not
    /// exist" and "belongs to someone else".
    pub async fn find_for_user(
        pool: &SqlitePool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entries WHERE id = ? AND user_id = ?");
        sqlx::query_as::<_, Entry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List the gratitude items attached to an entry, oldest first.
    pub async fn gratitude_items(
        pool: &SqlitePool,
        entry_id: DbId,
    ) -> Result<Vec<GratitudeItem>, sqlx::Error> {
        sqlx::query_as::<_, GratitudeItem>(
            "SELECT id, entry_id, item_text FROM gratitude_items
             WHERE entry_id = ?
             ORDER BY id ASC",
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await
    }

    /// One page of the user's entries, newest date first.
    ///
    /// A non-empty `search` narrows to entries whose title, content, mood,
    /// or any attached gratitude item text contains it, case-insensitively.
    /// The `EXISTS` sub-query keeps an entry with several matching items
    /// from appearing more than once.
    ///
    /// Returns `None` for a page outside `1..=total_pages`; an empty
    /// journal still has a valid page 1.
    pub async fn list(
        pool: &SqlitePool,
        user_id: DbId,
        search: &str,
        page: i64,
    ) -> Result<Option<EntryPage>, sqlx::Error> {
        let pattern = like_pattern(search);

        let total_entries: i64 = if search.is_empty() {
            sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?
        } else {
            sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM entries WHERE user_id = ? AND ({SEARCH_CLAUSE})"
            ))
            .bind(user_id)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_one(pool)
            .await?
        };

        let total_pages = std::cmp::max(1, (total_entries + PAGE_SIZE - 1) / PAGE_SIZE);
        if page < 1 || page > total_pages {
            return Ok(None);
        }
        let offset = (page - 1) * PAGE_SIZE;

        let entries = if search.is_empty() {
            sqlx::query_as::<_, Entry>(&format!(
                "SELECT {COLUMNS} FROM entries
                 WHERE user_id = ?
                 ORDER BY date DESC, id DESC
                 LIMIT ? OFFSET ?"
            ))
            .bind(user_id)
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as::<_, Entry>(&format!(
                "SELECT {COLUMNS} FROM entries
                 WHERE user_id = ? AND ({SEARCH_CLAUSE})
                 ORDER BY date DESC, id DESC
                 LIMIT ? OFFSET ?"
            ))
            .bind(user_id)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(pool)
            .await?
        };

        Ok(Some(EntryPage {
            entries,
            page,
            per_page: PAGE_SIZE,
            total_entries,
            total_pages,
        }))
    }

    /// Replace an entry's mutable fields and its full gratitude set,
    /// atomically. `None` under the same rule as [`Self::find_for_user`];
    /// nothing is written in that case.
    pub async fn update(
        pool: &SqlitePool,
        user_id: DbId,
        id: DbId,
        input: &NewEntry,
        gratitude_texts: &[String],
    ) -> Result<Option<Entry>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE entries
             SET date = ?, mood = ?, mood_rating = ?, title = ?, content = ?
             WHERE id = ? AND user_id = ?
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, Entry>(&query)
            .bind(input.date)
            .bind(input.mood.as_str())
            .bind(input.mood_rating)
            .bind(&input.title)
            .bind(&input.content)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(entry) = entry else {
            return Ok(None);
        };

        // The submitted set fully replaces the stored set; zero submitted
        // items clears it.
        sqlx::query("DELETE FROM gratitude_items WHERE entry_id = ?")
            .bind(entry.id)
            .execute(&mut *tx)
            .await?;
        for text in gratitude_texts {
            sqlx::query("INSERT INTO gratitude_items (entry_id, item_text) VALUES (?, ?)")
                .bind(entry.id)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(entry))
    }

    /// Delete one of the user's entries; gratitude items go with it via
    /// `ON DELETE CASCADE`. Returns `false` under the same rule as
    /// [`Self::find_for_user`].
    pub async fn delete(pool: &SqlitePool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Shared match predicate: title, content, mood, or any gratitude item.
/// Expects the same LIKE pattern bound four times.
const SEARCH_CLAUSE: &str = r"lower(title) LIKE ? ESCAPE '\'
     OR lower(content) LIKE ? ESCAPE '\'
     OR lower(mood) LIKE ? ESCAPE '\'
     OR EXISTS (SELECT 1 FROM gratitude_items gi
                WHERE gi.entry_id = entries.id
                  AND lower(gi.item_text) LIKE ? ESCAPE '\')";

/// Build a case-insensitive substring LIKE pattern, escaping the wildcard
/// characters so the search term is matched literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .to_lowercase()
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_");
    format!("%{escaped}%")
}
