//! Repository for the `quotes` table.

use sqlx::SqlitePool;

use crate::models::quote::Quote;

/// Read-only access to the seeded quote collection.
pub struct QuoteRepo;

impl QuoteRepo {
    /// All quotes, in insertion order. The collection is small and seeded
    /// once, so the caller picks from the full set.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Quote>, sqlx::Error> {
        sqlx::query_as::<_, Quote>("SELECT id, text, author FROM quotes ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
            .fetch_one(pool)
            .await
    }
}
