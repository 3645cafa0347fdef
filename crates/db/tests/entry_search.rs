//! Repository-level tests for listing: ordering, pagination, and search.

use chrono::{Duration, Utc};
use moodjournal_core::entry::{Mood, NewEntry};
use moodjournal_core::types::DbId;
use moodjournal_db::models::user::CreateUser;
use moodjournal_db::repositories::{EntryRepo, UserRepo, PAGE_SIZE};
use sqlx::SqlitePool;

async fn make_user(pool: &SqlitePool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "irrelevant-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

fn entry_fields(title: &str) -> NewEntry {
    NewEntry {
        date: Utc::now(),
        mood: Mood::Happy,
        mood_rating: 3,
        title: title.to_string(),
        content: "Some content.".to_string(),
    }
}

async fn make_entry(pool: &SqlitePool, user_id: DbId, fields: NewEntry) -> DbId {
    EntryRepo::create(pool, user_id, &fields, &[])
        .await
        .expect("entry creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Ordering and scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn listing_is_newest_date_first(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    let now = Utc::now();

    let mut older = entry_fields("Older");
    older.date = now - Duration::days(2);
    make_entry(&pool, user_id, older).await;

    let mut newer = entry_fields("Newer");
    newer.date = now;
    make_entry(&pool, user_id, newer).await;

    let page = EntryRepo::list(&pool, user_id, "", 1).await.unwrap().unwrap();
    let titles: Vec<&str> = page.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn listing_shows_only_own_entries(pool: SqlitePool) {
    let alice = make_user(&pool, "alice").await;
    let bob = make_user(&pool, "bob").await;
    make_entry(&pool, alice, entry_fields("Mine")).await;
    make_entry(&pool, bob, entry_fields("Not mine")).await;

    let page = EntryRepo::list(&pool, alice, "", 1).await.unwrap().unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].title, "Mine");
    assert_eq!(page.total_entries, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_journal_still_has_page_one(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    let page = EntryRepo::list(&pool, user_id, "", 1).await.unwrap().unwrap();
    assert!(page.entries.is_empty());
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_previous());
    assert!(!page.has_next());
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn pages_split_at_ten_entries(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    let now = Utc::now();
    for i in 0..25 {
        let mut fields = entry_fields(&format!("Entry {i}"));
        fields.date = now - Duration::minutes(i);
        make_entry(&pool, user_id, fields).await;
    }

    let first = EntryRepo::list(&pool, user_id, "", 1).await.unwrap().unwrap();
    assert_eq!(first.entries.len(), PAGE_SIZE as usize);
    assert_eq!(first.total_entries, 25);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next());
    assert!(!first.has_previous());
    // Newest dates first.
    assert_eq!(first.entries[0].title, "Entry 0");

    let last = EntryRepo::list(&pool, user_id, "", 3).await.unwrap().unwrap();
    assert_eq!(last.entries.len(), 5);
    assert!(last.has_previous());
    assert!(!last.has_next());
}

#[sqlx::test(migrations = "./migrations")]
async fn out_of_range_pages_are_not_found(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    make_entry(&pool, user_id, entry_fields("Only")).await;

    assert!(EntryRepo::list(&pool, user_id, "", 0).await.unwrap().is_none());
    assert!(EntryRepo::list(&pool, user_id, "", 2).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_title(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    make_entry(&pool, user_id, entry_fields("Rainy Monday")).await;
    make_entry(&pool, user_id, entry_fields("Sunny Friday")).await;

    let page = EntryRepo::list(&pool, user_id, "Rainy", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].title, "Rainy Monday");
}

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_content(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    let mut learned = entry_fields("One");
    learned.content = "I learned Rust today".to_string();
    make_entry(&pool, user_id, learned).await;
    let mut walked = entry_fields("Two");
    walked.content = "Went for a walk".to_string();
    make_entry(&pool, user_id, walked).await;

    let page = EntryRepo::list(&pool, user_id, "Rust", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].title, "One");
}

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_mood(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    let mut excited = entry_fields("One");
    excited.mood = Mood::Excited;
    make_entry(&pool, user_id, excited).await;
    let mut sad = entry_fields("Two");
    sad.mood = Mood::Sad;
    make_entry(&pool, user_id, sad).await;

    let page = EntryRepo::list(&pool, user_id, "excited", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].mood, "excited");
}

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_gratitude_item_text(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    EntryRepo::create(
        &pool,
        user_id,
        &entry_fields("With items"),
        &["Coffee".to_string()],
    )
    .await
    .unwrap();
    make_entry(&pool, user_id, entry_fields("Other")).await;

    let page = EntryRepo::list(&pool, user_id, "Coffee", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].title, "With items");
}

#[sqlx::test(migrations = "./migrations")]
async fn entry_with_several_matching_items_appears_once(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    EntryRepo::create(
        &pool,
        user_id,
        &entry_fields("Thankful"),
        &["Morning coffee".to_string(), "Coffee with a friend".to_string()],
    )
    .await
    .unwrap();

    let page = EntryRepo::list(&pool, user_id, "coffee", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.total_entries, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_is_case_insensitive(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    make_entry(&pool, user_id, entry_fields("Rainy Monday")).await;

    for term in ["rainy", "RAINY", "rAiNy"] {
        let page = EntryRepo::list(&pool, user_id, term, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.entries.len(), 1, "term {term} should match");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn search_never_crosses_users(pool: SqlitePool) {
    let alice = make_user(&pool, "alice").await;
    let bob = make_user(&pool, "bob").await;
    make_entry(&pool, bob, entry_fields("Rainy Monday")).await;

    let page = EntryRepo::list(&pool, alice, "Rainy", 1)
        .await
        .unwrap()
        .unwrap();
    assert!(page.entries.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn search_with_no_match_is_empty(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    make_entry(&pool, user_id, entry_fields("Normal Entry")).await;

    let page = EntryRepo::list(&pool, user_id, "zzznomatch", 1)
        .await
        .unwrap()
        .unwrap();
    assert!(page.entries.is_empty());
    assert_eq!(page.total_entries, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn like_wildcards_in_search_are_literal(pool: SqlitePool) {
    let user_id = make_user(&pool, "alice").await;
    make_entry(&pool, user_id, entry_fields("Gave 100% today")).await;
    make_entry(&pool, user_id, entry_fields("Ordinary day")).await;

    // "%" must match only the entry that literally contains it.
    let page = EntryRepo::list(&pool, user_id, "%", 1).await.unwrap().unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].title, "Gave 100% today");

    let page = EntryRepo::list(&pool, user_id, "100%", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.entries.len(), 1);
}
