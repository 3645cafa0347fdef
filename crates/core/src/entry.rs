//! Journal entry field rules and form validation.
//!
//! [`EntryInput`] holds the raw strings exactly as submitted so a failed
//! submission can be re-rendered without losing what the user typed.
//! [`EntryInput::validate`] turns it into a typed [`NewEntry`], collecting
//! every problem into [`FieldErrors`] rather than stopping at the first.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::forms::FieldErrors;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an entry title, in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of a single gratitude item, in characters.
pub const GRATITUDE_ITEM_MAX_LEN: usize = 255;

/// Number of optional gratitude slots offered on the creation form.
/// The edit form offers none beyond the existing items.
pub const GRATITUDE_SLOTS: usize = 3;

/// Inclusive mood rating bounds.
pub const MOOD_RATING_MIN: i32 = 1;
pub const MOOD_RATING_MAX: i32 = 5;

/// Labels for the mood rating select, lowest to highest.
pub const MOOD_RATING_CHOICES: [(i32, &str); 5] = [
    (1, "1 - Very Poor"),
    (2, "2 - Poor"),
    (3, "3 - Neutral"),
    (4, "4 - Good"),
    (5, "5 - Excellent"),
];

/// Accepted timestamp layouts for the date field. The first is what an
/// HTML `datetime-local` input submits.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// The fixed set of mood labels an entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Anxious,
    Sad,
    Neutral,
    Excited,
    Frustrated,
    Calm,
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Anxious,
        Mood::Sad,
        Mood::Neutral,
        Mood::Excited,
        Mood::Frustrated,
        Mood::Calm,
        Mood::Stressed,
    ];

    /// The stored (lowercase) form of the mood.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Anxious => "anxious",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Excited => "excited",
            Mood::Frustrated => "frustrated",
            Mood::Calm => "calm",
            Mood::Stressed => "stressed",
        }
    }

    /// Human-facing label for selects and detail pages.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Anxious => "Anxious",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Excited => "Excited",
            Mood::Frustrated => "Frustrated",
            Mood::Calm => "Calm",
            Mood::Stressed => "Stressed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

// ---------------------------------------------------------------------------
// Entry input and validation
// ---------------------------------------------------------------------------

/// Raw entry fields as submitted by the form, all strings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryInput {
    pub date: String,
    pub mood: String,
    pub mood_rating: String,
    pub title: String,
    pub content: String,
}

/// A validated entry ready for persistence. Constructed only through
/// [`EntryInput::validate`], so an invalid mood or out-of-range rating
/// cannot reach the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: Timestamp,
    pub mood: Mood,
    pub mood_rating: i32,
    pub title: String,
    pub content: String,
}

impl EntryInput {
    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<NewEntry, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Title is required.");
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.push(
                "title",
                format!("Title must be at most {TITLE_MAX_LEN} characters."),
            );
        }

        let content = self.content.trim();
        if content.is_empty() {
            errors.push("content", "Content is required.");
        }

        let mood = match Mood::from_str(&self.mood) {
            Ok(mood) => Some(mood),
            Err(()) => {
                errors.push("mood", "Select a valid mood.");
                None
            }
        };

        let mood_rating = match self.mood_rating.trim().parse::<i32>() {
            Ok(r) if (MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&r) => Some(r),
            Ok(_) => {
                errors.push(
                    "mood_rating",
                    format!("Rating must be between {MOOD_RATING_MIN} and {MOOD_RATING_MAX}."),
                );
                None
            }
            Err(_) => {
                errors.push("mood_rating", "Rating must be a whole number.");
                None
            }
        };

        let date = match parse_form_datetime(&self.date) {
            Some(date) => Some(date),
            None => {
                errors.push("date", "Enter a valid date and time.");
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewEntry {
            // Unwraps cannot fail: a None pushed an error above.
            date: date.unwrap(),
            mood: mood.unwrap(),
            mood_rating: mood_rating.unwrap(),
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Trim gratitude slot texts, drop blank slots, and enforce the per-item
/// length bound. Order of the surviving items is preserved.
pub fn clean_gratitude_items(slots: &[String]) -> Result<Vec<String>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut items = Vec::new();

    for slot in slots {
        let text = slot.trim();
        if text.is_empty() {
            continue;
        }
        if text.chars().count() > GRATITUDE_ITEM_MAX_LEN {
            errors.push(
                "gratitude_items",
                format!("Each gratitude item must be at most {GRATITUDE_ITEM_MAX_LEN} characters."),
            );
            break;
        }
        items.push(text.to_string());
    }

    if errors.is_empty() {
        Ok(items)
    } else {
        Err(errors)
    }
}

/// Validate an entry submission together with its gratitude slots, merging
/// the error sets so the form shows every problem at once.
pub fn validate_submission(
    input: &EntryInput,
    slots: &[String],
) -> Result<(NewEntry, Vec<String>), FieldErrors> {
    match (input.validate(), clean_gratitude_items(slots)) {
        (Ok(entry), Ok(items)) => Ok((entry, items)),
        (Err(errors), Ok(_)) => Err(errors),
        (Ok(_), Err(errors)) => Err(errors),
        (Err(mut errors), Err(more)) => {
            errors.merge(more);
            Err(errors)
        }
    }
}

/// Parse a form-submitted timestamp. Naive values are taken as UTC.
pub fn parse_form_datetime(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way a `datetime-local` input expects it.
pub fn format_form_datetime(ts: Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M").to_string()
}
