//! Quote selection and display helpers.
//!
//! Selection takes the candidate slice and the random source as explicit
//! inputs so callers (and tests) control the randomness.

use rand::Rng;

/// Display form keeps at most this many characters of the quote text.
pub const EXCERPT_LEN: usize = 50;

/// Pick one element uniformly at random, or `None` from an empty slice.
pub fn pick_random<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.random_range(0..items.len()))
    }
}

/// Truncate quote text to its first [`EXCERPT_LEN`] characters, appending
/// an ellipsis only when something was cut.
pub fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
