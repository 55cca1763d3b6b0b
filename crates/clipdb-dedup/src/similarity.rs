use chrono::Duration;

use crate::Clipping;

/// Bodies scoring above this are considered the same highlight restated.
pub const SIMILARITY_THRESHOLD: f64 = 0.30;

/// Two highlights closer together than this may be one user action.
pub fn near_duplicate_window() -> Duration {
    Duration::minutes(1)
}

/// `1 - levenshtein / longest`, over characters. Zero if either side is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let distance = strsim::levenshtein(a, b);
    let longest = a.chars().count().max(b.chars().count());
    1.0 - distance as f64 / longest as f64
}

/// `current` is superseded by `next`: similar text, and `next` was added less
/// than a minute later. Undated entries never qualify.
pub fn is_near_duplicate<T: Clipping + ?Sized>(current: &T, next: &T) -> bool {
    let close_in_time = match (current.added_at(), next.added_at()) {
        (Some(a), Some(b)) => b - a < near_duplicate_window(),
        _ => false,
    };
    close_in_time && similarity(current.body(), next.body()) > SIMILARITY_THRESHOLD
}
