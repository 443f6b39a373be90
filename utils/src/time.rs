//! Time formatting helpers.

use custody_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Age of `since` as seen at `now`; a `since` in the future reads "in the future".
pub fn format_age(since: Timestamp, now: Timestamp) -> String {
    if now < since {
        return "in the future".to_string();
    }
    format_duration(now.as_secs() - since.as_secs())
}
