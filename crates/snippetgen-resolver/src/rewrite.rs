//! Legacy path shapes and their current equivalents.
//!
//! The table is applied in order, before matching, and each rule fires at
//! most once.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `(pattern, replacement)` pairs over the version-less path.
const RULES: &[(&str, &str)] = &[
    // Drive items addressed by path: `root:/folder/file.txt:`.
    (r"(?i)/root:/[^:]*:?(/|$)", "/items/{driveItem-id}$1"),
    (r"(?i)^/me/drive(/|$)", "/drives/{drive-id}$1"),
    (r"(?i)^/users/[^/]+/drive(/|$)", "/drives/{drive-id}$1"),
    (r"(?i)^/me/calendar/events(/|$)", "/me/events$1"),
];

static REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("Invalid rewrite regex"),
                *replacement,
            )
        })
        .collect()
});

/// Canonicalize a legacy path shape.
pub(crate) fn rewrite_legacy_path(path: &str) -> String {
    let mut current = path.to_owned();
    for (pattern, replacement) in REWRITES.iter() {
        if pattern.is_match(&current) {
            let rewritten = pattern.replace(&current, *replacement).into_owned();
            debug!(from = %current, to = %rewritten, "rewrote legacy path");
            current = rewritten;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_rewrite_drive_colon_paths() {
        assert_eq!(
            rewrite_legacy_path("/me/drive/root:/Documents/report.docx:/content"),
            "/drives/{drive-id}/items/{driveItem-id}/content"
        );
        assert_eq!(
            rewrite_legacy_path("/drives/abc/root:/a.txt:"),
            "/drives/abc/items/{driveItem-id}"
        );
    }

    #[test]
    fn test_should_rewrite_user_drives() {
        assert_eq!(
            rewrite_legacy_path("/users/{user-id}/drive/items/{driveItem-id}"),
            "/drives/{drive-id}/items/{driveItem-id}"
        );
        assert_eq!(rewrite_legacy_path("/me/drive"), "/drives/{drive-id}");
    }

    #[test]
    fn test_should_rewrite_calendar_events() {
        assert_eq!(rewrite_legacy_path("/me/calendar/events"), "/me/events");
        assert_eq!(
            rewrite_legacy_path("/me/calendar/events/{event-id}"),
            "/me/events/{event-id}"
        );
    }

    #[test]
    fn test_should_leave_current_paths_alone() {
        assert_eq!(rewrite_legacy_path("/me/messages"), "/me/messages");
        assert_eq!(rewrite_legacy_path("/me/drives"), "/me/drives");
        assert_eq!(rewrite_legacy_path("/me/calendars/events"), "/me/calendars/events");
    }
}
