//! Likes, reports, and moderation rules shared by the API and repository layers.

use serde::Serialize;

use crate::error::CoreError;
use crate::validation::{non_blank, FieldErrors};

/// Number of tracks returned in the "most reported" statistics block.
pub const MOST_REPORTED_LIMIT: i64 = 5;

pub const MSG_DUPLICATE_REPORT: &str = "You have already reported this track";
pub const MSG_REASON_REQUIRED: &str = "A reason is required to report a track";
pub const MSG_NOT_LIKED: &str = "You have not liked this track";
pub const MSG_TRACK_DEACTIVATED: &str = "Track deactivated and reports resolved";
pub const MSG_REPORTS_RESOLVED: &str = "Reports resolved";

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn is_liked(self) -> bool {
        self == LikeToggle::Liked
    }
}

/// Body returned by the like/unlike actions.
#[derive(Debug, Clone, Serialize)]
pub struct LikeState {
    pub liked: bool,
}

impl From<LikeToggle> for LikeState {
    fn from(toggle: LikeToggle) -> Self {
        LikeState {
            liked: toggle.is_liked(),
        }
    }
}

/// Validate and normalise a report reason.
///
/// The reason is required and may not be whitespace-only; the trimmed value
/// is returned.
pub fn validate_report_reason(reason: Option<&str>) -> Result<String, CoreError> {
    non_blank(reason)
        .map(str::to_string)
        .ok_or_else(|| CoreError::InvalidFields(FieldErrors::single("reason", MSG_REASON_REQUIRED)))
}

/// Parse the `?resolved=` list filter.
///
/// `"true"` / `"false"` (any case) filter on the flag; anything else means
/// "no filter".
pub fn parse_resolved_filter(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reason_is_trimmed() {
        assert_eq!(
            validate_report_reason(Some("  spam link  ")).unwrap(),
            "spam link"
        );
    }

    #[test]
    fn blank_reason_is_a_field_error() {
        let err = validate_report_reason(Some("   ")).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref f) if f.get("reason").is_some());
        assert!(validate_report_reason(None).is_err());
    }

    #[test]
    fn resolved_filter_parsing() {
        assert_eq!(parse_resolved_filter(Some("true")), Some(true));
        assert_eq!(parse_resolved_filter(Some("FALSE")), Some(false));
        assert_eq!(parse_resolved_filter(Some("maybe")), None);
        assert_eq!(parse_resolved_filter(None), None);
    }

    #[test]
    fn like_state_from_toggle() {
        assert!(LikeState::from(LikeToggle::Liked).liked);
        assert!(!LikeState::from(LikeToggle::Unliked).liked);
    }
}
