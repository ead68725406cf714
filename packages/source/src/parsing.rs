//! Duration and view-count parsing and formatting.
//!
//! The search API reports durations as ISO-8601 strings (`PT12M38S`) and
//! view counts as plain integers. The dataset stores both as display
//! strings (`"12:38"`, `"1.3M views"`). This module converts in both
//! directions.

use std::sync::LazyLock;

use regex::Regex;

/// Display value used in place of a duration for short videos.
pub const SHORTS_MARKER: &str = "SHORTS";

/// Videos strictly shorter than this are shorts.
pub const SHORT_THRESHOLD_SECS: u64 = 60;

/// Hour, minute, and second components of an ISO-8601 time duration.
/// Anchored at the start only; trailing content is ignored.
static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+)S)?").expect("valid regex")
});

/// Leading number and optional magnitude suffix of a display view count.
static DISPLAY_VIEWS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*([KMB])?").expect("valid regex"));

/// The 11-character video id inside a watch, short-link, shorts, or embed
/// URL.
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/)([A-Za-z0-9_-]{11})")
        .expect("valid regex")
});

/// Parses an ISO-8601 duration such as `PT1H2M3S` into seconds.
///
/// Absent components count as zero. Strings that do not start with `PT`,
/// including day-based durations like `P1DT2H`, yield `0`.
#[must_use]
pub fn parse_iso_duration(s: &str) -> u64 {
    let Some(caps) = ISO_DURATION_RE.captures(s) else {
        return 0;
    };

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}

/// Formats seconds as `H:MM:SS` from one hour upward, `M:SS` below.
#[must_use]
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Formats a view count as `"1.3M views"`, `"4.5K views"`, or `"999 views"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_views(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M views", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K views", count as f64 / 1_000.0)
    } else {
        format!("{count} views")
    }
}

/// Returns `true` for videos under one minute.
#[must_use]
pub const fn is_short(secs: u64) -> bool {
    secs < SHORT_THRESHOLD_SECS
}

/// Returns `true` if a display duration is the shorts marker.
#[must_use]
pub fn is_shorts_marker(display: &str) -> bool {
    display.trim().eq_ignore_ascii_case(SHORTS_MARKER)
}

/// Parses a display duration (`"12:38"` or `"1:02:03"`) into seconds.
///
/// Returns `None` for the shorts marker, since the actual length is not
/// recorded, for anything that is not two or three numeric parts, and
/// for values too large to count in seconds.
#[must_use]
pub fn parse_display_duration(display: &str) -> Option<u64> {
    let display = display.trim();
    if display.is_empty() || is_shorts_marker(display) {
        return None;
    }

    let parts = display
        .split(':')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes, seconds] => (0, *minutes, *seconds),
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        _ => return None,
    };

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parses a display view count (`"1.3M views"`, `"850 views"`,
/// `"12,345 views"`) into a number.
///
/// Returns `None` if the string does not start with a number.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_display_views(display: &str) -> Option<u64> {
    let cleaned = display.trim().replace(',', "");
    let caps = DISPLAY_VIEWS_RE.captures(&cleaned)?;

    let number = caps.get(1)?.as_str();
    let multiplier: u64 = match caps.get(2).map(|m| m.as_str()) {
        Some("K") => 1_000,
        Some("M") => 1_000_000,
        Some("B") => 1_000_000_000,
        _ => 1,
    };

    if multiplier == 1
        && let Ok(whole) = number.parse::<u64>()
    {
        return Some(whole);
    }

    let value = number.parse::<f64>().ok()?;
    Some((value * multiplier as f64).round() as u64)
}

/// Extracts the video id from a watch URL, a short link, a shorts URL, or an
/// embed URL.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns the medium-quality thumbnail URL for a video id.
#[must_use]
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_duration_components() {
        assert_eq!(parse_iso_duration("PT12M38S"), 758);
        assert_eq!(parse_iso_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso_duration("PT45S"), 45);
        assert_eq!(parse_iso_duration("PT2H"), 7200);
        assert_eq!(parse_iso_duration("PT"), 0);
    }

    #[test]
    fn unparseable_iso_duration_is_zero() {
        assert_eq!(parse_iso_duration(""), 0);
        assert_eq!(parse_iso_duration("12:38"), 0);
        assert_eq!(parse_iso_duration("P1DT2H"), 0);
    }

    #[test]
    fn formats_duration() {
        assert_eq!(format_duration(758), "12:38");
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(3600), "1:00:00");
    }

    #[test]
    fn formats_views() {
        assert_eq!(format_views(1_300_000), "1.3M views");
        assert_eq!(format_views(4_500), "4.5K views");
        assert_eq!(format_views(1_000), "1.0K views");
        assert_eq!(format_views(999), "999 views");
        assert_eq!(format_views(0), "0 views");
    }

    #[test]
    fn short_threshold_is_exclusive() {
        assert!(is_short(0));
        assert!(is_short(59));
        assert!(!is_short(60));
    }

    #[test]
    fn parses_display_duration() {
        assert_eq!(parse_display_duration("12:38"), Some(758));
        assert_eq!(parse_display_duration("1:02:03"), Some(3723));
        assert_eq!(parse_display_duration(" 0:45 "), Some(45));
        assert_eq!(parse_display_duration("SHORTS"), None);
        assert_eq!(parse_display_duration("about ten minutes"), None);
        assert_eq!(parse_display_duration("1:2:3:4"), None);
        assert_eq!(parse_display_duration(""), None);
        assert_eq!(parse_display_duration("999999999999999999:00"), None);
        assert_eq!(parse_display_duration("9999999999999999:00:00"), None);
    }

    #[test]
    fn recognizes_shorts_marker() {
        assert!(is_shorts_marker("SHORTS"));
        assert!(is_shorts_marker(" shorts "));
        assert!(!is_shorts_marker("0:30"));
    }

    #[test]
    fn parses_display_views() {
        assert_eq!(parse_display_views("1.3M views"), Some(1_300_000));
        assert_eq!(parse_display_views("4.5K views"), Some(4_500));
        assert_eq!(parse_display_views("2B views"), Some(2_000_000_000));
        assert_eq!(parse_display_views("850 views"), Some(850));
        assert_eq!(parse_display_views("12,345 views"), Some(12_345));
        assert_eq!(parse_display_views("No views"), None);
        assert_eq!(parse_display_views(""), None);
    }

    #[test]
    fn formatted_views_parse_back_approximately() {
        for count in [0_u64, 999, 4_500, 1_300_000] {
            assert_eq!(parse_display_views(&format_views(count)), Some(count));
        }
    }

    #[test]
    fn extracts_video_ids() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abcDEF12345").as_deref(),
            Some("abcDEF12345")
        );
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn builds_thumbnail_url() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
    }
}
