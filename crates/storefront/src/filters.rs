//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Formats a backend timestamp (`2024-03-09T14:30:00`) for display.
///
/// Values that don't parse are shown as-is.
///
/// Usage in templates: `{{ booking.service_date|datetime }}`
#[askama::filter_fn]
pub fn datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string(), "%d %b %Y, %-I:%M %p"))
}

/// Formats a backend timestamp as a date only.
///
/// Usage in templates: `{{ review.created_at|date }}`
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string(), "%d %b %Y"))
}

/// Formats a duration in minutes as hours and minutes.
///
/// Usage in templates: `{{ minutes|duration }}`
#[askama::filter_fn]
pub fn duration(minutes: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = minutes.to_string();
    let Ok(minutes) = raw.parse::<u32>() else {
        return Ok(raw);
    };
    Ok(match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} hr"),
        (h, m) => format!("{h} hr {m} min"),
    })
}

fn format_timestamp(raw: &str, format: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_or_else(|_| raw.to_string(), |dt| dt.format(format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        // NaiveDateTime's Display uses a space separator
        assert_eq!(
            format_timestamp("2024-03-09 14:30:00", "%d %b %Y, %-I:%M %p"),
            "09 Mar 2024, 2:30 PM"
        );
        assert_eq!(
            format_timestamp("2024-03-09T14:30:00.123456", "%d %b %Y"),
            "09 Mar 2024"
        );
        assert_eq!(format_timestamp("soon", "%d %b %Y"), "soon");
    }
}
