//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone};
use chrono_tz::Tz;

/// Pattern used for publication dates on every page (day, short month, year)
pub const POST_DATE_FORMAT: &str = "dd MMM yyyy";

/// Parse a CMS timestamp.
///
/// Accepts RFC 3339 (`2021-03-25T12:00:00Z`) as well as the colon-less
/// offset the Prismic API emits (`2021-03-25T12:00:00+0000`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Resolve a BCP 47 tag (`pt-BR`) or POSIX name (`pt_BR`) to a chrono locale
pub fn resolve_locale(tag: &str) -> Locale {
    let posix = tag.trim().replace('-', "_");
    match Locale::try_from(posix.as_str()) {
        Ok(locale) => locale,
        Err(_) => {
            tracing::warn!("Unknown locale '{}', falling back to POSIX", tag);
            Locale::POSIX
        }
    }
}

/// Resolve an IANA timezone name, falling back to UTC
pub fn resolve_timezone(name: &str) -> Tz {
    if name.trim().is_empty() {
        return Tz::UTC;
    }
    name.trim().parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// Format a date with a date-fns style pattern in the given locale
///
/// # Examples
/// ```ignore
/// format_date(&date, "dd MMM yyyy", Locale::pt_BR) // -> "25 mar 2021"
/// ```
pub fn format_date<T: TimeZone>(date: &DateTime<T>, format: &str, locale: Locale) -> String
where
    T::Offset: std::fmt::Display,
{
    let chrono_format = date_fns_to_chrono_format(format);
    date.format_localized(&chrono_format, locale).to_string()
}

/// Format a publication date for display in the site's locale and timezone
pub fn format_post_date(date: &DateTime<FixedOffset>, locale: Locale, tz: Tz) -> String {
    format_date(&date.with_timezone(&tz), POST_DATE_FORMAT, locale)
}

/// Convert a date-fns format string to a chrono format string
fn date_fns_to_chrono_format(format: &str) -> String {
    // Longest tokens first so `MMMM` is not consumed as `MM` + `MM`
    let replacements = [
        ("yyyy", "%Y"),
        ("yy", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_post_date_pt_br() {
        let date = parse_timestamp("2021-03-25T12:00:00Z").unwrap();
        let formatted = format_post_date(&date, resolve_locale("pt-BR"), Tz::America__Sao_Paulo);
        assert_eq!(formatted, "25 mar 2021");
    }

    #[test]
    fn test_format_is_stable_for_fixed_locale() {
        let date = parse_timestamp("2021-03-25T12:00:00Z").unwrap();
        let locale = resolve_locale("pt-BR");
        assert_eq!(
            format_post_date(&date, locale, Tz::UTC),
            format_post_date(&date, locale, Tz::UTC)
        );
    }

    #[test]
    fn test_parse_prismic_offset() {
        let date = parse_timestamp("2021-03-25T12:00:00+0000").unwrap();
        assert_eq!(date, parse_timestamp("2021-03-25T12:00:00Z").unwrap());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_timezone_shifts_day() {
        let date = parse_timestamp("2021-03-25T01:00:00Z").unwrap();
        let locale = resolve_locale("pt-BR");
        assert_eq!(format_post_date(&date, locale, Tz::UTC), "25 mar 2021");
        assert_eq!(
            format_post_date(&date, locale, Tz::America__Sao_Paulo),
            "24 mar 2021"
        );
    }

    #[test]
    fn test_resolve_fallbacks() {
        assert_eq!(resolve_timezone("Nowhere/Special"), Tz::UTC);
        assert_eq!(resolve_timezone(""), Tz::UTC);
        assert_eq!(resolve_timezone("America/Sao_Paulo"), Tz::America__Sao_Paulo);
    }

    #[test]
    fn test_date_fns_to_chrono() {
        assert_eq!(date_fns_to_chrono_format("dd MMM yyyy"), "%d %b %Y");
        assert_eq!(date_fns_to_chrono_format("yyyy-MM-dd"), "%Y-%m-%d");
    }
}
