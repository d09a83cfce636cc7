//! Fixed-locale timestamps.
//!
//! Records are stamped with wall-clock time in Bogotá (UTC−05:00, no daylight
//! saving), rendered as `YYYY-MM-DD HH:MM:SS.ffffff -0500`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::{DomainError, DomainResult};

/// Offset of the fixed locale, in seconds west of UTC.
pub const BOGOTA_OFFSET_WEST_SECS: i32 = 5 * 3600;

/// Canonical rendering used for every stored stamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %z";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%:z"];

fn bogota() -> FixedOffset {
    FixedOffset::west_opt(BOGOTA_OFFSET_WEST_SECS).unwrap_or(Utc.fix())
}

/// Current time in the fixed locale.
pub fn now_bogota() -> String {
    format_bogota(Utc::now())
}

pub fn format_bogota(at: DateTime<Utc>) -> String {
    at.with_timezone(&bogota()).format(TIMESTAMP_FORMAT).to_string()
}

/// Normalize a caller-supplied timestamp into the canonical fixed-locale form.
///
/// Accepts the canonical form, RFC 3339, Go-style renderings with a trailing
/// zone abbreviation (`... -0500 -05`, `... +0000 UTC`), naive date-times
/// (read as Bogotá local time) and bare dates (midnight, Bogotá).
pub fn correct(input: &str) -> DomainResult<String> {
    parse_any(input)
        .map(format_bogota)
        .ok_or_else(|| DomainError::validation(format!("unrecognized timestamp: {input:?}")))
}

fn parse_any(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(at.with_timezone(&Utc));
    }

    if let Some(at) = parse_with_offset(trimmed) {
        return Some(at);
    }

    // Go's default rendering appends the zone abbreviation after the numeric offset.
    if let Some((head, _abbrev)) = trimmed.rsplit_once(' ') {
        if let Some(at) = parse_with_offset(head) {
            return Some(at);
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return localize(naive);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(localize)
}

fn parse_with_offset(s: &str) -> Option<DateTime<Utc>> {
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|at| at.with_timezone(&Utc))
}

fn localize(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    bogota()
        .from_local_datetime(&naive)
        .single()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn formats_in_bogota_offset() {
        let s = format_bogota(utc(2024, 3, 10, 17, 30, 0));
        assert_eq!(s, "2024-03-10 12:30:00.000000 -0500");
    }

    #[test]
    fn now_is_in_canonical_form() {
        let now = now_bogota();
        assert!(now.ends_with(" -0500"));
        assert_eq!(correct(&now).unwrap(), now);
    }

    #[test]
    fn corrects_rfc3339_into_bogota() {
        let s = correct("2024-03-10T17:30:00Z").unwrap();
        assert_eq!(s, "2024-03-10 12:30:00.000000 -0500");
    }

    #[test]
    fn corrects_go_style_rendering_with_zone_abbreviation() {
        let s = correct("2024-03-10 12:30:00.123456 -0500 -05").unwrap();
        assert_eq!(s, "2024-03-10 12:30:00.123456 -0500");

        let s = correct("2024-03-10 17:30:00 +0000 UTC").unwrap();
        assert_eq!(s, "2024-03-10 12:30:00.000000 -0500");
    }

    #[test]
    fn reads_naive_values_as_bogota_local_time() {
        assert_eq!(
            correct("2024-03-10 12:30:00").unwrap(),
            "2024-03-10 12:30:00.000000 -0500"
        );
        assert_eq!(
            correct("2024-03-10T12:30:00.5").unwrap(),
            "2024-03-10 12:30:00.500000 -0500"
        );
        assert_eq!(correct("2024-03-10").unwrap(), "2024-03-10 00:00:00.000000 -0500");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(correct("yesterday"), Err(DomainError::Validation(_))));
        assert!(correct("").is_err());
    }
}
