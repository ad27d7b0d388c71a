//! Duration values as the backend encodes them.
//!
//! The accepted grammar is a restricted ISO-8601 duration:
//! `P[nY][nD][T[nH][nM][n(.n)S]]`. Fractional seconds are truncated.

use crate::DomainError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Convert an optional backend duration into whole seconds.
///
/// A missing value counts as zero. A present but malformed value is an
/// error: it means the backend broke its contract.
///
/// # Errors
///
/// Returns [`DomainError::MalformedDuration`] when `value` does not follow
/// the duration grammar.
pub fn convert_duration_in_seconds(value: Option<&str>) -> Result<u64, DomainError> {
    value.map_or(Ok(0), parse_duration_seconds)
}

/// Parse a duration string such as `PT1H30M` or `P1DT2.5S` into seconds.
///
/// # Errors
///
/// Returns [`DomainError::MalformedDuration`] when `input` does not follow
/// the duration grammar, names no component, or overflows.
pub fn parse_duration_seconds(input: &str) -> Result<u64, DomainError> {
    let malformed = || DomainError::MalformedDuration(input.to_string());

    let body = input.trim().strip_prefix('P').ok_or_else(malformed)?;
    let (mut date, time) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut total: u64 = 0;
    let mut components = 0;

    for (unit, factor) in [('Y', SECONDS_PER_YEAR), ('D', SECONDS_PER_DAY)] {
        if let Some(value) = take_component(&mut date, unit, false).ok_or_else(malformed)? {
            total = accumulate(total, value, factor).ok_or_else(malformed)?;
            components += 1;
        }
    }
    if !date.is_empty() {
        return Err(malformed());
    }

    if let Some(mut time) = time {
        if time.is_empty() {
            return Err(malformed());
        }
        for (unit, factor, fraction) in [
            ('H', SECONDS_PER_HOUR, false),
            ('M', SECONDS_PER_MINUTE, false),
            ('S', 1, true),
        ] {
            if let Some(value) = take_component(&mut time, unit, fraction).ok_or_else(malformed)? {
                total = accumulate(total, value, factor).ok_or_else(malformed)?;
                components += 1;
            }
        }
        if !time.is_empty() {
            return Err(malformed());
        }
    }

    if components == 0 {
        return Err(malformed());
    }
    Ok(total)
}

fn accumulate(total: u64, value: u64, factor: u64) -> Option<u64> {
    value.checked_mul(factor)?.checked_add(total)
}

/// Consume `<number><unit>` from the front of `rest`.
///
/// `Some(None)` means the next component carries another unit and nothing
/// was consumed; the outer `None` means the text is malformed.
fn take_component(rest: &mut &str, unit: char, allow_fraction: bool) -> Option<Option<u64>> {
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || (allow_fraction && c == '.')))
        .unwrap_or(rest.len());
    if !rest[end..].starts_with(unit) {
        return Some(None);
    }

    let number = &rest[..end];
    let whole = match number.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            whole
        }
        None => number,
    };
    if whole.is_empty() {
        return None;
    }

    let value = whole.parse::<u64>().ok()?;
    *rest = &rest[end + unit.len_utf8()..];
    Some(Some(value))
}

/// Human-readable span such as `3d 04h 05m`, dropping leading zero units
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes:02}m"),
        _ => format!("{days}d {hours:02}h {minutes:02}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(convert_duration_in_seconds(Some("PT1H30M")).unwrap(), 5400);
    }

    #[test]
    fn test_missing_value_is_zero() {
        assert_eq!(convert_duration_in_seconds(None).unwrap(), 0);
    }

    #[test]
    fn test_days() {
        assert_eq!(convert_duration_in_seconds(Some("P1D")).unwrap(), 86_400);
    }

    #[test]
    fn test_years_days_and_time() {
        let expected = SECONDS_PER_YEAR + 2 * SECONDS_PER_DAY + 3 * 3600 + 4 * 60 + 5;
        assert_eq!(parse_duration_seconds("P1Y2DT3H4M5S").unwrap(), expected);
    }

    #[test]
    fn test_fractional_seconds_are_truncated() {
        assert_eq!(parse_duration_seconds("PT12.9S").unwrap(), 12);
        assert_eq!(parse_duration_seconds("PT1M0.999S").unwrap(), 60);
    }

    #[test]
    fn test_malformed_inputs() {
        for input in [
            "garbage", "", "P", "PT", "P1DT", "PT1X", "P1H", "PT1.5H", "PT.5S", "PT5.S", "P-1D",
            "PT1M1H",
        ] {
            assert!(
                matches!(
                    parse_duration_seconds(input),
                    Err(DomainError::MalformedDuration(_))
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_present_value_is_an_error() {
        assert!(convert_duration_in_seconds(Some("garbage")).is_err());
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(parse_duration_seconds("P99999999999999999Y").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(5400), "1h 30m");
        assert_eq!(format_duration(86_400 + 3_600 * 4 + 300), "1d 04h 05m");
    }
}
