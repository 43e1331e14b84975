//! Shared helpers for command handlers: date arguments and input validation.

use crate::errors::{Error, Result};
use chrono::{Local, NaiveDate};

/// Date format accepted in command arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to `today`.
///
/// # Errors
/// Returns `Error::InvalidDate` when the argument is present but malformed.
pub fn parse_date_or(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match input.map(str::trim) {
        None | Some("") => Ok(today),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| Error::InvalidDate {
            input: raw.to_string(),
        }),
    }
}

/// Parses an optional date argument, defaulting to the current local date.
///
/// # Errors
/// Returns `Error::InvalidDate` when the argument is malformed.
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    parse_date_or(input, today())
}

/// Checks that an entered quantity is a finite number above zero.
///
/// # Errors
/// Returns `Error::InvalidQuantity` otherwise.
pub fn ensure_positive_quantity(quantity: f64) -> Result<f64> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(quantity)
    } else {
        Err(Error::InvalidQuantity { quantity })
    }
}

/// Checks that an entered money figure is finite and not negative (strictly
/// positive when `strict`).
///
/// # Errors
/// Returns `Error::InvalidAmount` otherwise.
pub fn ensure_amount(amount: f64, strict: bool) -> Result<f64> {
    let in_range = if strict { amount > 0.0 } else { amount >= 0.0 };
    if amount.is_finite() && in_range {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Embed descriptions are capped by Discord at 4096 characters.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4000;

/// Joins reply lines, cutting off with a count of omitted lines once `limit`
/// characters would be exceeded.
#[must_use]
pub fn join_limited(lines: &[String], limit: usize) -> String {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        let footer = format!("…and {} more", lines.len() - index);
        let is_last = index + 1 == lines.len();
        let reserve = if is_last { 0 } else { footer.len() };
        if out.len() + line.len() + 1 + reserve > limit {
            out.push_str(&footer);
            return out;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_parse_date_defaults_to_today() {
        let today = date(2024, 3, 10);
        assert_eq!(parse_date_or(None, today).unwrap(), today);
        assert_eq!(parse_date_or(Some("  "), today).unwrap(), today);
    }

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        let today = date(2024, 3, 10);
        assert_eq!(
            parse_date_or(Some(" 2024-01-01 "), today).unwrap(),
            date(2024, 1, 1)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let today = date(2024, 3, 10);
        for bad in ["01/01/2024", "2024-13-01", "yesterday"] {
            let err = parse_date_or(Some(bad), today).unwrap_err();
            assert!(matches!(err, Error::InvalidDate { .. }), "{bad}");
        }
    }

    #[test]
    fn test_quantity_validation() {
        assert_eq!(ensure_positive_quantity(2.5).unwrap(), 2.5);
        assert!(ensure_positive_quantity(0.0).is_err());
        assert!(ensure_positive_quantity(-1.0).is_err());
        assert!(ensure_positive_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_amount_validation() {
        assert_eq!(ensure_amount(0.0, false).unwrap(), 0.0);
        assert!(ensure_amount(0.0, true).is_err());
        assert!(ensure_amount(-5.0, false).is_err());
        assert!(ensure_amount(f64::INFINITY, false).is_err());
        assert_eq!(ensure_amount(12.0, true).unwrap(), 12.0);
    }

    #[test]
    fn test_join_limited_fits() {
        let lines = vec!["one".to_string(), "two".to_string()];
        assert_eq!(join_limited(&lines, 100), "one\ntwo");
        assert_eq!(join_limited(&[], 100), "");
    }

    #[test]
    fn test_join_limited_truncates() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let joined = join_limited(&lines, 40);
        assert!(joined.len() <= 40);
        assert!(joined.starts_with("line 0\nline 1\n"));
        assert!(joined.ends_with("more"));
    }

    #[test]
    fn test_join_limited_fits_embed_description() {
        let lines: Vec<String> = (0..500)
            .map(|i| format!("`#{i}` **Basmati Rice** · 25 kg"))
            .collect();
        let joined = join_limited(&lines, EMBED_DESCRIPTION_LIMIT);
        assert!(joined.len() <= 4096);
        assert!(joined.ends_with("more"));
    }
}
