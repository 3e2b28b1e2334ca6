//! Parsing helpers for keys, timestamps and permission masks.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use tuneledger_core::state::{
    PERMISSION_ADD_TRACKS, PERMISSION_ALL, PERMISSION_EDIT_INFO, PERMISSION_REMOVE_TRACKS,
};
use tuneledger_core::Pubkey;

use crate::errors::CliError;

/// Parse a 64-char hex public key or address.
pub fn parse_pubkey(field: &str, value: &str) -> anyhow::Result<Pubkey> {
    value.parse::<Pubkey>().map_err(|e| {
        anyhow::Error::from(CliError::invalid_input(format!(
            "Invalid {} {:?}: {}",
            field, value, e
        )))
    })
}

/// Parse a point in time as unix seconds, RFC 3339, or YYYY-MM-DD (UTC midnight).
pub fn parse_timestamp(value: &str) -> anyhow::Result<i64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive).timestamp());
        }
    }
    Err(CliError::invalid_input(format!(
        "Invalid time (expected unix seconds, RFC 3339 or YYYY-MM-DD): {}",
        value
    ))
    .into())
}

/// Parse a comma-separated permission list (`add`, `remove`, `edit`, `all`)
/// or a numeric mask.
pub fn parse_permissions(value: &str) -> anyhow::Result<u8> {
    if let Ok(mask) = value.trim().parse::<u8>() {
        return Ok(mask);
    }
    let mut mask = 0u8;
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        mask |= match part.to_ascii_lowercase().as_str() {
            "add" => PERMISSION_ADD_TRACKS,
            "remove" => PERMISSION_REMOVE_TRACKS,
            "edit" => PERMISSION_EDIT_INFO,
            "all" => PERMISSION_ALL,
            other => {
                return Err(CliError::invalid_input(format!(
                    "Unknown permission {:?} (expected add, remove, edit or all)",
                    other
                ))
                .into())
            }
        };
    }
    Ok(mask)
}

/// Render unix seconds as "YYYY-MM-DD HH:MM UTC".
pub fn format_timestamp(seconds: i64) -> String {
    match Utc.timestamp_opt(seconds, 0).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => seconds.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(parse_timestamp("2023-11-14T22:13:20Z").unwrap(), 1_700_000_000);
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), 86_400);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_permissions() {
        assert_eq!(parse_permissions("add").unwrap(), PERMISSION_ADD_TRACKS);
        assert_eq!(
            parse_permissions("add, edit").unwrap(),
            PERMISSION_ADD_TRACKS | PERMISSION_EDIT_INFO
        );
        assert_eq!(parse_permissions("all").unwrap(), PERMISSION_ALL);
        assert_eq!(parse_permissions("3").unwrap(), 3);
        assert!(parse_permissions("delete").is_err());
    }

    #[test]
    fn test_parse_pubkey_rejects_short_hex() {
        let err = parse_pubkey("user", "abcd").unwrap_err();
        assert!(err.to_string().contains("Invalid user"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00 UTC");
    }
}
