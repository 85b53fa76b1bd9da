use chrono::NaiveDate;

/// Strict parse of `"MM/DD/YYYY"` → date.
///
/// Two-digit month, two-digit day, four-digit year. Anything else (single
/// digit components, other separators, impossible calendar dates) is `None`.
pub fn parse_close_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let b = s.as_bytes();
    if b.len() != 10 || b[2] != b'/' || b[5] != b'/' {
        return None;
    }
    let digits_ok = b
        .iter()
        .enumerate()
        .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let month: u32 = s[0..2].parse().ok()?;
    let day: u32 = s[3..5].parse().ok()?;
    let year: i32 = s[6..10].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
