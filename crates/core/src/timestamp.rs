use chrono::NaiveDate;
use thiserror::Error;

pub const TIMESTAMP_PROFILE: &str = "%Y-%m-%dT%H:%M:%S.%f%z";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp does not match YYYY-MM-DDTHH:MM:SS[.fff][+HHMM]: {0:?}")]
    Malformed(String),
}

/// One line of the extraction profile, split into its fields.
///
/// Calendar fields are kept as read; no validity check happens here, so a
/// month of `13` survives until [`ParsedTimestamp::epoch_millis`] normalizes
/// it the way `timegm` would.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
    // Seconds east of UTC; set only when both offset groups are present.
    pub offset_seconds: Option<i32>,
}

impl ParsedTimestamp {
    pub fn epoch_millis(&self) -> Option<i64> {
        let naive = naive_epoch_seconds(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
            i64::from(self.hour),
            i64::from(self.minute),
            i64::from(self.second),
        )?;
        let utc = naive.checked_sub(i64::from(self.offset_seconds.unwrap_or(0)))?;
        utc.checked_mul(1000)?.checked_add(i64::from(self.millis))
    }
}

pub fn parse_timestamp(raw: &str) -> Result<ParsedTimestamp, TimestampError> {
    parse_fields(raw).ok_or_else(|| TimestampError::Malformed(raw.to_string()))
}

pub fn parse_instant(raw: &str) -> Result<i64, TimestampError> {
    parse_timestamp(raw)?
        .epoch_millis()
        .ok_or_else(|| TimestampError::Malformed(raw.to_string()))
}

fn parse_fields(raw: &str) -> Option<ParsedTimestamp> {
    let mut cursor = Cursor::new(raw.as_bytes());

    let year = cursor.digits(4)?;
    cursor.literal(b'-')?;
    let month = cursor.digits(2)?;
    cursor.literal(b'-')?;
    let day = cursor.digits(2)?;
    cursor.literal(b'T')?;
    let hour = cursor.digits(2)?;
    cursor.literal(b':')?;
    let minute = cursor.digits(2)?;
    cursor.literal(b':')?;
    let second = cursor.digits(2)?;

    let millis = if cursor.eat(b'.') {
        fraction_to_millis(cursor.digit_run())
    } else {
        0
    };

    let offset_hours = match cursor.peek() {
        Some(sign @ (b'+' | b'-')) => {
            cursor.advance();
            let hours = cursor.digits(2)? as i32;
            Some((if sign == b'-' { -1 } else { 1 }, hours))
        }
        _ => None,
    };
    // The minute group stands alone in the profile, so two trailing digits
    // are accepted even without a sign; they only count next to an hour.
    let offset_minutes = if cursor.peek().is_some() {
        Some(cursor.digits(2)? as i32)
    } else {
        None
    };

    if !cursor.is_done() {
        return None;
    }

    let offset_seconds = match (offset_hours, offset_minutes) {
        (Some((sign, hours)), Some(minutes)) => Some(sign * (hours * 3600 + minutes * 60)),
        _ => None,
    };

    Some(ParsedTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
        millis,
        offset_seconds,
    })
}

/// Right-pads to three digits and truncates, so `"5"` is 500 and `"1234"` is 123.
fn fraction_to_millis(digits: &str) -> u32 {
    if digits.is_empty() {
        return 0;
    }
    let padded = format!("{:0<3}", digits);
    padded[..3].parse().unwrap_or(0)
}

/// Converts a naive calendar tuple read as UTC, letting out-of-range fields
/// carry into their neighbours.
fn naive_epoch_seconds(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<i64> {
    let months = year * 12 + (month - 1);
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc()
        .timestamp();

    Some(first_of_month + (day - 1) * 86_400 + hour * 3_600 + minute * 60 + second)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn literal(&mut self, expected: u8) -> Option<()> {
        self.eat(expected).then_some(())
    }

    fn digits(&mut self, count: usize) -> Option<u32> {
        let end = self.pos.checked_add(count)?;
        let slice = self.bytes.get(self.pos..end)?;
        if !slice.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos = end;
        Some(
            slice
                .iter()
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')),
        )
    }

    fn digit_run(&mut self) -> &'a str {
        let bytes = self.bytes;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        std::str::from_utf8(&bytes[start..self.pos]).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_instant, parse_timestamp, ParsedTimestamp, TimestampError};

    const NEW_YEAR_2025_MS: i64 = 1_735_689_600_000;

    #[test]
    fn utc_offset_without_fraction_is_plain_epoch_seconds() {
        assert_eq!(
            parse_instant("2025-01-01T00:00:00.+0000"),
            Ok(NEW_YEAR_2025_MS)
        );
        assert_eq!(
            parse_instant("2025-12-25T16:07:57+0000"),
            Ok(1_766_678_877_000)
        );
    }

    #[test]
    fn fraction_is_padded_then_truncated() {
        let base = NEW_YEAR_2025_MS;
        assert_eq!(parse_instant("2025-01-01T00:00:00.1+0000"), Ok(base + 100));
        assert_eq!(parse_instant("2025-01-01T00:00:00.12+0000"), Ok(base + 120));
        assert_eq!(parse_instant("2025-01-01T00:00:00.123+0000"), Ok(base + 123));
        assert_eq!(parse_instant("2025-01-01T00:00:00.1234+0000"), Ok(base + 123));
        assert_eq!(parse_instant("2025-01-01T00:00:00.1239"), Ok(base + 123));
        assert_eq!(parse_instant("2025-01-01T00:00:00.+0000"), Ok(base));
        assert_eq!(parse_instant("2025-01-01T00:00:00."), Ok(base));
    }

    #[test]
    fn offsets_shift_local_time_to_utc() {
        let plus_one = parse_instant("2025-06-01T12:00:00.000+0100").expect("plus one");
        let minus_five = parse_instant("2025-06-01T12:00:00.000-0500").expect("minus five");
        assert_eq!(minus_five - plus_one, 21_600_000);

        let utc = parse_instant("2025-06-01T12:00:00.000+0000").expect("utc");
        assert_eq!(utc - plus_one, 3_600_000);
    }

    #[test]
    fn negative_offset_applies_sign_to_minutes() {
        let utc = parse_instant("2025-06-01T12:00:00+0000").expect("utc");
        let minus_half = parse_instant("2025-06-01T12:00:00-0030").expect("minus half hour");
        let minus_nine_half = parse_instant("2025-06-01T12:00:00-0930").expect("minus 9.5h");
        assert_eq!(minus_half - utc, 30 * 60 * 1000);
        assert_eq!(minus_nine_half - utc, (9 * 3600 + 30 * 60) * 1000);
    }

    #[test]
    fn missing_offset_is_read_as_utc() {
        assert_eq!(parse_instant("2025-01-01T00:00:00"), Ok(NEW_YEAR_2025_MS));
        assert_eq!(parse_instant("2025-01-01T00:00:00.500"), Ok(NEW_YEAR_2025_MS + 500));
    }

    #[test]
    fn partial_offset_groups_are_ignored() {
        let hour_only = parse_timestamp("2025-01-01T00:00:00.000+07").expect("hour only");
        assert_eq!(hour_only.offset_seconds, None);

        let minute_only = parse_timestamp("2025-01-01T00:00:0030").expect("minute only");
        assert_eq!(minute_only.offset_seconds, None);
        assert_eq!(minute_only.epoch_millis(), Some(NEW_YEAR_2025_MS));
    }

    #[test]
    fn structured_fields_are_exposed() {
        let parsed = parse_timestamp("2025-12-25T16:07:57.68-0700").expect("parse");
        assert_eq!(
            parsed,
            ParsedTimestamp {
                year: 2025,
                month: 12,
                day: 25,
                hour: 16,
                minute: 7,
                second: 57,
                millis: 680,
                offset_seconds: Some(-7 * 3600),
            }
        );
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for raw in [
            "",
            "   ",
            "2025:01:01 00:00:00",
            "2025-01-01 00:00:00",
            "2025-1-01T00:00:00",
            "2025-01-01T00:00",
            "2025-01-01T00:00:00Z",
            "2025-01-01T00:00:00+07:00",
            "2025-01-01T00:00:00.123+070",
            "2025-01-01T00:00:00.123+07001",
            "2025-01-01T00:00:00+",
            " 2025-01-01T00:00:00",
            "2025-01-01T00:00:00\r",
            "0000:00:00 00:00:00",
        ] {
            assert!(
                matches!(parse_instant(raw), Err(TimestampError::Malformed(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn out_of_range_calendar_fields_roll_over() {
        let month_thirteen = parse_instant("2024-13-01T00:00:00+0000").expect("month 13");
        assert_eq!(month_thirteen, NEW_YEAR_2025_MS);

        let day_zero = parse_instant("2025-01-00T00:00:00+0000").expect("day 0");
        assert_eq!(day_zero, NEW_YEAR_2025_MS - 86_400_000);
    }

    #[test]
    fn epoch_zero_parses_as_zero() {
        assert_eq!(parse_instant("1970-01-01T00:00:00.000+0000"), Ok(0));
        assert_eq!(parse_instant("1969-12-31T23:59:59.000+0000"), Ok(-1000));
    }

    #[test]
    fn widest_fields_still_produce_an_instant() {
        let parsed = parse_instant("9999-99-99T99:99:99.999-9999").expect("carries");
        assert!(parsed > parse_instant("9999-12-31T23:59:59+0000").expect("max"));

        let err = parse_instant("99999-01-01T00:00:00").expect_err("five digit year");
        assert_eq!(err, TimestampError::Malformed("99999-01-01T00:00:00".to_string()));
    }
}
