use chrono::{Month, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ListingError;

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<day>[0-9]{1,2})-(?P<month>[A-Z]{3})-(?P<year>[0-9]{4})$").unwrap()
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})\.(?P<hundredths>[0-9]{2})$",
    )
    .unwrap()
});

/// Converts a listing date (`15-JAN-1999`) and time (`08:30:45.67`) into a
/// single sortable timestamp (`1999-1-15T08:30:45:670`).
///
/// The month is rendered without zero padding and the day exactly as
/// listed. The listing only carries hundredths of a second, so the last
/// millisecond digit is always `0`. Seconds and milliseconds are separated
/// by a colon; existing databases depend on that layout.
///
/// Fields that do not follow the listing grammar, or that name an
/// impossible calendar date or clock time, are rejected.
pub fn normalize_timestamp(date_raw: &str, time_raw: &str) -> Result<String, ListingError> {
    let date = DATE_REGEX
        .captures(date_raw)
        .ok_or_else(|| ListingError::format("date", date_raw, "expected D[D]-MMM-YYYY"))?;
    let time = TIME_REGEX
        .captures(time_raw)
        .ok_or_else(|| ListingError::format("time", time_raw, "expected HH:MM:SS.ss"))?;

    let day = &date["day"];
    let year = &date["year"];
    let month = date["month"]
        .parse::<Month>()
        .map_err(|_| ListingError::format("date", date_raw, "unknown month abbreviation"))?
        .number_from_month();

    if NaiveDate::from_ymd_opt(digits(year), month, digits(day)).is_none() {
        return Err(ListingError::format("date", date_raw, "no such calendar day"));
    }

    let hour = &time["hour"];
    let minute = &time["minute"];
    let second = &time["second"];
    let hundredths = &time["hundredths"];
    let valid_time = NaiveTime::from_hms_milli_opt(
        digits(hour),
        digits(minute),
        digits(second),
        digits::<u32>(hundredths) * 10,
    );
    if valid_time.is_none() {
        return Err(ListingError::format("time", time_raw, "no such time of day"));
    }

    Ok(format!(
        "{year}-{month}-{day}T{hour}:{minute}:{second}:{hundredths}0"
    ))
}

/// Value of a field the regex has already limited to at most four ASCII
/// digits, which always fits the target type.
fn digits<T: From<u16>>(field: &str) -> T {
    T::from(
        field
            .bytes()
            .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0')),
    )
}
