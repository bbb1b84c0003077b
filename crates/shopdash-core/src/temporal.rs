// crates/shopdash-core/src/temporal.rs

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
static TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M",
    "%H:%M:%S%.f",
    "%I:%M %p",
    "%I:%M:%S %p",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Parses a calendar date, also accepting date-time text (the time part is
/// dropped). Returns `None` for anything unrecognized.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    parse_datetime(trimmed).map(|dt| dt.date())
}

/// Parses a wall-clock time of day. No timezone is applied.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, fmt) {
            return Some(time);
        }
    }
    parse_datetime(trimmed).map(|dt| dt.time())
}

fn parse_datetime(trimmed: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

pub fn month_position(name: &str) -> Option<usize> {
    MONTH_NAMES.iter().position(|month| *month == name)
}

pub fn weekday_position(name: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|day| *day == name)
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Nanoseconds since midnight, the physical representation of a polars `Time`.
pub fn nanos_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + i64::from(time.nanosecond())
}

pub fn time_from_nanos(nanos: i64) -> Option<NaiveTime> {
    let seconds = u32::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let fraction = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_date_layouts() {
        assert_eq!(parse_date("2023-01-05"), Some(date(2023, 1, 5)));
        assert_eq!(parse_date("1/5/2019"), Some(date(2019, 1, 5)));
        assert_eq!(parse_date("2019/03/08"), Some(date(2019, 3, 8)));
        assert_eq!(parse_date("25-12-2020"), Some(date(2020, 12, 25)));
        assert_eq!(parse_date(" 2023-07-02 09:15:00 "), Some(date(2023, 7, 2)));
        assert_eq!(parse_date("2023-07-02T09:15:00"), Some(date(2023, 7, 2)));
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("unknown"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn parses_supported_time_layouts() {
        let expected = NaiveTime::from_hms_opt(13, 8, 0).unwrap();
        assert_eq!(parse_time("13:08"), Some(expected));
        assert_eq!(parse_time("13:08:00"), Some(expected));
        assert_eq!(parse_time("1:08 PM"), Some(expected));
        assert_eq!(parse_time("2023-07-02 13:08:00"), Some(expected));
        assert_eq!(parse_time("late"), None);
    }

    #[test]
    fn derives_gregorian_names() {
        let day = date(2023, 1, 5);
        assert_eq!(weekday_name(day), "Thursday");
        assert_eq!(month_name(day), "January");
        assert_eq!(month_position("July"), Some(6));
        assert_eq!(weekday_position("Sunday"), Some(6));
    }

    #[test]
    fn physical_representations_invert() {
        let day = date(2019, 3, 25);
        assert_eq!(days_since_epoch(date(1970, 1, 1)), 0);
        assert_eq!(date_from_days(days_since_epoch(day)), Some(day));

        let time = NaiveTime::from_hms_milli_opt(17, 45, 3, 250).unwrap();
        assert_eq!(time_from_nanos(nanos_since_midnight(time)), Some(time));
    }
}
