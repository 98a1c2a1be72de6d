use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// `datetime-local` input value.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// Suggested show times, as shown next to the date input.
pub const SUGGESTION_FORMAT: &str = "%d/%m/%Y %H:%M";
const DISPLAY_FORMAT: &str = "%A %-d %B %Y, %H:%M %Z";

const ACCEPTED_INPUT_FORMATS: [&str; 3] =
    [INPUT_FORMAT, "%Y-%m-%dT%H:%M:%S", SUGGESTION_FORMAT];

const MORNING_SHOW: (u32, u32) = (10, 0);
const AFTERNOON_SHOW: (u32, u32) = (15, 45);

pub fn to_local(time: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    time.with_timezone(&tz)
}

/// Interpret a wall-clock time in `tz`.
///
/// Times repeated by a DST fold resolve to the earlier instant; times skipped by a DST
/// gap do not exist and yield `None`.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|time| time.with_timezone(&Utc))
}

/// Date of the coming Tuesday; on a Tuesday this is a week ahead.
pub fn next_tuesday(now: DateTime<Tz>) -> NaiveDate {
    let weekday = u64::from(now.weekday().num_days_from_sunday());
    let days_ahead = 7 - ((weekday + 5) % 7);
    now.date_naive() + Days::new(days_ahead)
}

/// Morning and afternoon start times for next Tuesday's shows, in `tz`.
pub fn show_suggestions(now: DateTime<Utc>, tz: Tz) -> (String, String) {
    let tuesday = next_tuesday(to_local(now, tz));
    let at = |(hour, minute): (u32, u32)| {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|time| tuesday.and_time(time).format(SUGGESTION_FORMAT).to_string())
            .unwrap_or_default()
    };
    (at(MORNING_SHOW), at(AFTERNOON_SHOW))
}

/// Parse a wall-clock time typed into the admin form.
pub fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ACCEPTED_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub fn format_input(time: DateTime<Tz>) -> String {
    time.format(INPUT_FORMAT).to_string()
}

pub fn format_display(time: DateTime<Tz>) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}
