//! Opening-hours normalization.
//!
//! The store locator reports one `store_open`/`store_close` pair per store,
//! in a 12-hour clock that sometimes drops the seconds field (`"10:00 AM"`
//! next to `"10:00:00 PM"`). [`normalize_time_string`] repairs those strings
//! so a single strict format can parse them, and [`OpeningHours`] collects
//! per-day ranges and renders them in OSM `opening_hours` notation.

use chrono::{NaiveTime, Weekday};

use crate::error::ScraperError;

/// The one format every normalized upstream time string must match.
pub const TIME_FORMAT_12H: &str = "%I:%M:%S %p";

/// Canonical day order used for both accumulation and rendering.
pub const DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Two-letter OSM day code for `day`.
#[must_use]
pub fn day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Repair a minute-only 12-hour time string into `H:MM:SS AM/PM` form.
///
/// A string with exactly one colon gets `:00` inserted before the space that
/// separates the clock time from the meridiem marker. Every other shape is
/// returned trimmed but otherwise untouched; parse failures surface later.
#[must_use]
pub fn normalize_time_string(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.matches(':').count() == 1 {
        trimmed.split_whitespace().collect::<Vec<_>>().join(":00 ")
    } else {
        trimmed.to_string()
    }
}

/// Parse a time-of-day string under `time_format`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidTime`] if `value` does not match the format.
pub fn parse_clock_time(value: &str, time_format: &str) -> Result<NaiveTime, ScraperError> {
    NaiveTime::parse_from_str(value.trim(), time_format).map_err(|source| {
        ScraperError::InvalidTime {
            value: value.trim().to_string(),
            format: time_format.to_string(),
            source,
        }
    })
}

/// One open interval on one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub day: Weekday,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Weekly schedule accumulated range by range, rendered once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningHours {
    ranges: Vec<DayRange>,
}

impl OpeningHours {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `open_time` and `close_time` under `time_format` and record the
    /// range for `day`. Nothing is recorded when either side fails to parse.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidTime`] for the first unparseable side.
    pub fn add_range(
        &mut self,
        day: Weekday,
        open_time: &str,
        close_time: &str,
        time_format: &str,
    ) -> Result<(), ScraperError> {
        let open = parse_clock_time(open_time, time_format)?;
        let close = parse_clock_time(close_time, time_format)?;
        self.ranges.push(DayRange { day, open, close });
        Ok(())
    }

    /// Recorded ranges in insertion order.
    #[must_use]
    pub fn ranges(&self) -> &[DayRange] {
        &self.ranges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Render the schedule as an OSM `opening_hours` value.
    ///
    /// Consecutive days with identical hours collapse into one `Mo-Fr` style
    /// group, closed days are left out, and a single all-week group spanning
    /// the whole day renders as `24/7`. Returns `None` when no range was
    /// recorded.
    #[must_use]
    pub fn as_opening_hours(&self) -> Option<String> {
        if self.ranges.is_empty() {
            return None;
        }

        let mut groups: Vec<DayGroup> = Vec::new();
        for day in DAYS {
            let hours = self.hours_for(day);
            match groups.last_mut() {
                Some(group) if group.hours == hours => group.to_day = day,
                _ => groups.push(DayGroup {
                    from_day: day,
                    to_day: day,
                    hours,
                }),
            }
        }

        if let [only] = groups.as_slice() {
            if matches!(only.hours.as_str(), "00:00-23:59" | "00:00-24:00") {
                return Some("24/7".to_string());
            }
        }

        let rendered: Vec<String> = groups
            .iter()
            .filter(|group| !group.hours.is_empty())
            .map(DayGroup::render)
            .collect();

        if rendered.is_empty() {
            None
        } else {
            Some(rendered.join("; "))
        }
    }

    /// Comma-joined `HH:MM-HH:MM` spans for `day`, earliest first, with
    /// duplicates dropped. Empty when the day has no range.
    fn hours_for(&self, day: Weekday) -> String {
        let mut spans: Vec<(NaiveTime, NaiveTime)> = self
            .ranges
            .iter()
            .filter(|range| range.day == day)
            .map(|range| (range.open, range.close))
            .collect();
        spans.sort_unstable();
        spans.dedup();

        spans
            .iter()
            .map(|(open, close)| format!("{}-{}", open.format("%H:%M"), render_close(*close)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

struct DayGroup {
    from_day: Weekday,
    to_day: Weekday,
    hours: String,
}

impl DayGroup {
    fn render(&self) -> String {
        if self.from_day == self.to_day {
            format!("{} {}", day_code(self.from_day), self.hours)
        } else {
            format!(
                "{}-{} {}",
                day_code(self.from_day),
                day_code(self.to_day),
                self.hours
            )
        }
    }
}

/// Midnight as a closing time means end of day.
fn render_close(close: NaiveTime) -> String {
    if close == NaiveTime::MIN {
        "24:00".to_string()
    } else {
        close.format("%H:%M").to_string()
    }
}

/// Build a schedule from per-day `(day, open, close)` strings.
///
/// A day contributes a range only when both strings are non-empty after
/// trimming. Both sides are normalized with [`normalize_time_string`] before
/// parsing; a day whose times still fail to parse is skipped with a warning
/// and does not affect the other days.
pub fn build_schedule<'a, I>(day_times: I, time_format: &str) -> OpeningHours
where
    I: IntoIterator<Item = (Weekday, Option<&'a str>, Option<&'a str>)>,
{
    day_times
        .into_iter()
        .fold(OpeningHours::new(), |mut hours, (day, open, close)| {
            let open = open.map(str::trim).filter(|v| !v.is_empty());
            let close = close.map(str::trim).filter(|v| !v.is_empty());
            let (Some(open), Some(close)) = (open, close) else {
                return hours;
            };

            let open = normalize_time_string(open);
            let close = normalize_time_string(close);
            if let Err(error) = hours.add_range(day, &open, &close, time_format) {
                tracing::warn!(
                    day = day_code(day),
                    open = %open,
                    close = %close,
                    %error,
                    "skipping unparseable opening-hours range"
                );
            }
            hours
        })
}

/// Render the weekly schedule for a store that reports a single open/close
/// pair, applied to every day of the week.
#[must_use]
pub fn parse_store_hours(open: Option<&str>, close: Option<&str>) -> Option<String> {
    build_schedule(
        DAYS.iter().map(|&day| (day, open, close)),
        TIME_FORMAT_12H,
    )
    .as_opening_hours()
}

#[cfg(test)]
#[path = "hours_test.rs"]
mod tests;
