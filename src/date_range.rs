//! Date range engine for filtering dashboard queries.
//!
//! Maps a named reporting period (Today, This Week, Custom, ...) together with
//! an anchor date and the current instant onto a concrete closed [`Interval`],
//! and moves that interval back and forward one unit of its own kind.
//!
//! All functions here are pure: "now" is always supplied by the caller and
//! instants are local wall-clock values without a timezone. Weeks start on
//! Monday.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::{Error, Result};

/// Default start time of a custom range.
pub const DEFAULT_START_TIME: &str = "00:00";

/// Default end time of a custom range.
pub const DEFAULT_END_TIME: &str = "23:59";

const MS_PER_DAY: i64 = 86_400_000;

/// Midnight at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last millisecond of `date` (23:59:59.999).
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(MS_PER_DAY - 1)
}

/// A closed reporting window. Both bounds are inclusive and `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Create an interval, rejecting a start that lies after the end.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole of a single calendar day.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self::days(date, date)
    }

    /// Whole days from `first` through `last`. Callers guarantee `first <= last`.
    fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether `instant` falls inside the window (bounds included).
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whole days covered by the window, rounded down.
    ///
    /// Any window shorter than 24 hours has a span of 0, including one that
    /// crosses midnight.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Explicit bounds of a custom range: calendar dates plus `HH:mm` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRange {
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
}

impl CustomRange {
    /// Create a custom range using the default times (00:00 - 23:59).
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            start_time: DEFAULT_START_TIME.to_string(),
            end_date,
            end_time: DEFAULT_END_TIME.to_string(),
        }
    }

    /// Replace the start and end times.
    #[must_use]
    pub fn with_times(mut self, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    /// Describe an already computed interval as custom-range form fields.
    #[must_use]
    pub fn from_interval(interval: &Interval) -> Self {
        Self {
            start_date: interval.start.date(),
            start_time: interval.start.format("%H:%M").to_string(),
            end_date: interval.end.date(),
            end_time: interval.end.format("%H:%M").to_string(),
        }
    }

    /// Combine dates and times into an interval. No day-boundary snapping.
    pub fn interval(&self) -> Result<Interval> {
        let start = combine_date_and_time(self.start_date, &self.start_time)?;
        let end = combine_date_and_time(self.end_date, &self.end_time)?;
        Interval::new(start, end)
    }
}

/// The reporting period selected on a dashboard screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RangeSelection {
    #[default]
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    Custom(CustomRange),
}

static PRESETS: [RangeSelection; 7] = [
    RangeSelection::Today,
    RangeSelection::Yesterday,
    RangeSelection::ThisWeek,
    RangeSelection::LastWeek,
    RangeSelection::ThisMonth,
    RangeSelection::LastMonth,
    RangeSelection::ThisYear,
];

impl RangeSelection {
    /// Every selection that needs no explicit bounds, in menu order.
    #[must_use]
    pub fn presets() -> &'static [Self] {
        &PRESETS
    }

    /// Label shown in the range picker.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This Week",
            Self::LastWeek => "Last Week",
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::ThisYear => "This Year",
            Self::Custom(_) => "Custom",
        }
    }

    /// Today and Yesterday navigate one calendar day at a time.
    #[must_use]
    pub const fn is_single_day(&self) -> bool {
        matches!(self, Self::Today | Self::Yesterday)
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for RangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RangeSelection {
    type Err = Error;

    /// Parse a preset label such as `this-week`, `This Week` or `last_month`.
    ///
    /// `Custom` cannot be parsed since it needs explicit bounds.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "this-week" => Ok(Self::ThisWeek),
            "last-week" => Ok(Self::LastWeek),
            "this-month" => Ok(Self::ThisMonth),
            "last-month" => Ok(Self::LastMonth),
            "this-year" => Ok(Self::ThisYear),
            _ => Err(Error::other(format!(
                "unknown date range '{s}' (expected one of: today, yesterday, this-week, \
                 last-week, this-month, last-month, this-year)"
            ))),
        }
    }
}

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    const fn sign(self) -> i64 {
        match self {
            Self::Back => -1,
            Self::Forward => 1,
        }
    }
}

/// Result of moving an interval by one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub interval: Interval,
    pub anchor: NaiveDate,
    /// The end was capped at "now".
    pub clamped: bool,
}

/// Parse an `HH:mm` 24-hour time string.
///
/// Hours must be in `0..=23` and minutes in `0..=59`; one or two digits each.
pub fn parse_time_of_day(time: &str) -> Result<NaiveTime> {
    let invalid = || Error::InvalidTimeFormat(time.to_string());
    let (hours, minutes) = time.trim().split_once(':').ok_or_else(invalid)?;
    let hours = parse_clock_component(hours, 23).ok_or_else(invalid)?;
    let minutes = parse_clock_component(minutes, 59).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

fn parse_clock_component(part: &str, max: u32) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok().filter(|value| *value <= max)
}

/// Set hours and minutes on `date`'s calendar day; seconds and millis are zero.
///
/// # Errors
///
/// Returns [`Error::InvalidTimeFormat`] if `time` is not a valid `HH:mm` string.
pub fn combine_date_and_time(date: NaiveDate, time: &str) -> Result<NaiveDateTime> {
    Ok(date.and_time(parse_time_of_day(time)?))
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

/// Monday through Sunday of the week containing `date`.
fn week_of(date: NaiveDate) -> Interval {
    let monday = start_of_week(date);
    Interval::days(monday, monday + Duration::days(6))
}

fn month_of(date: NaiveDate) -> Interval {
    let first = first_of_month(date);
    // 32 days past the 1st always lands in the following month.
    let next_first = first_of_month(first + Duration::days(32));
    Interval::days(first, next_first - Duration::days(1))
}

fn year_of(date: NaiveDate) -> Interval {
    let first = first_of_year(date);
    let next_first = first_of_year(first + Duration::days(366));
    Interval::days(first, next_first - Duration::days(1))
}

/// Compute the concrete interval for a selection.
///
/// `Today` and `Yesterday` derive from `now`; week, month and year presets
/// derive from `anchor`; `Custom` uses its explicit bounds.
///
/// # Errors
///
/// Custom ranges fail with [`Error::InvalidTimeFormat`] on a malformed time
/// and with [`Error::InvalidDateRange`] if their start lies after their end.
pub fn compute_interval(
    selection: &RangeSelection,
    anchor: NaiveDate,
    now: NaiveDateTime,
) -> Result<Interval> {
    let interval = match selection {
        RangeSelection::Today => Interval::day(now.date()),
        RangeSelection::Yesterday => Interval::day(now.date() - Duration::days(1)),
        RangeSelection::ThisWeek => week_of(anchor),
        RangeSelection::LastWeek => week_of(anchor - Duration::days(7)),
        RangeSelection::ThisMonth => month_of(anchor),
        RangeSelection::LastMonth => month_of(first_of_month(anchor) - Duration::days(1)),
        RangeSelection::ThisYear => year_of(anchor),
        RangeSelection::Custom(custom) => custom.interval()?,
    };
    Ok(interval)
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| Error::overflow(format!("cannot shift {date} by {days} days")))
}

fn shift_months(date: NaiveDate, months: u32, direction: Direction) -> Result<NaiveDate> {
    let shifted = match direction {
        Direction::Forward => date.checked_add_months(Months::new(months)),
        Direction::Back => date.checked_sub_months(Months::new(months)),
    };
    shifted.ok_or_else(|| Error::overflow(format!("cannot shift {date} by {months} months")))
}

/// Move `current` one unit of its own kind in `direction`.
///
/// Presets recompute their calendar boundaries from the shifted anchor:
/// one day for Today/Yesterday, seven days for weeks, one calendar month for
/// months and one calendar year for This Year. Custom ranges shift both
/// bounds by their span plus one day, keeping the time of day.
///
/// Forward steps on multi-day selections cap the end at `now`; a clamped
/// custom range keeps its length by moving the start back from `now`. Single
/// day selections are never clamped, and backward steps never are.
///
/// # Errors
///
/// [`Error::InvalidDateRange`] when a clamped preset window would start after
/// `now`, and [`Error::CalendarOverflow`] at the edges of the calendar.
pub fn step(
    selection: &RangeSelection,
    current: &Interval,
    anchor: NaiveDate,
    direction: Direction,
    now: NaiveDateTime,
) -> Result<Step> {
    let sign = direction.sign();
    let (shifted, anchor) = match selection {
        RangeSelection::Today | RangeSelection::Yesterday => {
            let anchor = shift_days(anchor, sign)?;
            (Interval::day(anchor), anchor)
        }
        RangeSelection::ThisWeek | RangeSelection::LastWeek => {
            let anchor = shift_days(anchor, 7 * sign)?;
            (compute_interval(selection, anchor, now)?, anchor)
        }
        RangeSelection::ThisMonth | RangeSelection::LastMonth => {
            let anchor = shift_months(anchor, 1, direction)?;
            (compute_interval(selection, anchor, now)?, anchor)
        }
        RangeSelection::ThisYear => {
            let anchor = shift_months(anchor, 12, direction)?;
            (compute_interval(selection, anchor, now)?, anchor)
        }
        RangeSelection::Custom(_) => return step_custom(current, direction, now),
    };

    if direction == Direction::Forward && !selection.is_single_day() && shifted.end > now {
        let interval = Interval::new(shifted.start, now)?;
        debug!(selection = %selection, end = %now, "Clamped forward step to now");
        return Ok(Step {
            interval,
            anchor,
            clamped: true,
        });
    }

    Ok(Step {
        interval: shifted,
        anchor,
        clamped: false,
    })
}

fn step_custom(current: &Interval, direction: Direction, now: NaiveDateTime) -> Result<Step> {
    let span = current.span_days();
    let offset = Duration::days((span + 1) * direction.sign());
    let overflow = || Error::overflow(format!("cannot shift custom range by {offset}"));
    let start = current.start.checked_add_signed(offset).ok_or_else(overflow)?;
    let end = current.end.checked_add_signed(offset).ok_or_else(overflow)?;

    if direction == Direction::Forward && end > now {
        let start = now
            .checked_sub_signed(current.end - current.start)
            .ok_or_else(overflow)?;
        debug!(span_days = span, end = %now, "Clamped custom range to now");
        return Ok(Step {
            interval: Interval::new(start, now)?,
            anchor: start.date(),
            clamped: true,
        });
    }

    Ok(Step {
        interval: Interval::new(start, end)?,
        anchor: start.date(),
        clamped: false,
    })
}

/// Whether a forward step is allowed from `current`.
///
/// Single-day selections are blocked once the shown day is today's date;
/// every other selection is blocked once its end reaches the end of today.
#[must_use]
pub fn can_step_forward(selection: &RangeSelection, current: &Interval, now: NaiveDateTime) -> bool {
    if selection.is_single_day() {
        current.end.date() != now.date()
    } else {
        current.end < end_of_day(now.date())
    }
}
