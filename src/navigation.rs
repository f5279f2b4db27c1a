//! Calendar navigation state for a dashboard screen.
//!
//! A [`NavigationState`] pairs the selected range with the anchor date used to
//! recompute calendar boundaries and the interval currently shown. Every
//! transition returns a new state; nothing is mutated in place.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::date_range::{
    can_step_forward, compute_interval, step, CustomRange, Direction, Interval, RangeSelection,
    Step,
};
use crate::display::format_interval;
use crate::error::{Error, Result};

/// Source of "now" for navigation.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Selected range, anchor date and the interval derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    selection: RangeSelection,
    anchor: NaiveDate,
    interval: Interval,
}

impl NavigationState {
    /// Initial state of a freshly mounted screen: Today, anchored on `now`.
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            selection: RangeSelection::Today,
            anchor: now.date(),
            interval: Interval::day(now.date()),
        }
    }

    /// State after explicitly choosing `selection`.
    ///
    /// Presets anchor on today, except Yesterday which anchors on the day it
    /// shows; custom ranges anchor on their start date.
    pub fn select(selection: RangeSelection, now: NaiveDateTime) -> Result<Self> {
        let anchor = match &selection {
            RangeSelection::Yesterday => now.date() - Duration::days(1),
            RangeSelection::Custom(custom) => custom.start_date,
            _ => now.date(),
        };
        let interval = compute_interval(&selection, anchor, now)?;
        debug!(
            selection = %selection,
            start = %interval.start(),
            end = %interval.end(),
            "Selected date range"
        );
        Ok(Self {
            selection,
            anchor,
            interval,
        })
    }

    /// State after applying a custom range from the range picker.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTimeFormat`] for a malformed time and
    /// [`Error::InvalidDateRange`] when the start lies after the end.
    pub fn apply_custom(custom: CustomRange, now: NaiveDateTime) -> Result<Self> {
        Self::select(RangeSelection::Custom(custom), now)
    }

    /// Step one unit into the past. Always allowed.
    pub fn back(&self, now: NaiveDateTime) -> Result<Self> {
        let step = step(
            &self.selection,
            &self.interval,
            self.anchor,
            Direction::Back,
            now,
        )?;
        Ok(self.advance(step, Direction::Back))
    }

    /// Step one unit towards the present.
    ///
    /// Returns `None` when forward navigation is blocked, or when the next
    /// window would begin after `now`.
    pub fn forward(&self, now: NaiveDateTime) -> Result<Option<Self>> {
        if !self.can_go_forward(now) {
            debug!(selection = %self.selection, "Forward navigation blocked");
            return Ok(None);
        }
        match step(
            &self.selection,
            &self.interval,
            self.anchor,
            Direction::Forward,
            now,
        ) {
            Ok(step) => Ok(Some(self.advance(step, Direction::Forward))),
            Err(Error::InvalidDateRange { start, .. }) => {
                warn!(selection = %self.selection, %start, "Next window starts in the future");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether the forward control should be enabled.
    #[must_use]
    pub fn can_go_forward(&self, now: NaiveDateTime) -> bool {
        can_step_forward(&self.selection, &self.interval, now)
    }

    /// Whether a forward step would produce a new state.
    ///
    /// Stricter than [`Self::can_go_forward`]: a window already clamped to
    /// `now` passes that check but has no next window to show.
    #[must_use]
    pub fn has_next(&self, now: NaiveDateTime) -> bool {
        self.can_go_forward(now)
            && step(
                &self.selection,
                &self.interval,
                self.anchor,
                Direction::Forward,
                now,
            )
            .is_ok()
    }

    fn advance(&self, step: Step, direction: Direction) -> Self {
        let selection = if self.selection.is_custom() {
            RangeSelection::Custom(CustomRange::from_interval(&step.interval))
        } else {
            self.selection.clone()
        };
        debug!(
            ?direction,
            selection = %selection,
            start = %step.interval.start(),
            end = %step.interval.end(),
            clamped = step.clamped,
            "Navigated date range"
        );
        Self {
            selection,
            anchor: step.anchor,
            interval: step.interval,
        }
    }

    #[must_use]
    pub const fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    #[must_use]
    pub const fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Human-readable description of the interval shown.
    #[must_use]
    pub fn display_range(&self) -> String {
        format_interval(&self.selection, &self.interval)
    }
}
