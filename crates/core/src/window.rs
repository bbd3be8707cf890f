//! Reset-window arithmetic for the rotating pools.
//!
//! Weekly pools (lootrun, raid) roll over at a fixed UTC weekday and hour;
//! the daily gambits roll over at a fixed UTC hour. Everything here is pure:
//! no I/O, no clocks. Callers pass `now` in.
//!
//! Week numbering is anchored globally: the current window is found by
//! integer week-division from a fixed reference reset, then labelled with
//! the calendar year of its start instant and its 1-based index within that
//! year. Windows are start-inclusive and end-exclusive.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Length of a weekly window in seconds.
pub const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

/// Smallest year accepted for caller-supplied windows.
pub const MIN_YEAR: i32 = 1970;

/// Largest year accepted for caller-supplied windows.
pub const MAX_YEAR: i32 = 9999;

/// Highest week index a calendar year can carry.
pub const MAX_WEEK: u32 = 53;

// ---------------------------------------------------------------------------
// Window identifiers
// ---------------------------------------------------------------------------

/// Key of one reset period: `"{year}-{week}"` or `"{year}-{month}-{day}"`.
///
/// Only ever derived from a [`PoolWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(String);

impl WindowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One weekly reset window. `week` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    pub year: i32,
    pub week: u32,
}

impl WeekWindow {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    pub fn id(&self) -> WindowId {
        WindowId(format!("{}-{}", self.year, self.week))
    }
}

/// One daily reset window, labelled by the shifted calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayWindow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayWindow {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn id(&self) -> WindowId {
        WindowId(format!("{}-{}-{}", self.year, self.month, self.day))
    }

    fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// A reset window of either cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolWindow {
    Week(WeekWindow),
    Day(DayWindow),
}

impl PoolWindow {
    pub fn id(&self) -> WindowId {
        match self {
            PoolWindow::Week(w) => w.id(),
            PoolWindow::Day(d) => d.id(),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            PoolWindow::Week(w) => w.year,
            PoolWindow::Day(d) => d.year,
        }
    }

    /// Check that the window's fields describe a real period.
    pub fn validate(&self) -> Result<(), CoreError> {
        let year = self.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CoreError::Validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }

        match self {
            PoolWindow::Week(w) => {
                if !(1..=MAX_WEEK).contains(&w.week) {
                    return Err(CoreError::Validation(format!(
                        "week must be between 1 and {MAX_WEEK}, got {}",
                        w.week
                    )));
                }
            }
            PoolWindow::Day(d) => {
                if d.date().is_none() {
                    return Err(CoreError::Validation(format!(
                        "{}-{}-{} is not a calendar date",
                        d.year, d.month, d.day
                    )));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for PoolWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ---------------------------------------------------------------------------
// Weekly resets
// ---------------------------------------------------------------------------

/// Weekday and UTC hour at which a weekly pool rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetAnchor {
    pub weekday: Weekday,
    pub hour: u32,
}

impl ResetAnchor {
    /// Lootrun pools reset Fridays at 19:00 UTC.
    pub const LOOTRUN: Self = Self::new(Weekday::Fri, 19);

    /// Raid pools reset Fridays at 18:00 UTC.
    pub const RAIDPOOL: Self = Self::new(Weekday::Fri, 18);

    pub const fn new(weekday: Weekday, hour: u32) -> Self {
        assert!(hour < 24, "reset hour must be below 24");
        Self { weekday, hour }
    }

    /// The first reset at or after the Unix epoch. All week arithmetic
    /// counts from here.
    fn reference_reset(&self) -> Timestamp {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let days = days_until(epoch.weekday(), self.weekday);
        epoch + TimeDelta::days(days) + TimeDelta::hours(i64::from(self.hour))
    }

    /// The window containing `now`.
    pub fn current_window(&self, now: Timestamp) -> WeekWindow {
        let reference = self.reference_reset();
        let elapsed = now.timestamp() - reference.timestamp();
        let start = reference + TimeDelta::weeks(elapsed.div_euclid(WEEK_SECS));

        // The first reset of the start's year sits on day `ordinal0 % 7`,
        // so whole weeks since then is `ordinal0 / 7`.
        WeekWindow {
            year: start.year(),
            week: start.ordinal0() / 7 + 1,
        }
    }

    /// First occurrence of the anchor weekday and hour on or after Jan 1.
    ///
    /// `None` only for years outside the supported calendar range.
    pub fn first_reset_of_year(&self, year: i32) -> Option<Timestamp> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let days = days_until(jan1.weekday(), self.weekday);
        at_hour(jan1, self.hour)?.checked_add_signed(TimeDelta::days(days))
    }

    /// `None` for week 0 or when the week lies past the representable range.
    pub fn window_start(&self, window: WeekWindow) -> Option<Timestamp> {
        let first = self.first_reset_of_year(window.year)?;
        let offset = i64::from(window.week.checked_sub(1)?);
        first.checked_add_signed(TimeDelta::try_weeks(offset)?)
    }

    pub fn window_end(&self, window: WeekWindow) -> Option<Timestamp> {
        self.window_start(window)?
            .checked_add_signed(TimeDelta::seconds(WEEK_SECS))
    }
}

// ---------------------------------------------------------------------------
// Daily resets
// ---------------------------------------------------------------------------

/// UTC hour at which a daily pool rolls over. The window is labelled with
/// the calendar day of `now - hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReset {
    pub hour: u32,
}

impl DailyReset {
    /// Raid gambits roll daily at 18:00 UTC.
    pub const GAMBITS: Self = Self::new(18);

    pub const fn new(hour: u32) -> Self {
        assert!(hour < 24, "reset hour must be below 24");
        Self { hour }
    }

    pub fn current_day(&self, now: Timestamp) -> DayWindow {
        let shifted = now - TimeDelta::hours(i64::from(self.hour));
        DayWindow {
            year: shifted.year(),
            month: shifted.month(),
            day: shifted.day(),
        }
    }

    pub fn day_start(&self, day: DayWindow) -> Option<Timestamp> {
        at_hour(day.date()?, self.hour)
    }

    pub fn day_end(&self, day: DayWindow) -> Option<Timestamp> {
        self.day_start(day)?.checked_add_signed(TimeDelta::days(1))
    }
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// How often a pool rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Weekly(ResetAnchor),
    Daily(DailyReset),
}

impl Cadence {
    pub fn current(&self, now: Timestamp) -> PoolWindow {
        match self {
            Cadence::Weekly(anchor) => PoolWindow::Week(anchor.current_window(now)),
            Cadence::Daily(reset) => PoolWindow::Day(reset.current_day(now)),
        }
    }

    /// Whether `window` has the shape this cadence produces.
    pub fn accepts(&self, window: &PoolWindow) -> bool {
        matches!(
            (self, window),
            (Cadence::Weekly(_), PoolWindow::Week(_)) | (Cadence::Daily(_), PoolWindow::Day(_))
        )
    }

    pub fn window_start(&self, window: &PoolWindow) -> Option<Timestamp> {
        match (self, window) {
            (Cadence::Weekly(anchor), PoolWindow::Week(w)) => anchor.window_start(*w),
            (Cadence::Daily(reset), PoolWindow::Day(d)) => reset.day_start(*d),
            _ => None,
        }
    }

    /// The next reset boundary after `window` begins. `None` when the
    /// window does not belong to this cadence.
    pub fn window_end(&self, window: &PoolWindow) -> Option<Timestamp> {
        match (self, window) {
            (Cadence::Weekly(anchor), PoolWindow::Week(w)) => anchor.window_end(*w),
            (Cadence::Daily(reset), PoolWindow::Day(d)) => reset.day_end(*d),
            _ => None,
        }
    }
}

/// Days forward from `from` to the next `to` (0 when equal).
fn days_until(from: Weekday, to: Weekday) -> i64 {
    let from = i64::from(from.num_days_from_monday());
    let to = i64::from(to.num_days_from_monday());
    (to - from).rem_euclid(7)
}

fn at_hour(date: NaiveDate, hour: u32) -> Option<Timestamp> {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .checked_add_signed(TimeDelta::hours(i64::from(hour)))
}
