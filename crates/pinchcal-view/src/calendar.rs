#![forbid(unsafe_code)]

//! Calendar primitives: date keys, month indices, the navigation cursor and
//! month-grid generation.
//!
//! Grids are Sunday-first: the first row starts with one blank cell per
//! weekday before the 1st of the month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// DateKey
// ---------------------------------------------------------------------------

/// A calendar day, rendered and parsed as ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Build from year, 1-based month and day. `None` if the date is invalid.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Zero-based month of this day.
    #[must_use]
    pub fn month_index(self) -> MonthIndex {
        MonthIndex(self.0.month0() as u8)
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

// ---------------------------------------------------------------------------
// MonthIndex
// ---------------------------------------------------------------------------

/// Zero-based month of the year (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthIndex(u8);

impl MonthIndex {
    pub const JANUARY: Self = Self(0);
    pub const DECEMBER: Self = Self(11);

    /// `None` unless `index < 12`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 12 { Some(Self(index)) } else { None }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One-based month number as chrono expects it.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0 as u32 + 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
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
        NAMES[self.0 as usize]
    }

    /// Every month in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..12).map(Self)
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CalendarCursor
// ---------------------------------------------------------------------------

/// The month currently shown by the month view (and highlighted in the year
/// view).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    pub year: i32,
    pub month: MonthIndex,
}

impl CalendarCursor {
    #[must_use]
    pub const fn new(year: i32, month: MonthIndex) -> Self {
        Self { year, month }
    }

    /// Cursor on the month containing `date`.
    #[must_use]
    pub fn containing(date: DateKey) -> Self {
        Self::new(date.year(), date.month_index())
    }

    #[must_use]
    pub fn next_month(self) -> Self {
        if self.month == MonthIndex::DECEMBER {
            Self::new(self.year.saturating_add(1), MonthIndex::JANUARY)
        } else {
            Self::new(self.year, MonthIndex(self.month.0 + 1))
        }
    }

    #[must_use]
    pub fn prev_month(self) -> Self {
        if self.month == MonthIndex::JANUARY {
            Self::new(self.year.saturating_sub(1), MonthIndex::DECEMBER)
        } else {
            Self::new(self.year, MonthIndex(self.month.0 - 1))
        }
    }

    #[must_use]
    pub fn next_year(self) -> Self {
        Self::new(self.year.saturating_add(1), self.month)
    }

    #[must_use]
    pub fn prev_year(self) -> Self {
        Self::new(self.year.saturating_sub(1), self.month)
    }

    #[must_use]
    pub fn with_month(self, month: MonthIndex) -> Self {
        Self::new(self.year, month)
    }

    /// Grid for the month under the cursor.
    #[must_use]
    pub fn grid(self) -> MonthGrid {
        month_grid(self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Month grid
// ---------------------------------------------------------------------------

/// Cells of a Sunday-first month grid. `None` cells are leading blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    cells: Vec<Option<DateKey>>,
}

impl MonthGrid {
    /// All cells, row-major, seven per week.
    #[must_use]
    pub fn cells(&self) -> &[Option<DateKey>] {
        &self.cells
    }

    /// Number of leading blank cells.
    #[must_use]
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    #[must_use]
    pub fn days_in_month(&self) -> usize {
        self.cells.len() - self.leading_blanks()
    }

    /// Rows of up to seven cells; the last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<DateKey>]> {
        self.cells.chunks(7)
    }

    /// Date at a cell index, if the cell bears one.
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<DateKey> {
        self.cells.get(index).copied().flatten()
    }
}

/// Build the Sunday-first grid for a month. Years outside chrono's range
/// produce an empty grid.
#[must_use]
pub fn month_grid(year: i32, month: MonthIndex) -> MonthGrid {
    let Some(first) = NaiveDate::from_ymd_opt(year, month.number(), 1) else {
        return MonthGrid { cells: Vec::new() };
    };
    let blanks = first.weekday().num_days_from_sunday() as usize;
    let mut cells = vec![None; blanks];
    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month0() == u32::from(month.0))
            .map(|d| Some(DateKey(d))),
    );
    MonthGrid { cells }
}
