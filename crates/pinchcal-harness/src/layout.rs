//! Synthetic screen layout standing in for a rendered calendar.
//!
//! The month view is a 7-column grid of square cells, Sunday first, leading
//! blanks included. The year view is a 4x3 grid of month previews. Both are
//! anchored at their own origin so scripts can leave room for headers.

use pinchcal_core::{PointerPosition, Rect};
use pinchcal_view::{CalendarCursor, DateKey, HitTester, MonthIndex};

const WEEK: usize = 7;
const PREVIEW_COLUMNS: usize = 4;
const PREVIEW_ROWS: usize = 3;

/// Fixed-geometry [`HitTester`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Top-left corner of the first week row.
    pub month_origin: PointerPosition,
    /// Side of one day cell.
    pub cell_size: f64,
    /// Top-left corner of the January preview.
    pub year_origin: PointerPosition,
    pub preview_width: f64,
    pub preview_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            month_origin: PointerPosition::new(0.0, 60.0),
            cell_size: 40.0,
            year_origin: PointerPosition::new(0.0, 60.0),
            preview_width: 100.0,
            preview_height: 100.0,
        }
    }
}

impl GridLayout {
    /// Area covered by the day cells of `cursor`'s month.
    #[must_use]
    pub fn month_bounds(&self, cursor: CalendarCursor) -> Rect {
        let rows = cursor.grid().weeks().count();
        Rect::new(
            self.month_origin.x,
            self.month_origin.y,
            self.cell_size * WEEK as f64,
            self.cell_size * rows as f64,
        )
    }

    /// Area covered by the twelve month previews.
    #[must_use]
    pub fn year_bounds(&self) -> Rect {
        Rect::new(
            self.year_origin.x,
            self.year_origin.y,
            self.preview_width * PREVIEW_COLUMNS as f64,
            self.preview_height * PREVIEW_ROWS as f64,
        )
    }

    /// Centre of the cell showing `date`, if it is in `cursor`'s month.
    #[must_use]
    pub fn cell_center(&self, cursor: CalendarCursor, date: DateKey) -> Option<PointerPosition> {
        let index = cursor.grid().cells().iter().position(|c| *c == Some(date))?;
        let (row, col) = (index / WEEK, index % WEEK);
        Some(PointerPosition::new(
            self.month_origin.x + (col as f64 + 0.5) * self.cell_size,
            self.month_origin.y + (row as f64 + 0.5) * self.cell_size,
        ))
    }

    /// Centre of the preview for `month`.
    #[must_use]
    pub fn preview_center(&self, month: MonthIndex) -> PointerPosition {
        let index = usize::from(month.get());
        let (row, col) = (index / PREVIEW_COLUMNS, index % PREVIEW_COLUMNS);
        PointerPosition::new(
            self.year_origin.x + (col as f64 + 0.5) * self.preview_width,
            self.year_origin.y + (row as f64 + 0.5) * self.preview_height,
        )
    }
}

impl HitTester for GridLayout {
    fn hit_test(&self, cursor: CalendarCursor, pos: PointerPosition) -> Option<DateKey> {
        if !self.month_bounds(cursor).contains(pos) {
            return None;
        }
        let col = ((pos.x - self.month_origin.x) / self.cell_size) as usize;
        let row = ((pos.y - self.month_origin.y) / self.cell_size) as usize;
        cursor.grid().date_at(row * WEEK + col)
    }

    fn hit_test_month(&self, _cursor: CalendarCursor, pos: PointerPosition) -> Option<MonthIndex> {
        if !self.year_bounds().contains(pos) {
            return None;
        }
        let col = ((pos.x - self.year_origin.x) / self.preview_width) as usize;
        let row = ((pos.y - self.year_origin.y) / self.preview_height) as usize;
        u8::try_from(row * PREVIEW_COLUMNS + col).ok().and_then(MonthIndex::new)
    }
}
