use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One position in the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the 1st of the month.
    Blank,
    Day(NaiveDate),
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day(date) => Some(*date),
        }
    }
}

/// Year and zero-based month being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month0: u32,
}

impl MonthCursor {
    /// Builds a cursor from a possibly out-of-range month index, rolling
    /// over into neighbouring years (12 is January of `year + 1`, -1 is
    /// December of `year - 1`). The year saturates at the `i32` bounds,
    /// where [`MonthCursor::first_day`] is `None` anyway.
    pub fn new(year: i32, month_index: i32) -> Self {
        Self {
            year: year.saturating_add(month_index.div_euclid(12)),
            month0: month_index.rem_euclid(12) as u32,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn shift(&self, delta: i32) -> Self {
        Self::new(self.year, self.month0 as i32 + delta)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// `None` when the year is outside the representable date range.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// Day 0 of the following month, i.e. the last day of this one.
    pub fn days_in_month(&self) -> Option<u32> {
        self.next()
            .first_day()
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
    }

    /// Weekday index of the 1st, Sunday being 0.
    pub fn leading_blanks(&self) -> Option<u32> {
        self.first_day()
            .map(|first| first.weekday().num_days_from_sunday())
    }

    pub fn cells(&self) -> Vec<CalendarCell> {
        let (Some(first), Some(days), Some(blanks)) =
            (self.first_day(), self.days_in_month(), self.leading_blanks())
        else {
            return Vec::new();
        };

        let mut cells = Vec::with_capacity((blanks + days) as usize);
        cells.extend((0..blanks).map(|_| CalendarCell::Blank));
        cells.extend(
            first
                .iter_days()
                .take(days as usize)
                .map(CalendarCell::Day),
        );
        cells
    }

    /// "March 2024"
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month0 + 1),
        }
    }
}

/// Grid for `year` and zero-based `month_index`. Empty if the year cannot
/// be represented.
pub fn month_grid(year: i32, month_index: i32) -> Vec<CalendarCell> {
    MonthCursor::new(year, month_index).cells()
}

/// Canonical `YYYY-MM-DD` key used in the persisted record.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a date key, accepting only the canonical form produced by
/// [`date_key`].
pub fn parse_date_key(text: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    (date_key(date) == text).then_some(date)
}

/// "Friday, March 15, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
