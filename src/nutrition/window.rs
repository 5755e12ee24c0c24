//! Trailing calendar-day window the analysis runs over.

use time::{Date, Duration, OffsetDateTime};

use super::error::AnalysisError;

/// `days` calendar days ending on (and including) the day of the reference time.
///
/// Days are taken in the reference time's offset; the caller supplies the clock
/// exactly once so every aggregator sees the same "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    days: u32,
    start: Date,
    end: Date,
}

impl AnalysisWindow {
    pub fn new(days: i64, reference_now: OffsetDateTime) -> Result<Self, AnalysisError> {
        if days <= 0 {
            return Err(AnalysisError::InvalidWindow(days));
        }
        let len = u32::try_from(days).map_err(|_| AnalysisError::WindowOutOfRange(days))?;
        let end = reference_now.date();
        let start = end
            .checked_sub(Duration::days(days - 1))
            .ok_or(AnalysisError::WindowOutOfRange(days))?;

        Ok(Self {
            days: len,
            start,
            end,
        })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Oldest day in the window.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Day of the reference time.
    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, day: Date) -> bool {
        day >= self.start && day <= self.end
    }

    /// Every day of the window, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = Date> {
        let start = self.start;
        (0..self.days).filter_map(move |offset| start.checked_add(Duration::days(i64::from(offset))))
    }

    /// Timestamp bounds for the record store query.
    ///
    /// A record's day is read in its own offset, which can sit up to 14 hours
    /// either side of UTC, so the bounds are padded by a full day on each side.
    /// The day filter in the aggregators decides membership; `None` means unbounded.
    pub fn fetch_range(&self) -> (Option<OffsetDateTime>, Option<OffsetDateTime>) {
        let from = self
            .start
            .previous_day()
            .map(|day| day.midnight().assume_utc());
        let to = self
            .end
            .next_day()
            .and_then(Date::next_day)
            .map(|day| day.midnight().assume_utc());
        (from, to)
    }
}
