use chrono::{Duration, NaiveDate};

use crate::constants::{DATE_FORMAT, DEFAULT_WINDOW_DAYS};

/// Inclusive date range used to filter trades for aggregation.
///
/// The two call sites deliberately behave differently: queries without an
/// explicit start date get the closed trailing-week window of
/// [`TradeWindow::trailing_week`], while an explicit start date leaves the
/// upper side open. Callers that need a ceiling on the open-ended form
/// supply one through [`TradeWindow::bounded`] (the HTTP layer's
/// `end_date` parameter) instead of the window guessing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeWindow {
    /// First trade date included.
    pub start: NaiveDate,
    /// Last trade date included, or `None` for no upper bound.
    pub end: Option<NaiveDate>,
}

impl TradeWindow {
    /// Default window: seven calendar days before `today` through
    /// yesterday, both inclusive. `today` itself is excluded.
    pub fn trailing_week(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(DEFAULT_WINDOW_DAYS),
            end: Some(today - Duration::days(1)),
        }
    }

    /// Open-ended window from `start` onwards.
    pub fn from_start(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Window closed on both sides, `start` and `end` inclusive.
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Lower bound rendered in the fixed-width form trade dates are stored
    /// in, suitable for string comparison against them.
    pub fn start_bound(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// Upper bound rendered like [`TradeWindow::start_bound`], when one
    /// exists.
    pub fn end_bound(&self) -> Option<String> {
        self.end.map(|end| end.format(DATE_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trailing_week_spans_seven_days_ending_yesterday() {
        let window = TradeWindow::trailing_week(date(2024, 3, 15));

        assert_eq!(window.start, date(2024, 3, 8));
        assert_eq!(window.end, Some(date(2024, 3, 14)));
    }

    #[test]
    fn trailing_week_crosses_month_boundaries() {
        let window = TradeWindow::trailing_week(date(2024, 3, 4));

        assert_eq!(window.start, date(2024, 2, 26));
        assert_eq!(window.end, Some(date(2024, 3, 3)));
    }

    #[test]
    fn explicit_start_is_open_ended() {
        let window = TradeWindow::from_start(date(2024, 1, 1));

        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, None);
        assert_eq!(window.end_bound(), None);
    }

    #[test]
    fn bounds_render_fixed_width() {
        let window = TradeWindow::bounded(date(2024, 1, 2), date(2024, 11, 30));

        assert_eq!(window.start_bound(), "2024-01-02");
        assert_eq!(window.end_bound().unwrap(), "2024-11-30");
    }
}
