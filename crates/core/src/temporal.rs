//! Temporal window calculations
//!
//! Derives the conclusion moment from stage durations and bounds which
//! calendar days may hold availability slots or suggestions.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::HangoutConfig;

/// Default months a member may plan ahead of the conclusion day
pub const FORWARD_WINDOW_MONTHS: u32 = 6;

/// Conclusion moment: creation plus every stage period
///
/// `HangoutConfig::new` rejects schedules whose sum leaves the supported
/// calendar, so the additions here cannot overflow.
pub fn conclusion_timestamp(config: &HangoutConfig) -> DateTime<Utc> {
    config.created_at
        + config.availability_period
        + config.suggestions_period
        + config.voting_period
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in a month (1-12). Returns 0 for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Blank cells before day 1 in a Monday-first calendar grid
///
/// `first_weekday` counts from Sunday = 0. Sunday gets 6 blanks, every
/// other day gets `first_weekday - 1`.
pub fn leading_blank_cells(first_weekday: u32) -> u32 {
    if first_weekday == 0 {
        6
    } else {
        first_weekday - 1
    }
}

/// Add whole months, clamping the day to the target month's length
fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Inclusive range of calendar days open for planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardWindow {
    first_day: NaiveDate,
    last_day: NaiveDate,
    months: u32,
}

impl ForwardWindow {
    /// Window opening on `anchor` and closing `months` later on the same
    /// day of month (or that month's last day if shorter)
    pub fn new(anchor: NaiveDate, months: u32) -> Self {
        let last_day = add_months(anchor, months).unwrap_or(NaiveDate::MAX);
        Self {
            first_day: anchor,
            last_day,
            months,
        }
    }

    /// Window anchored on the conclusion day
    pub fn from_conclusion(conclusion: DateTime<Utc>, months: u32) -> Self {
        Self::new(conclusion.date_naive(), months)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Calendar pages that can be navigated, as `(year, month)`
    pub fn months(&self) -> Vec<(i32, u32)> {
        (0..=self.months)
            .map(|offset| {
                let zero_based = self.first_day.month0() + offset;
                let year = self.first_day.year() + (zero_based / 12) as i32;
                (year, zero_based % 12 + 1)
            })
            .collect()
    }
}

/// True when `candidate` falls inside the `months`-long forward window
/// anchored on `anchor`
pub fn is_within_forward_window(candidate: DateTime<Utc>, anchor: DateTime<Utc>, months: u32) -> bool {
    ForwardWindow::from_conclusion(anchor, months).contains(candidate.date_naive())
}

/// Grid layout of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub day_count: u32,
}

impl MonthLayout {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            year,
            month,
            leading_blanks: leading_blank_cells(first.weekday().num_days_from_sunday()),
            day_count: days_in_month(year, month),
        })
    }

    /// Days of this month a member may pick
    pub fn selectable_days(&self, window: &ForwardWindow) -> Vec<u32> {
        (1..=self.day_count)
            .filter(|day| {
                NaiveDate::from_ymd_opt(self.year, self.month, *day)
                    .map(|date| window.contains(date))
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HangoutId;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_conclusion_is_sum_of_periods() {
        let created = Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();
        let config = HangoutConfig::new(
            HangoutId::new("h"),
            Duration::days(2),
            Duration::hours(36),
            Duration::days(1),
            created,
        )
        .unwrap();

        assert_eq!(
            conclusion_timestamp(&config),
            Utc.with_ymd_and_hms(2025, 1, 14, 20, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_days_in_month_table() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn test_leading_blank_cells() {
        assert_eq!(leading_blank_cells(0), 6);
        assert_eq!(leading_blank_cells(1), 0);
        assert_eq!(leading_blank_cells(6), 5);

        // June 2025 starts on a Sunday, September 2025 on a Monday
        assert_eq!(MonthLayout::new(2025, 6).unwrap().leading_blanks, 6);
        assert_eq!(MonthLayout::new(2025, 9).unwrap().leading_blanks, 0);
        assert_eq!(MonthLayout::new(2025, 3).unwrap().leading_blanks, 5);
    }

    #[test]
    fn test_forward_window_boundary() {
        let window = ForwardWindow::new(date(2025, 1, 15), 6);
        assert_eq!(window.last_day(), date(2025, 7, 15));
        assert!(window.contains(date(2025, 1, 15)));
        assert!(window.contains(date(2025, 7, 15)));
        assert!(!window.contains(date(2025, 7, 16)));
        assert!(!window.contains(date(2025, 1, 14)));
    }

    #[test]
    fn test_forward_window_clamps_short_month() {
        let window = ForwardWindow::new(date(2023, 8, 31), 6);
        assert_eq!(window.last_day(), date(2024, 2, 29));

        let window = ForwardWindow::new(date(2024, 8, 31), 6);
        assert_eq!(window.last_day(), date(2025, 2, 28));
    }

    #[test]
    fn test_forward_window_across_year() {
        let window = ForwardWindow::new(date(2025, 10, 3), 6);
        assert_eq!(window.last_day(), date(2026, 4, 3));
        assert_eq!(window.months().len(), 7);
        assert_eq!(window.months().first(), Some(&(2025, 10)));
        assert_eq!(window.months().last(), Some(&(2026, 4)));
    }

    #[test]
    fn test_is_within_forward_window() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 18, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 7, 15, 23, 59, 0).unwrap();
        assert!(is_within_forward_window(last, anchor, FORWARD_WINDOW_MONTHS));
        assert!(!is_within_forward_window(last + Duration::days(1), anchor, FORWARD_WINDOW_MONTHS));
        // Same calendar day as the anchor, earlier hour
        let morning = Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap();
        assert!(is_within_forward_window(morning, anchor, FORWARD_WINDOW_MONTHS));
    }

    #[test]
    fn test_forward_window_honors_configured_months() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 18, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap();
        assert!(!is_within_forward_window(april, anchor, 2));
        assert!(is_within_forward_window(april, anchor, 3));
        assert!(is_within_forward_window(
            Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
            anchor,
            12
        ));
    }

    #[test]
    fn test_selectable_days() {
        let window = ForwardWindow::new(date(2025, 1, 28), 6);

        let first = MonthLayout::new(2025, 1).unwrap();
        assert_eq!(first.selectable_days(&window), vec![28, 29, 30, 31]);

        let last = MonthLayout::new(2025, 7).unwrap();
        assert_eq!(last.selectable_days(&window), (1..=28).collect::<Vec<_>>());
    }
}
