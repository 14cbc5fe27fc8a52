use chrono::{Days, NaiveDate};
use log::debug;

use crate::config::DayRecord;

/// The most recent day that is not after `today`.
pub fn anchor_date(records: &[DayRecord], today: NaiveDate) -> Option<NaiveDate> {
    records
        .iter()
        .map(|r| r.date)
        .filter(|d| *d <= today)
        .max()
}

/// Keeps the anchor day and the `days_back` days before it, most recent
/// first.
///
/// Days after `today` are dropped. Records sharing a day keep their input
/// order.
pub fn select_window(records: &[DayRecord], today: NaiveDate, days_back: u32) -> Vec<DayRecord> {
    let anchor = match anchor_date(records, today) {
        Some(d) => d,
        None => {
            debug!("select_window: no day on or before {}", today);
            return Vec::new();
        }
    };
    let lower = anchor
        .checked_sub_days(Days::new(days_back as u64))
        .unwrap_or(NaiveDate::MIN);
    debug!("select_window: anchor {} window [{}, {}]", anchor, lower, anchor);

    let mut res: Vec<DayRecord> = records
        .iter()
        .filter(|r| r.date >= lower && r.date <= anchor)
        .cloned()
        .collect();
    res.sort_by(|a, b| b.date.cmp(&a.date));
    res
}
