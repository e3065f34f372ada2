//! WFH ledger.
//!
//! Tracks consumed WFH days per employee. The ledger enforces the
//! one-record-per-employee-per-date invariant, so recording the same day
//! twice never double counts.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::models::WfhRecord;

/// An inclusive date range used for counting WFH days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingWindow {
    /// First counted date.
    pub start: NaiveDate,
    /// Last counted date. A window with `end < start` is empty.
    pub end: NaiveDate,
}

impl CountingWindow {
    /// Window whose counts feed the scorer for a run on `run_date`: the
    /// month so far, excluding the run date itself.
    ///
    /// # Example
    ///
    /// ```
    /// use seat_allocator::allocation::CountingWindow;
    /// use chrono::NaiveDate;
    ///
    /// let window = CountingWindow::before_run(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    /// assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    /// assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    /// ```
    pub fn before_run(run_date: NaiveDate) -> Self {
        Self {
            start: month_start(run_date),
            end: run_date.pred_opt().unwrap_or(NaiveDate::MIN),
        }
    }

    /// The month so far, including `date`.
    pub fn month_to_date(date: NaiveDate) -> Self {
        Self {
            start: month_start(date),
            end: date,
        }
    }

    /// Returns true if `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// In-memory view of WFH records for one company.
#[derive(Debug, Clone, Default)]
pub struct WfhLedger {
    records: BTreeMap<(String, NaiveDate), WfhRecord>,
}

impl WfhLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored records, collapsing duplicates.
    pub fn from_records<I: IntoIterator<Item = WfhRecord>>(records: I) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger
                .records
                .entry((record.employee_id.clone(), record.date))
                .or_insert(record);
        }
        ledger
    }

    /// Records one WFH day for each employee on `date`.
    ///
    /// Returns only the records that were not already present; those are
    /// the ones the caller still has to persist. Calling it again with the
    /// same arguments returns an empty list.
    ///
    /// # Example
    ///
    /// ```
    /// use seat_allocator::allocation::WfhLedger;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// let mut ledger = WfhLedger::new();
    ///
    /// assert_eq!(ledger.record_wfh(["a", "b"], date, "acme").len(), 2);
    /// assert!(ledger.record_wfh(["a"], date, "acme").is_empty());
    /// assert_eq!(ledger.current_period_count("a", date, date), 1);
    /// ```
    pub fn record_wfh<'a, I>(&mut self, employee_ids: I, date: NaiveDate, company_id: &str) -> Vec<WfhRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inserted = Vec::new();
        for employee_id in employee_ids {
            let key = (employee_id.to_string(), date);
            if self.records.contains_key(&key) {
                continue;
            }
            let record = WfhRecord {
                employee_id: employee_id.to_string(),
                date,
                company_id: company_id.to_string(),
            };
            self.records.insert(key, record.clone());
            inserted.push(record);
        }
        inserted
    }

    /// Number of WFH days for the employee in `[start, end]`, inclusive.
    pub fn current_period_count(&self, employee_id: &str, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }
        let count = self
            .records
            .range((employee_id.to_string(), start)..=(employee_id.to_string(), end))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Count for the employee inside `window`.
    pub fn count_in(&self, employee_id: &str, window: CountingWindow) -> u32 {
        self.current_period_count(employee_id, window.start, window.end)
    }

    /// Counts for every employee with at least one record in `window`.
    pub fn counts_in(&self, window: CountingWindow) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for record in self.records.values().filter(|r| window.contains(r.date)) {
            *counts.entry(record.employee_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Total number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(employee_id: &str, d: NaiveDate) -> WfhRecord {
        WfhRecord {
            employee_id: employee_id.to_string(),
            date: d,
            company_id: "acme".to_string(),
        }
    }

    #[test]
    fn test_count_is_inclusive_of_both_ends() {
        let ledger = WfhLedger::from_records([
            record("a", date(2026, 3, 1)),
            record("a", date(2026, 3, 5)),
            record("a", date(2026, 3, 9)),
            record("a", date(2026, 3, 10)),
        ]);

        assert_eq!(
            ledger.current_period_count("a", date(2026, 3, 1), date(2026, 3, 9)),
            3
        );
    }

    #[test]
    fn test_count_ignores_other_employees() {
        let ledger = WfhLedger::from_records([
            record("a", date(2026, 3, 2)),
            record("ab", date(2026, 3, 2)),
            record("b", date(2026, 3, 2)),
        ]);

        assert_eq!(
            ledger.current_period_count("a", date(2026, 3, 1), date(2026, 3, 31)),
            1
        );
    }

    #[test]
    fn test_duplicate_stored_records_are_collapsed() {
        let ledger = WfhLedger::from_records([
            record("a", date(2026, 3, 2)),
            record("a", date(2026, 3, 2)),
        ]);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_record_wfh_is_idempotent() {
        let mut ledger = WfhLedger::new();
        let d = date(2026, 3, 4);

        let first = ledger.record_wfh(["a", "b"], d, "acme");
        let second = ledger.record_wfh(["a", "b"], d, "acme");

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(ledger.current_period_count("a", d, d), 1);
    }

    #[test]
    fn test_empty_window_counts_zero() {
        let ledger = WfhLedger::from_records([record("a", date(2026, 3, 1))]);
        let window = CountingWindow::before_run(date(2026, 3, 1));

        assert!(window.end < window.start);
        assert_eq!(ledger.count_in("a", window), 0);
    }

    #[test]
    fn test_window_before_run_excludes_run_date() {
        let run = date(2026, 3, 10);
        let ledger = WfhLedger::from_records([
            record("a", date(2026, 2, 27)),
            record("a", date(2026, 3, 3)),
            record("a", run),
        ]);

        assert_eq!(ledger.count_in("a", CountingWindow::before_run(run)), 1);
        assert_eq!(ledger.count_in("a", CountingWindow::month_to_date(run)), 2);
    }

    #[test]
    fn test_counts_in_groups_by_employee() {
        let ledger = WfhLedger::from_records([
            record("a", date(2026, 3, 2)),
            record("a", date(2026, 3, 3)),
            record("b", date(2026, 3, 3)),
            record("c", date(2026, 4, 1)),
        ]);

        let counts = ledger.counts_in(CountingWindow::month_to_date(date(2026, 3, 31)));
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.get("c"), None);
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2026, 12, 31)), date(2026, 12, 1));
    }

    proptest! {
        #[test]
        fn prop_double_record_matches_single_record(
            days in proptest::collection::vec(1u32..28, 1..15),
        ) {
            let mut once = WfhLedger::new();
            let mut twice = WfhLedger::new();
            for day in &days {
                let d = date(2026, 5, *day);
                once.record_wfh(["a"], d, "acme");
                twice.record_wfh(["a"], d, "acme");
                twice.record_wfh(["a"], d, "acme");
            }
            prop_assert_eq!(
                once.current_period_count("a", date(2026, 5, 1), date(2026, 5, 31)),
                twice.current_period_count("a", date(2026, 5, 1), date(2026, 5, 31))
            );
        }
    }
}
