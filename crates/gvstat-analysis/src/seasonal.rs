//! Incident counts by day of the year

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gvstat_data::dataset::RoleTable;
use serde::{Deserialize, Serialize};

/// Default lower bound of [`CaseCountByDay::compute`], exclusive.
pub const DEFAULT_SINCE: &str = "2015-01-01";

const DAY_KEY_FORMAT: &str = "%m%d";

/// Number of rows per calendar day, keyed by `MMDD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCountByDay {
    pub since: NaiveDate,
    pub counts: BTreeMap<String, u64>,
}

impl CaseCountByDay {
    /// Counts the rows dated strictly after `since`.
    ///
    /// Rows of different years fall into the same key.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gvstat_analysis::seasonal::CaseCountByDay;
    /// use gvstat_data::{
    ///     dataset::{ParticipantRow, RoleTable},
    ///     participant::Role,
    /// };
    ///
    /// let mut table = RoleTable::new(Role::Victim);
    /// for (y, m, d) in [(2016, 7, 4), (2017, 7, 4), (2014, 7, 4), (2015, 1, 1)] {
    ///     table.rows.push(ParticipantRow {
    ///         date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
    ///         participants: vec![],
    ///     });
    /// }
    ///
    /// let since = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    /// let counts = CaseCountByDay::compute(&table, since);
    /// assert_eq!(counts.get(7, 4), 2);
    /// assert_eq!(counts.counts.len(), 1);
    /// ```
    #[must_use]
    pub fn compute(table: &RoleTable, since: NaiveDate) -> Self {
        let mut counts = BTreeMap::<String, u64>::new();
        for row in table.rows.iter().filter(|row| row.date > since) {
            *counts
                .entry(row.date.format(DAY_KEY_FORMAT).to_string())
                .or_default() += 1;
        }
        log::info!(
            "counted {} {} rows after {since} over {} days",
            counts.values().sum::<u64>(),
            table.role,
            counts.len()
        );
        Self { since, counts }
    }

    /// Count for the given month and day, 0 when absent.
    #[must_use]
    pub fn get(&self, month: u32, day: u32) -> u64 {
        self.counts
            .get(&format!("{month:02}{day:02}"))
            .copied()
            .unwrap_or(0)
    }

    /// Day with the most rows, ties resolved to the earliest day.
    #[must_use]
    pub fn busiest_day(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .map(|(day, count)| (day.as_str(), *count))
            .fold(None, |best, (day, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((day, count)),
            })
    }
}

#[cfg(test)]
mod tests {
    use gvstat_data::{dataset::ParticipantRow, participant::Role};

    use super::*;

    fn table(dates: &[(i32, u32, u32)]) -> RoleTable {
        RoleTable {
            role: Role::Suspect,
            rows: dates
                .iter()
                .map(|&(y, m, d)| ParticipantRow {
                    date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                    participants: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_since_is_exclusive() {
        let since = DEFAULT_SINCE.parse::<NaiveDate>().unwrap();
        let counts = CaseCountByDay::compute(&table(&[(2015, 1, 1), (2015, 1, 2), (2016, 1, 1)]), since);
        assert_eq!(counts.get(1, 1), 1);
        assert_eq!(counts.get(1, 2), 1);
        assert_eq!(counts.counts.keys().collect::<Vec<_>>(), ["0101", "0102"]);
    }

    #[test]
    fn test_busiest_day() {
        let since = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let counts = CaseCountByDay::compute(
            &table(&[(2016, 12, 31), (2017, 12, 31), (2016, 3, 5), (2017, 3, 5), (2016, 1, 9)]),
            since,
        );
        assert_eq!(counts.busiest_day(), Some(("0305", 2)));
        assert_eq!(CaseCountByDay::compute(&table(&[]), since).busiest_day(), None);
    }
}
