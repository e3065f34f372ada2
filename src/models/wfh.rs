//! Work-from-home limits and records.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::employee::normalize_designation;
use crate::error::{EngineError, EngineResult};

/// Monthly WFH caps keyed by lower-cased designation.
///
/// # Example
///
/// ```
/// use seat_allocator::models::WfhLimits;
///
/// let limits = WfhLimits::from_iter([("Manager", 4), ("junior", 8)]);
/// assert_eq!(limits.get("MANAGER"), Some(4));
/// assert_eq!(limits.get("senior"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WfhLimits(BTreeMap<String, u32>);

impl WfhLimits {
    /// Looks up the cap for a designation, ignoring case.
    pub fn get(&self, designation: &str) -> Option<u32> {
        self.0.get(&normalize_designation(designation)).copied()
    }

    /// Returns a copy where every entry of `overrides` replaces ours.
    pub fn merged_with(&self, overrides: &WfhLimits) -> WfhLimits {
        let mut merged = self.0.clone();
        for (designation, limit) in &overrides.0 {
            merged.insert(designation.clone(), *limit);
        }
        WfhLimits(merged)
    }

    /// Rejects zero caps; the scorer divides by the cap.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some((designation, _)) = self.0.iter().find(|(_, limit)| **limit == 0) {
            return Err(EngineError::configuration(format!(
                "WFH limit for designation '{}' must be a positive integer",
                designation
            )));
        }
        Ok(())
    }

    /// Number of configured designations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no designation has a cap.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-keys entries so lookups are case-insensitive. Applied after
    /// deserialisation, which keeps keys as written.
    pub fn normalized(self) -> WfhLimits {
        self.0.into_iter().collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, u32)> for WfhLimits {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        WfhLimits(
            iter.into_iter()
                .map(|(designation, limit)| (normalize_designation(designation.as_ref()), limit))
                .collect(),
        )
    }
}

/// One consumed WFH day. At most one record exists per employee per date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WfhRecord {
    /// The employee working from home.
    pub employee_id: String,
    /// The calendar date of the WFH day.
    pub date: NaiveDate,
    /// The employee's company.
    pub company_id: String,
}

impl WfhRecord {
    /// Uniqueness key of the record.
    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.employee_id, self.date)
    }
}
