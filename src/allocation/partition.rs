//! Roster partitioning.
//!
//! Splits a scored roster into the office group, bounded by the number of
//! available seats, and the WFH group.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PriorityScore};

/// An employee paired with their score for this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEmployee {
    /// The employee.
    pub employee: Employee,
    /// The employee's score breakdown.
    pub score: PriorityScore,
}

/// The result of partitioning a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Employees who get a seat, highest priority first.
    pub office: Vec<RankedEmployee>,
    /// Employees who work from home, highest priority first.
    pub wfh: Vec<RankedEmployee>,
}

impl Partition {
    /// Total number of employees across both groups.
    pub fn len(&self) -> usize {
        self.office.len() + self.wfh.len()
    }

    /// Returns true if the roster was empty.
    pub fn is_empty(&self) -> bool {
        self.office.is_empty() && self.wfh.is_empty()
    }
}

/// Sorts a roster by descending score and splits it by seat count.
///
/// The sort is stable: employees with equal scores keep their roster
/// order, so unchanged inputs always give the same split.
///
/// # Errors
///
/// Returns `Configuration` if `available_seats` is negative.
///
/// # Examples
///
/// ```
/// use seat_allocator::allocation::partition;
///
/// let split = partition(Vec::new(), 3).unwrap();
/// assert!(split.is_empty());
/// assert!(partition(Vec::new(), -1).is_err());
/// ```
pub fn partition(mut roster: Vec<RankedEmployee>, available_seats: i64) -> EngineResult<Partition> {
    if available_seats < 0 {
        return Err(EngineError::configuration(format!(
            "available seat count must not be negative, got {}",
            available_seats
        )));
    }

    roster.sort_by(|a, b| b.score.total.cmp(&a.score.total));

    let office_size = usize::try_from(available_seats)
        .unwrap_or(usize::MAX)
        .min(roster.len());
    let wfh = roster.split_off(office_size);

    Ok(Partition {
        office: roster,
        wfh,
    })
}
