//! Priority scoring.
//!
//! This module computes how strongly an employee deserves an office seat for
//! the next run from three factors:
//!
//! - base points from the designation priority table
//! - commute distance normalised against a reference distance
//! - the unused share of the monthly WFH allowance, with boosts for
//!   employees who have used little or none of it
//!
//! Scores are exact decimals, so identical inputs always give identical
//! totals and ties are real ties.

use rust_decimal::Decimal;

use crate::config::ScoringPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PriorityScore};

/// Computes the priority score for one employee.
///
/// # Arguments
///
/// * `employee` - The employee to score
/// * `wfh_count` - WFH days already used in the current period, before this run
/// * `wfh_limit` - Monthly WFH cap for the employee's designation
/// * `policy` - Designation table and weights
///
/// # Errors
///
/// - `InvalidEmployee` if the commute distance is negative
/// - `Configuration` if `wfh_limit` is zero or the reference distance is not positive
///
/// # Examples
///
/// ```
/// use seat_allocator::allocation::score_employee;
/// use seat_allocator::config::ScoringPolicy;
/// use seat_allocator::models::Employee;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = Employee {
///     id: "a".to_string(),
///     company_id: "acme".to_string(),
///     name: "A".to_string(),
///     designation: "manager".to_string(),
///     distance: Decimal::new(5, 0),
/// };
///
/// // 5 (manager) + 5/20*2 + (1 - 0/8)*5 + 3 (no WFH used yet)
/// let score = score_employee(&employee, 0, 8, &ScoringPolicy::default()).unwrap();
/// assert_eq!(score.total, Decimal::from_str("13.5").unwrap());
/// ```
pub fn score_employee(
    employee: &Employee,
    wfh_count: u32,
    wfh_limit: u32,
    policy: &ScoringPolicy,
) -> EngineResult<PriorityScore> {
    employee.validate()?;

    if wfh_limit == 0 {
        return Err(EngineError::configuration(format!(
            "WFH limit for designation '{}' must be positive (employee '{}')",
            employee.designation, employee.id
        )));
    }
    if policy.distance.reference <= Decimal::ZERO {
        return Err(EngineError::configuration(
            "distance reference must be positive",
        ));
    }

    let base_priority = policy.base_priority(&employee.designation);

    // Unbounded on purpose: distances past the reference keep scaling.
    let distance_factor = employee.distance / policy.distance.reference * policy.distance.weight;

    let wfh_factor = wfh_factor(wfh_count, wfh_limit, policy);

    Ok(PriorityScore {
        employee_id: employee.id.clone(),
        base_priority,
        distance_factor,
        wfh_factor,
        total: base_priority + distance_factor + wfh_factor,
        wfh_count,
        wfh_limit,
    })
}

/// WFH component of the score. `wfh_limit` must be non-zero.
fn wfh_factor(wfh_count: u32, wfh_limit: u32, policy: &ScoringPolicy) -> Decimal {
    let used = Decimal::from(wfh_count) / Decimal::from(wfh_limit);
    let factor = (Decimal::ONE - used) * policy.wfh.weight;

    let boost = if wfh_count == 0 {
        policy.wfh.unused_boost
    } else if used < policy.wfh.low_usage_threshold {
        policy.wfh.low_usage_boost
    } else {
        Decimal::ZERO
    };

    factor + boost
}
