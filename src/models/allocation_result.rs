//! Allocation result models.
//!
//! This module contains the [`AllocationResult`] report produced by one
//! allocation run together with the views it is built from. The JSON field
//! names are camelCase because report renderers consume them verbatim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score breakdown for one employee.
///
/// # Example
///
/// ```
/// use seat_allocator::models::PriorityScore;
/// use rust_decimal::Decimal;
///
/// let score = PriorityScore {
///     employee_id: "emp_001".to_string(),
///     base_priority: Decimal::new(5, 0),
///     distance_factor: Decimal::new(5, 1),
///     wfh_factor: Decimal::new(8, 0),
///     total: Decimal::new(135, 1),
///     wfh_count: 0,
///     wfh_limit: 8,
/// };
/// assert_eq!(score.total, score.base_priority + score.distance_factor + score.wfh_factor);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    /// The scored employee.
    pub employee_id: String,
    /// Points from the designation priority table.
    pub base_priority: Decimal,
    /// Points from commute distance.
    pub distance_factor: Decimal,
    /// Points from unused WFH allowance, including boosts.
    pub wfh_factor: Decimal,
    /// Sum of the three factors. Higher wins an office seat.
    pub total: Decimal,
    /// WFH days used in the counting window.
    pub wfh_count: u32,
    /// Monthly WFH cap for the employee's designation.
    pub wfh_limit: u32,
}

/// One employee placed on one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    /// The seated employee.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The seat identifier.
    pub seat_id: String,
    /// The seat label shown to operators.
    pub seat_label: String,
    /// The floor of the seat.
    pub floor_number: i32,
}

/// One employee sent home for the run date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhAssignment {
    /// The remote employee.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
}

/// Assignments on a single floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSeating {
    /// The floor number.
    pub floor_number: i32,
    /// Assignments on this floor, in seat order.
    pub assignments: Vec<SeatAssignment>,
}

/// Month-to-date WFH usage for one employee after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhUsage {
    /// The employee.
    pub employee_id: String,
    /// WFH days recorded this month, including the run date.
    pub used: u32,
    /// Monthly cap.
    pub limit: u32,
    /// `limit - used`; negative once the cap is exceeded.
    pub remaining: i64,
}

/// A non-fatal finding attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AllocationWarning {
    /// Post-run recount disagrees with the plan that was written.
    pub const VERIFICATION_MISMATCH: &'static str = "VERIFICATION_MISMATCH";
    /// A remote employee has now used more WFH days than their cap.
    pub const WFH_LIMIT_EXCEEDED: &'static str = "WFH_LIMIT_EXCEEDED";

    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The report of one allocation run.
///
/// Not persisted: it is a view over the seat and WFH record mutations the
/// run just performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Correlation id of the run.
    pub run_id: Uuid,
    /// The allocation date.
    pub date: NaiveDate,
    /// The company that was allocated.
    pub company_id: String,
    /// The branch whose seats were assigned.
    pub branch_id: String,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// Seat assignments in priority order.
    pub assignments: Vec<SeatAssignment>,
    /// Employees working from home, in priority order.
    pub wfh_employees: Vec<WfhAssignment>,
    /// Assignments grouped by floor, floors ascending.
    pub seating_by_floor: Vec<FloorSeating>,
    /// Month-to-date WFH usage per employee, in roster order.
    pub wfh_usage: Vec<WfhUsage>,
    /// Score breakdown per employee, in rank order.
    pub priorities: Vec<PriorityScore>,
    /// Non-fatal findings.
    pub warnings: Vec<AllocationWarning>,
}

impl AllocationResult {
    /// Returns true if the employee was given a seat in this run.
    pub fn is_seated(&self, employee_id: &str) -> bool {
        self.assignments.iter().any(|a| a.employee_id == employee_id)
    }

    /// Returns true if the employee was sent home in this run.
    pub fn is_wfh(&self, employee_id: &str) -> bool {
        self.wfh_employees.iter().any(|w| w.employee_id == employee_id)
    }

    /// Returns true if any warning carries `code`.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// Groups assignments by floor, preserving their order within a floor.
pub fn group_by_floor(assignments: &[SeatAssignment]) -> Vec<FloorSeating> {
    let mut floors: Vec<FloorSeating> = Vec::new();
    for assignment in assignments {
        match floors
            .iter_mut()
            .find(|f| f.floor_number == assignment.floor_number)
        {
            Some(floor) => floor.assignments.push(assignment.clone()),
            None => floors.push(FloorSeating {
                floor_number: assignment.floor_number,
                assignments: vec![assignment.clone()],
            }),
        }
    }
    floors.sort_by_key(|f| f.floor_number);
    floors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(employee_id: &str, seat_label: &str, floor: i32) -> SeatAssignment {
        SeatAssignment {
            employee_id: employee_id.to_string(),
            employee_name: employee_id.to_uppercase(),
            seat_id: format!("seat_{}", seat_label),
            seat_label: seat_label.to_string(),
            floor_number: floor,
        }
    }

    fn create_sample_result() -> AllocationResult {
        let assignments = vec![assignment("a", "101", 1), assignment("b", "201", 2)];
        AllocationResult {
            run_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            company_id: "acme".to_string(),
            branch_id: "hq".to_string(),
            engine_version: "0.1.0".to_string(),
            seating_by_floor: group_by_floor(&assignments),
            assignments,
            wfh_employees: vec![WfhAssignment {
                employee_id: "c".to_string(),
                employee_name: "C".to_string(),
            }],
            wfh_usage: vec![],
            priorities: vec![],
            warnings: vec![],
        }
    }

    #[test]
    fn test_result_serializes_with_camel_case_contract() {
        let json = serde_json::to_value(create_sample_result()).unwrap();

        assert_eq!(json["date"], "2026-03-02");
        assert_eq!(json["assignments"][0]["employeeId"], "a");
        assert_eq!(json["assignments"][0]["employeeName"], "A");
        assert_eq!(json["assignments"][0]["seatLabel"], "101");
        assert_eq!(json["wfhEmployees"][0]["employeeId"], "c");
        assert_eq!(json["wfhEmployees"][0]["employeeName"], "C");
    }

    #[test]
    fn test_group_by_floor_orders_floors() {
        let assignments = vec![
            assignment("a", "301", 3),
            assignment("b", "101", 1),
            assignment("c", "302", 3),
        ];

        let floors = group_by_floor(&assignments);
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0].floor_number, 1);
        assert_eq!(floors[1].floor_number, 3);
        assert_eq!(floors[1].assignments[0].employee_id, "a");
        assert_eq!(floors[1].assignments[1].employee_id, "c");
    }

    #[test]
    fn test_membership_helpers() {
        let result = create_sample_result();
        assert!(result.is_seated("a"));
        assert!(!result.is_seated("c"));
        assert!(result.is_wfh("c"));
        assert!(!result.has_warning(AllocationWarning::VERIFICATION_MISMATCH));
    }
}
