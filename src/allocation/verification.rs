//! Post-run verification.
//!
//! Re-reads the branch's seats after the writes and compares them with the
//! plan. Differences are warnings: nothing is rolled back, re-running the
//! allocation is the recovery path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{AllocationWarning, Seat, SeatAssignment};

/// Recount of a branch after an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Seats that hold an employee.
    pub assigned_seats: usize,
    /// Seats that are empty.
    pub unassigned_seats: usize,
    /// Seats the plan filled.
    pub expected_assigned: usize,
    /// One line per seat whose occupant differs from the plan.
    pub mismatches: Vec<String>,
}

impl VerificationReport {
    /// Returns true if the stored seats match the plan exactly.
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty() && self.assigned_seats == self.expected_assigned
    }

    /// Converts an inconsistent report into a warning.
    pub fn to_warning(&self) -> Option<AllocationWarning> {
        if self.is_consistent() {
            return None;
        }
        let mut message = format!(
            "{} seat(s) assigned after run, {} expected; {} unassigned",
            self.assigned_seats, self.expected_assigned, self.unassigned_seats
        );
        if !self.mismatches.is_empty() {
            message.push_str(": ");
            message.push_str(&self.mismatches.join("; "));
        }
        Some(AllocationWarning::new(
            AllocationWarning::VERIFICATION_MISMATCH,
            message,
            "high",
        ))
    }
}

/// Compares stored seats with the planned assignments.
pub fn verify_assignments(planned: &[SeatAssignment], stored: &[Seat]) -> VerificationReport {
    let expected: HashMap<&str, &str> = planned
        .iter()
        .map(|a| (a.seat_id.as_str(), a.employee_id.as_str()))
        .collect();

    let mut mismatches = Vec::new();
    for seat in stored {
        let want = expected.get(seat.id.as_str()).copied();
        let have = seat.employee_id.as_deref();
        if want != have {
            mismatches.push(format!(
                "seat '{}' holds {} but plan has {}",
                seat.seat_label,
                have.unwrap_or("nobody"),
                want.unwrap_or("nobody")
            ));
        }
    }

    let assigned_seats = stored.iter().filter(|s| s.is_assigned()).count();

    VerificationReport {
        assigned_seats,
        unassigned_seats: stored.len() - assigned_seats,
        expected_assigned: planned.len(),
        mismatches,
    }
}
