//! Company, branch and seat models.
//!
//! A seat belongs to exactly one branch and a branch belongs to exactly one
//! company. Seat occupancy is the only field the engine ever mutates.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tenant company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier for the company.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Branch used by scheduled runs when the company has several.
    #[serde(default)]
    pub default_branch_id: Option<String>,
    /// Per-company overrides of the designation priority table.
    #[serde(default)]
    pub designation_priorities: BTreeMap<String, Decimal>,
}

/// An office location owned by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique identifier for the branch.
    pub id: String,
    /// The owning company.
    pub company_id: String,
    /// Display name.
    pub name: String,
    /// Number of floors in the building.
    #[serde(default = "default_num_floors")]
    pub num_floors: u32,
    /// Optional cap on how many seats may be occupied at once.
    #[serde(default)]
    pub total_capacity: Option<i64>,
}

fn default_num_floors() -> u32 {
    1
}

/// A physical seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Unique identifier for the seat.
    pub id: String,
    /// The branch the seat is located in.
    pub branch_id: String,
    /// Floor number.
    pub floor_number: i32,
    /// Seat label, unique within a branch.
    pub seat_label: String,
    /// The employee currently sitting here, if any.
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl Seat {
    /// Returns true if an employee is linked to this seat.
    pub fn is_assigned(&self) -> bool {
        self.employee_id.is_some()
    }

    /// Stable seat ordering: floor ascending, then label, then id.
    ///
    /// The id comparison only matters for malformed inventories with
    /// duplicated labels.
    pub fn allocation_order(&self, other: &Seat) -> Ordering {
        self.floor_number
            .cmp(&other.floor_number)
            .then_with(|| self.seat_label.cmp(&other.seat_label))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// A request to change one seat's occupant. `None` clears the seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMutation {
    /// The seat to update.
    pub seat_id: String,
    /// The new occupant, or `None` to clear.
    pub employee_id: Option<String>,
}

impl SeatMutation {
    /// Creates a mutation that clears a seat.
    pub fn clear(seat_id: impl Into<String>) -> Self {
        Self {
            seat_id: seat_id.into(),
            employee_id: None,
        }
    }

    /// Creates a mutation that links an employee to a seat.
    pub fn assign(seat_id: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self {
            seat_id: seat_id.into(),
            employee_id: Some(employee_id.into()),
        }
    }
}
