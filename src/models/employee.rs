//! Employee model.
//!
//! Employees are configured by external CRUD flows and are read-only for the
//! duration of an allocation run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents an employee competing for an office seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The company the employee belongs to.
    pub company_id: String,
    /// Display name.
    pub name: String,
    /// Free-text role, matched case-insensitively against the priority table.
    pub designation: String,
    /// Commute distance in the company's distance unit.
    pub distance: Decimal,
}

impl Employee {
    /// Returns the designation normalised for table lookups.
    ///
    /// # Examples
    ///
    /// ```
    /// use seat_allocator::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     company_id: "acme".to_string(),
    ///     name: "Alice".to_string(),
    ///     designation: " Manager ".to_string(),
    ///     distance: Decimal::new(10, 0),
    /// };
    /// assert_eq!(employee.designation_key(), "manager");
    /// ```
    pub fn designation_key(&self) -> String {
        normalize_designation(&self.designation)
    }

    /// Checks the invariants the scorer relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.distance < Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                employee_id: self.id.clone(),
                field: "distance".to_string(),
                message: format!("must not be negative, got {}", self.distance),
            });
        }
        Ok(())
    }
}

/// Lower-cases and trims a designation string.
pub fn normalize_designation(designation: &str) -> String {
    designation.trim().to_lowercase()
}
