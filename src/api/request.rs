//! Request types for the allocation API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::response::ApiError;

/// Request body for `POST /allocations`.
///
/// `date` defaults to today (UTC) when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    /// The company whose roster is allocated.
    pub company_id: String,
    /// The branch whose seats are assigned.
    pub branch_id: String,
    /// The allocation date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl AllocationRequest {
    /// Rejects blank identifiers.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company_id.trim().is_empty() {
            return Err(ApiError::validation_error("companyId must not be empty"));
        }
        if self.branch_id.trim().is_empty() {
            return Err(ApiError::validation_error("branchId must not be empty"));
        }
        Ok(())
    }
}

/// Request body for `POST /allocations/scheduled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRunRequest {
    /// The allocation date; defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
