//! Persistence boundary for the allocation engine.
//!
//! The engine reads rosters, seat inventories, limits and WFH history
//! through [`AllocationStore`] and writes seat links and WFH records back
//! through it. Anything that can answer these calls (a database adapter, a
//! REST client, the bundled [`InMemoryStore`]) can drive the engine.

mod memory;
mod throttle;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Branch, Company, Employee, Seat, SeatMutation, WfhLimits, WfhRecord};

pub use memory::{InMemoryStore, StoreSnapshot};
pub use throttle::BatchWriter;

/// Outcome of a WFH record upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// A new record was stored.
    Inserted,
    /// A record for the same employee and date already existed.
    AlreadyPresent,
}

/// Error enumeration for persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Identifier looked up.
        id: String,
    },
    /// The backend could not be reached; the call may succeed if retried.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The backend refused a write.
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// Storage abstraction so the orchestrator can be exercised in isolation.
///
/// Reads must be side-effect free. `write_seat` overwrites the seat's
/// occupant. `upsert_wfh_record` must keep at most one record per
/// employee and date.
pub trait AllocationStore: Send + Sync {
    /// All companies, in id order.
    fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
    /// One company.
    fn company(&self, company_id: &str) -> Result<Company, StoreError>;
    /// Branches owned by a company, in id order.
    fn branches(&self, company_id: &str) -> Result<Vec<Branch>, StoreError>;
    /// One branch.
    fn branch(&self, branch_id: &str) -> Result<Branch, StoreError>;
    /// Seats configured for a branch.
    fn seats(&self, branch_id: &str) -> Result<Vec<Seat>, StoreError>;
    /// Employee roster of a company, in roster order.
    fn employees(&self, company_id: &str) -> Result<Vec<Employee>, StoreError>;
    /// Company-level WFH caps; empty when the company relies on global caps.
    fn wfh_limits(&self, company_id: &str) -> Result<WfhLimits, StoreError>;
    /// WFH records of a company dated within `[start, end]`.
    fn wfh_records(
        &self,
        company_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WfhRecord>, StoreError>;
    /// Sets or clears one seat's occupant.
    fn write_seat(&self, mutation: &SeatMutation) -> Result<(), StoreError>;
    /// Stores a WFH record unless one exists for the same employee and date.
    fn upsert_wfh_record(&self, record: &WfhRecord) -> Result<UpsertOutcome, StoreError>;
}
