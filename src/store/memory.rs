//! In-memory store backed by a JSON snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Branch, Company, Employee, Seat, SeatMutation, WfhLimits, WfhRecord};

use super::{AllocationStore, StoreError, UpsertOutcome};

/// Serialisable contents of an [`InMemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Companies.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Branches of all companies.
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Seats of all branches.
    #[serde(default)]
    pub seats: Vec<Seat>,
    /// Employees of all companies, in roster order.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Company-level WFH caps by company id.
    #[serde(default)]
    pub wfh_limits: BTreeMap<String, WfhLimits>,
    /// Stored WFH records.
    #[serde(default)]
    pub wfh_records: Vec<WfhRecord>,
}

impl StoreSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Writes the snapshot as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct State {
    companies: BTreeMap<String, Company>,
    branches: BTreeMap<String, Branch>,
    seats: BTreeMap<String, Seat>,
    employees: Vec<Employee>,
    wfh_limits: BTreeMap<String, WfhLimits>,
    wfh_records: BTreeSet<WfhRecord>,
}

/// Thread-safe store holding everything in memory.
///
/// # Example
///
/// ```
/// use seat_allocator::store::{AllocationStore, InMemoryStore, StoreSnapshot};
///
/// let store = InMemoryStore::from_snapshot(StoreSnapshot::default());
/// assert!(store.list_companies().unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the snapshot's data.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let state = State {
            companies: snapshot
                .companies
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            branches: snapshot
                .branches
                .into_iter()
                .map(|b| (b.id.clone(), b))
                .collect(),
            seats: snapshot
                .seats
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            employees: snapshot.employees,
            wfh_limits: snapshot
                .wfh_limits
                .into_iter()
                .map(|(company, limits)| (company, limits.normalized()))
                .collect(),
            wfh_records: snapshot.wfh_records.into_iter().collect(),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Dumps the current contents.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let state = self.lock()?;
        Ok(StoreSnapshot {
            companies: state.companies.values().cloned().collect(),
            branches: state.branches.values().cloned().collect(),
            seats: state.seats.values().cloned().collect(),
            employees: state.employees.clone(),
            wfh_limits: state.wfh_limits.clone(),
            wfh_records: state.wfh_records.iter().cloned().collect(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl AllocationStore for InMemoryStore {
    fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.lock()?.companies.values().cloned().collect())
    }

    fn company(&self, company_id: &str) -> Result<Company, StoreError> {
        self.lock()?
            .companies
            .get(company_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "company",
                id: company_id.to_string(),
            })
    }

    fn branches(&self, company_id: &str) -> Result<Vec<Branch>, StoreError> {
        Ok(self
            .lock()?
            .branches
            .values()
            .filter(|b| b.company_id == company_id)
            .cloned()
            .collect())
    }

    fn branch(&self, branch_id: &str) -> Result<Branch, StoreError> {
        self.lock()?
            .branches
            .get(branch_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "branch",
                id: branch_id.to_string(),
            })
    }

    fn seats(&self, branch_id: &str) -> Result<Vec<Seat>, StoreError> {
        Ok(self
            .lock()?
            .seats
            .values()
            .filter(|s| s.branch_id == branch_id)
            .cloned()
            .collect())
    }

    fn employees(&self, company_id: &str) -> Result<Vec<Employee>, StoreError> {
        Ok(self
            .lock()?
            .employees
            .iter()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect())
    }

    fn wfh_limits(&self, company_id: &str) -> Result<WfhLimits, StoreError> {
        Ok(self
            .lock()?
            .wfh_limits
            .get(company_id)
            .cloned()
            .unwrap_or_default())
    }

    fn wfh_records(
        &self,
        company_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WfhRecord>, StoreError> {
        Ok(self
            .lock()?
            .wfh_records
            .iter()
            .filter(|r| r.company_id == company_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }

    fn write_seat(&self, mutation: &SeatMutation) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let seat = state
            .seats
            .get_mut(&mutation.seat_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "seat",
                id: mutation.seat_id.clone(),
            })?;
        seat.employee_id = mutation.employee_id.clone();
        Ok(())
    }

    fn upsert_wfh_record(&self, record: &WfhRecord) -> Result<UpsertOutcome, StoreError> {
        let mut state = self.lock()?;
        let exists = state
            .wfh_records
            .iter()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date);
        if exists {
            return Ok(UpsertOutcome::AlreadyPresent);
        }
        state.wfh_records.insert(record.clone());
        Ok(UpsertOutcome::Inserted)
    }
}
