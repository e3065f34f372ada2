//! Allocation orchestrator.
//!
//! Drives one allocation run for one company and branch:
//!
//! 1. Load the roster, seats, WFH limits and this month's WFH records,
//!    retrying transient read failures with backoff.
//! 2. Score every employee, sort, partition by available seats and pair
//!    the office group with seats. Nothing is written until this succeeds.
//! 3. Clear the occupied seats of the branch, write the new assignments and
//!    record WFH days for the run date.
//! 4. Re-read the seats and compare them with the plan.
//! 5. Build the [`AllocationResult`].
//!
//! Write failures are collected rather than returned on first sight, and
//! surface together as [`EngineError::PartialWrite`]. Re-running the same
//! company, branch and date after any failure converges to the same state:
//! the scoring window ends the day before the run, every occupied seat is
//! cleared, and WFH records are upserted.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineConfig, ScoringPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationResult, AllocationWarning, Branch, Company, Employee, Seat, SeatAssignment,
    WfhAssignment, WfhLimits, WfhRecord, WfhUsage, group_by_floor,
};
use crate::store::{AllocationStore, BatchWriter, StoreError, UpsertOutcome};

use super::partition::{Partition, RankedEmployee, partition};
use super::priority::score_employee;
use super::seat_assignment::{assign_seats, assignment_mutations, clear_mutations};
use super::verification::verify_assignments;
use super::wfh_ledger::{CountingWindow, WfhLedger, month_start};

/// Everything read from the store for one run.
struct LoadedInputs {
    company: Company,
    branch: Branch,
    seats: Vec<Seat>,
    employees: Vec<Employee>,
    limits: WfhLimits,
    ledger: WfhLedger,
}

/// The computed outcome of a run, before anything is written.
struct Plan {
    split: Partition,
    assignments: Vec<SeatAssignment>,
    new_wfh_records: Vec<WfhRecord>,
}

#[derive(Default)]
struct WriteTally {
    seat_ok: usize,
    seat_failed: usize,
    wfh_ok: usize,
    wfh_failed: usize,
    wfh_already_present: usize,
    failures: Vec<String>,
}

impl WriteTally {
    fn into_error(self) -> Option<EngineError> {
        if self.failures.is_empty() {
            return None;
        }
        Some(EngineError::PartialWrite {
            seat_writes_succeeded: self.seat_ok,
            seat_writes_failed: self.seat_failed,
            wfh_writes_succeeded: self.wfh_ok,
            wfh_writes_failed: self.wfh_failed,
            failures: self.failures,
        })
    }
}

/// Runs allocations against a store.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct AllocationOrchestrator {
    store: Arc<dyn AllocationStore>,
    config: EngineConfig,
}

impl AllocationOrchestrator {
    /// Creates an orchestrator over `store` using `config`.
    pub fn new(store: Arc<dyn AllocationStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn AllocationStore> {
        &self.store
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Allocates seats of `branch_id` to the roster of `company_id` for `date`.
    ///
    /// This call blocks: it sleeps during read backoff and write pacing.
    /// Async callers should run it on the blocking pool.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the company or branch does not exist
    /// - `Configuration` if the branch has no seats, belongs to another
    ///   company, or a roster designation has no WFH limit
    /// - `InvalidEmployee` if an employee record is malformed
    /// - `DataUnavailable` if a read keeps failing after all retries
    /// - `PartialWrite` if some writes failed; the run may be repeated
    pub fn run_branch(
        &self,
        company_id: &str,
        branch_id: &str,
        date: NaiveDate,
    ) -> EngineResult<AllocationResult> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            run_id = %run_id,
            company_id,
            branch_id,
            %date,
            "Starting allocation run"
        );

        let mut inputs = self.load(company_id, branch_id, date)?;
        let plan = self.plan(&mut inputs, date)?;

        debug!(
            run_id = %run_id,
            office = plan.split.office.len(),
            wfh = plan.split.wfh.len(),
            seats = inputs.seats.len(),
            "Allocation planned"
        );

        let tally = self.write(&inputs, &plan);

        let mut warnings = Vec::new();
        match self.with_retry("reload seats", || self.store.seats(branch_id)) {
            Ok(stored) => {
                let report = verify_assignments(&plan.assignments, &stored);
                if let Some(warning) = report.to_warning() {
                    warn!(
                        run_id = %run_id,
                        assigned = report.assigned_seats,
                        expected = report.expected_assigned,
                        unassigned = report.unassigned_seats,
                        "Seat verification mismatch"
                    );
                    warnings.push(warning);
                }
            }
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "Seat verification skipped");
                warnings.push(AllocationWarning::new(
                    AllocationWarning::VERIFICATION_MISMATCH,
                    format!("could not re-read seats after writing: {}", err),
                    "high",
                ));
            }
        }

        if let Some(err) = tally.into_error() {
            warn!(
                run_id = %run_id,
                company_id,
                branch_id,
                error = %err,
                "Allocation run finished with write failures"
            );
            return Err(err);
        }

        let result = self.report(run_id, &inputs, plan, date, warnings);

        info!(
            run_id = %run_id,
            company_id,
            branch_id,
            seated = result.assignments.len(),
            wfh = result.wfh_employees.len(),
            warnings = result.warnings.len(),
            duration_us = started.elapsed().as_micros(),
            "Allocation run completed"
        );

        Ok(result)
    }

    fn load(&self, company_id: &str, branch_id: &str, date: NaiveDate) -> EngineResult<LoadedInputs> {
        let company = self.with_retry("load company", || self.store.company(company_id))?;
        let branch = self.with_retry("load branch", || self.store.branch(branch_id))?;
        if branch.company_id != company.id {
            return Err(EngineError::configuration(format!(
                "branch '{}' belongs to company '{}', not '{}'",
                branch.id, branch.company_id, company.id
            )));
        }

        let seats = self.with_retry("load seats", || self.store.seats(branch_id))?;
        if seats.is_empty() {
            return Err(EngineError::configuration(format!(
                "branch '{}' has no seats configured; add seats before allocating",
                branch.id
            )));
        }

        let employees = self.with_retry("load employees", || self.store.employees(company_id))?;
        let company_limits =
            self.with_retry("load wfh limits", || self.store.wfh_limits(company_id))?;
        let limits = self
            .config
            .wfh_limits()
            .merged_with(&company_limits.normalized());
        limits.validate()?;

        // The run date itself is loaded too so a retried run sees what it
        // already recorded and does not write it again.
        let records = self.with_retry("load wfh records", || {
            self.store.wfh_records(company_id, month_start(date), date)
        })?;

        Ok(LoadedInputs {
            company,
            branch,
            seats,
            employees,
            limits,
            ledger: WfhLedger::from_records(records),
        })
    }

    fn plan(&self, inputs: &mut LoadedInputs, date: NaiveDate) -> EngineResult<Plan> {
        let policy: ScoringPolicy = self
            .config
            .scoring()
            .with_overrides(&inputs.company.designation_priorities);
        policy.validate()?;

        let window = CountingWindow::before_run(date);
        let mut roster = Vec::with_capacity(inputs.employees.len());
        for employee in &inputs.employees {
            let limit = wfh_limit_for(&inputs.limits, employee)?;
            let count = inputs.ledger.count_in(&employee.id, window);
            let score = score_employee(employee, count, limit, &policy)?;
            roster.push(RankedEmployee {
                employee: employee.clone(),
                score,
            });
        }

        let split = partition(roster, available_seats(&inputs.branch, &inputs.seats))?;
        let assignments = assign_seats(&split.office, &inputs.seats)?;
        let new_wfh_records = inputs.ledger.record_wfh(
            split.wfh.iter().map(|r| r.employee.id.as_str()),
            date,
            &inputs.company.id,
        );

        Ok(Plan {
            split,
            assignments,
            new_wfh_records,
        })
    }

    fn write(&self, inputs: &LoadedInputs, plan: &Plan) -> WriteTally {
        let mut writer = BatchWriter::new(
            self.store.as_ref(),
            self.config.runtime().throttle.clone(),
        );
        let mut tally = WriteTally::default();

        let seat_writes = clear_mutations(&inputs.seats)
            .into_iter()
            .chain(assignment_mutations(&plan.assignments));
        for mutation in seat_writes {
            match writer.write_seat(&mutation) {
                Ok(()) => tally.seat_ok += 1,
                Err(err) => {
                    tally.seat_failed += 1;
                    tally.failures.push(format!("seat '{}': {}", mutation.seat_id, err));
                }
            }
        }

        for record in &plan.new_wfh_records {
            match writer.upsert_wfh_record(record) {
                Ok(UpsertOutcome::Inserted) => tally.wfh_ok += 1,
                Ok(UpsertOutcome::AlreadyPresent) => {
                    tally.wfh_ok += 1;
                    tally.wfh_already_present += 1;
                }
                Err(err) => {
                    tally.wfh_failed += 1;
                    tally.failures.push(format!(
                        "wfh record '{}' on {}: {}",
                        record.employee_id, record.date, err
                    ));
                }
            }
        }

        debug!(
            writes = writer.writes(),
            seat_failed = tally.seat_failed,
            wfh_failed = tally.wfh_failed,
            wfh_already_present = tally.wfh_already_present,
            "Writes applied"
        );
        tally
    }

    fn report(
        &self,
        run_id: Uuid,
        inputs: &LoadedInputs,
        plan: Plan,
        date: NaiveDate,
        mut warnings: Vec<AllocationWarning>,
    ) -> AllocationResult {
        let month = CountingWindow::month_to_date(date);
        let mut wfh_usage = Vec::with_capacity(inputs.employees.len());
        for employee in &inputs.employees {
            let used = inputs.ledger.count_in(&employee.id, month);
            let limit = inputs.limits.get(&employee.designation).unwrap_or_default();
            if used > limit {
                warnings.push(AllocationWarning::new(
                    AllocationWarning::WFH_LIMIT_EXCEEDED,
                    format!(
                        "employee '{}' has used {} WFH day(s) this month, limit is {}",
                        employee.id, used, limit
                    ),
                    "medium",
                ));
            }
            wfh_usage.push(WfhUsage {
                employee_id: employee.id.clone(),
                used,
                limit,
                remaining: i64::from(limit) - i64::from(used),
            });
        }

        let priorities = plan
            .split
            .office
            .iter()
            .chain(plan.split.wfh.iter())
            .map(|r| r.score.clone())
            .collect();
        let wfh_employees = plan
            .split
            .wfh
            .iter()
            .map(|r| WfhAssignment {
                employee_id: r.employee.id.clone(),
                employee_name: r.employee.name.clone(),
            })
            .collect();

        AllocationResult {
            run_id,
            date,
            company_id: inputs.company.id.clone(),
            branch_id: inputs.branch.id.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            seating_by_floor: group_by_floor(&plan.assignments),
            assignments: plan.assignments,
            wfh_employees,
            wfh_usage,
            priorities,
            warnings,
        }
    }

    /// Runs a read, retrying `Unavailable` failures with backoff.
    pub(crate) fn with_retry<T, F>(&self, operation: &str, read: F) -> EngineResult<T>
    where
        F: Fn() -> Result<T, StoreError>,
    {
        let retry = &self.config.runtime().retry;
        let max_attempts = retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match read() {
                Ok(value) => return Ok(value),
                Err(StoreError::Unavailable(message)) if attempt < max_attempts => {
                    let delay = retry.backoff(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %message,
                        "Read failed, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(StoreError::Unavailable(message)) => {
                    return Err(EngineError::DataUnavailable {
                        operation: operation.to_string(),
                        attempts: attempt,
                        message,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
    }
}

fn wfh_limit_for(limits: &WfhLimits, employee: &Employee) -> EngineResult<u32> {
    limits.get(&employee.designation).ok_or_else(|| {
        EngineError::configuration(format!(
            "no WFH limit configured for designation '{}' (employee '{}')",
            employee.designation, employee.id
        ))
    })
}

/// Configured seats, capped by the branch's capacity when it has one.
fn available_seats(branch: &Branch, seats: &[Seat]) -> i64 {
    let configured = i64::try_from(seats.len()).unwrap_or(i64::MAX);
    match branch.total_capacity {
        Some(capacity) => configured.min(capacity),
        None => configured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RetryPolicy, RuntimeConfig, ThrottlePolicy};
    use crate::models::SeatMutation;
    use crate::store::{InMemoryStore, StoreSnapshot};
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn employee(id: &str, designation: &str, distance: &str) -> Employee {
        Employee {
            id: id.to_string(),
            company_id: "acme".to_string(),
            name: format!("Employee {}", id.to_uppercase()),
            designation: designation.to_string(),
            distance: dec(distance),
        }
    }

    fn seat(id: &str, floor: i32, label: &str) -> Seat {
        Seat {
            id: id.to_string(),
            branch_id: "hq".to_string(),
            floor_number: floor,
            seat_label: label.to_string(),
            employee_id: None,
        }
    }

    fn wfh(employee_id: &str, d: NaiveDate) -> WfhRecord {
        WfhRecord {
            employee_id: employee_id.to_string(),
            date: d,
            company_id: "acme".to_string(),
        }
    }

    fn snapshot(seats: Vec<Seat>, employees: Vec<Employee>) -> StoreSnapshot {
        StoreSnapshot {
            companies: vec![Company {
                id: "acme".to_string(),
                name: "Acme".to_string(),
                default_branch_id: None,
                designation_priorities: BTreeMap::new(),
            }],
            branches: vec![Branch {
                id: "hq".to_string(),
                company_id: "acme".to_string(),
                name: "HQ".to_string(),
                num_floors: 2,
                total_capacity: None,
            }],
            seats,
            employees,
            wfh_limits: BTreeMap::new(),
            wfh_records: vec![],
        }
    }

    fn fast_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        *config.runtime_mut() = RuntimeConfig {
            retry: RetryPolicy::immediate(3),
            throttle: ThrottlePolicy::disabled(),
            ..RuntimeConfig::default()
        };
        config
    }

    fn orchestrator(snapshot: StoreSnapshot) -> (Arc<InMemoryStore>, AllocationOrchestrator) {
        let store = Arc::new(InMemoryStore::from_snapshot(snapshot));
        let orchestrator = AllocationOrchestrator::new(store.clone(), fast_config());
        (store, orchestrator)
    }

    #[test]
    fn test_manager_beats_junior_for_single_seat() {
        let mut data = snapshot(
            vec![seat("s1", 1, "101")],
            vec![employee("b", "junior", "18"), employee("a", "manager", "5")],
        );
        data.wfh_records = vec![wfh("b", date(2)), wfh("b", date(3))];
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        assert!(result.is_seated("a"));
        assert!(result.is_wfh("b"));
        assert_eq!(result.priorities[0].total, dec("13.5"));
        assert_eq!(result.priorities[1].total, dec("6.55"));
        assert_eq!(result.priorities[1].wfh_count, 2);
    }

    #[test]
    fn test_run_writes_seats_and_records() {
        let data = snapshot(
            vec![seat("s2", 1, "102"), seat("s1", 1, "101")],
            vec![
                employee("a", "manager", "5"),
                employee("b", "senior", "10"),
                employee("c", "junior", "2"),
            ],
        );
        let (store, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        let seats = store.seats("hq").unwrap();
        let s1 = seats.iter().find(|s| s.id == "s1").unwrap();
        assert_eq!(s1.employee_id.as_deref(), Some("a"));
        assert_eq!(result.assignments[0].seat_label, "101");
        assert_eq!(result.wfh_employees.len(), 1);
        assert_eq!(store.wfh_records("acme", date(10), date(10)).unwrap(), vec![wfh("c", date(10))]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_stale_assignments_are_cleared() {
        let mut seats = vec![seat("s1", 1, "101"), seat("s2", 1, "102")];
        seats[1].employee_id = Some("gone".to_string());
        let data = snapshot(seats, vec![employee("a", "manager", "5")]);
        let (store, orchestrator) = orchestrator(data);

        orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        let occupied: Vec<_> = store
            .seats("hq")
            .unwrap()
            .into_iter()
            .filter_map(|s| s.employee_id)
            .collect();
        assert_eq!(occupied, vec!["a".to_string()]);
    }

    #[test]
    fn test_capacity_caps_available_seats() {
        let mut data = snapshot(
            vec![seat("s1", 1, "101"), seat("s2", 1, "102")],
            vec![employee("a", "manager", "5"), employee("b", "senior", "5")],
        );
        data.branches[0].total_capacity = Some(1);
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.wfh_employees.len(), 1);
    }

    #[test]
    fn test_zero_capacity_sends_everyone_home() {
        let mut data = snapshot(
            vec![seat("s1", 1, "101")],
            vec![
                employee("a", "manager", "5"),
                employee("b", "senior", "5"),
                employee("c", "junior", "5"),
            ],
        );
        data.branches[0].total_capacity = Some(0);
        let (store, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.wfh_employees.len(), 3);
        assert_eq!(store.wfh_records("acme", date(10), date(10)).unwrap().len(), 3);
    }

    #[test]
    fn test_negative_capacity_is_configuration_error() {
        let mut data = snapshot(vec![seat("s1", 1, "101")], vec![employee("a", "manager", "5")]);
        data.branches[0].total_capacity = Some(-1);
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10));
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_branch_without_seats_is_rejected_before_writes() {
        let mut data = snapshot(vec![], vec![employee("a", "manager", "5")]);
        data.branches[0].total_capacity = Some(10);
        let (store, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10));

        assert!(matches!(result, Err(EngineError::Configuration { .. })));
        assert!(store.wfh_records("acme", date(1), date(31)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_wfh_limit_is_rejected_before_writes() {
        let mut seats = vec![seat("s1", 1, "101")];
        seats[0].employee_id = Some("old".to_string());
        let data = snapshot(seats, vec![employee("a", "contractor", "5")]);
        let (store, orchestrator) = orchestrator(data);

        let err = orchestrator.run_branch("acme", "hq", date(10)).unwrap_err();

        assert!(err.to_string().contains("contractor"));
        assert_eq!(store.seats("hq").unwrap()[0].employee_id.as_deref(), Some("old"));
    }

    #[test]
    fn test_company_limits_override_global_limits() {
        let mut data = snapshot(vec![seat("s1", 1, "101")], vec![employee("a", "contractor", "5")]);
        data.wfh_limits
            .insert("acme".to_string(), WfhLimits::from_iter([("Contractor", 2)]));
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();
        assert_eq!(result.priorities[0].wfh_limit, 2);
    }

    #[test]
    fn test_branch_of_other_company_is_rejected() {
        let mut data = snapshot(vec![seat("s1", 1, "101")], vec![]);
        data.branches[0].company_id = "globex".to_string();
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10));
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_unknown_company_is_not_found() {
        let (_, orchestrator) = orchestrator(snapshot(vec![seat("s1", 1, "101")], vec![]));
        let result = orchestrator.run_branch("nobody", "hq", date(10));
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn test_rerun_on_same_date_converges() {
        let data = snapshot(
            vec![seat("s1", 1, "101")],
            vec![employee("a", "manager", "5"), employee("b", "junior", "18")],
        );
        let (store, orchestrator) = orchestrator(data);

        let first = orchestrator.run_branch("acme", "hq", date(10)).unwrap();
        let second = orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.priorities, second.priorities);
        assert_eq!(store.wfh_records("acme", date(1), date(31)).unwrap().len(), 1);
    }

    #[test]
    fn test_wfh_usage_includes_run_date() {
        let mut data = snapshot(
            vec![seat("s1", 1, "101")],
            vec![employee("a", "manager", "5"), employee("b", "junior", "18")],
        );
        data.wfh_records = vec![wfh("b", date(2))];
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();
        let usage = result.wfh_usage.iter().find(|u| u.employee_id == "b").unwrap();
        assert_eq!(usage.used, 2);
        assert_eq!(usage.limit, 8);
        assert_eq!(usage.remaining, 6);
    }

    #[test]
    fn test_exceeding_limit_adds_warning() {
        let mut data = snapshot(
            vec![seat("s1", 1, "101")],
            vec![employee("a", "manager", "5"), employee("b", "manager", "1")],
        );
        data.wfh_records = (1..=4).map(|d| wfh("b", date(d))).collect();
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();

        assert!(result.is_wfh("b"));
        assert!(result.has_warning(AllocationWarning::WFH_LIMIT_EXCEEDED));
    }

    #[test]
    fn test_seating_grouped_by_floor() {
        let data = snapshot(
            vec![seat("s3", 2, "201"), seat("s1", 1, "101"), seat("s2", 1, "102")],
            vec![
                employee("a", "manager", "5"),
                employee("b", "senior", "5"),
                employee("c", "junior", "5"),
            ],
        );
        let (_, orchestrator) = orchestrator(data);

        let result = orchestrator.run_branch("acme", "hq", date(10)).unwrap();
        assert_eq!(result.seating_by_floor.len(), 2);
        assert_eq!(result.seating_by_floor[1].assignments[0].employee_id, "c");
    }

    /// Store whose reads fail a fixed number of times before succeeding.
    struct FlakyReads {
        inner: InMemoryStore,
        failures_left: AtomicU32,
    }

    impl FlakyReads {
        fn fail(&self) -> Result<(), StoreError> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(StoreError::Unavailable("timeout".to_string()));
            }
            Ok(())
        }
    }

    impl AllocationStore for FlakyReads {
        fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
            self.inner.list_companies()
        }
        fn company(&self, company_id: &str) -> Result<Company, StoreError> {
            self.fail()?;
            self.inner.company(company_id)
        }
        fn branches(&self, company_id: &str) -> Result<Vec<Branch>, StoreError> {
            self.inner.branches(company_id)
        }
        fn branch(&self, branch_id: &str) -> Result<Branch, StoreError> {
            self.inner.branch(branch_id)
        }
        fn seats(&self, branch_id: &str) -> Result<Vec<Seat>, StoreError> {
            self.inner.seats(branch_id)
        }
        fn employees(&self, company_id: &str) -> Result<Vec<Employee>, StoreError> {
            self.inner.employees(company_id)
        }
        fn wfh_limits(&self, company_id: &str) -> Result<WfhLimits, StoreError> {
            self.inner.wfh_limits(company_id)
        }
        fn wfh_records(
            &self,
            company_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<WfhRecord>, StoreError> {
            self.inner.wfh_records(company_id, start, end)
        }
        fn write_seat(&self, mutation: &SeatMutation) -> Result<(), StoreError> {
            self.inner.write_seat(mutation)
        }
        fn upsert_wfh_record(&self, record: &WfhRecord) -> Result<UpsertOutcome, StoreError> {
            self.inner.upsert_wfh_record(record)
        }
    }

    fn flaky(failures: u32) -> AllocationOrchestrator {
        let store = FlakyReads {
            inner: InMemoryStore::from_snapshot(snapshot(
                vec![seat("s1", 1, "101")],
                vec![employee("a", "manager", "5")],
            )),
            failures_left: AtomicU32::new(failures),
        };
        AllocationOrchestrator::new(Arc::new(store), fast_config())
    }

    #[test]
    fn test_transient_read_failure_is_retried() {
        let result = flaky(2).run_branch("acme", "hq", date(10)).unwrap();
        assert!(result.is_seated("a"));
    }

    #[test]
    fn test_persistent_read_failure_is_data_unavailable() {
        let err = flaky(5).run_branch("acme", "hq", date(10)).unwrap_err();
        match err {
            EngineError::DataUnavailable {
                operation, attempts, ..
            } => {
                assert_eq!(operation, "load company");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_available_seats_helper() {
        let mut branch = snapshot(vec![], vec![]).branches.remove(0);
        let seats = vec![seat("s1", 1, "1"), seat("s2", 1, "2")];
        assert_eq!(available_seats(&branch, &seats), 2);
        branch.total_capacity = Some(10);
        assert_eq!(available_seats(&branch, &seats), 2);
        branch.total_capacity = Some(1);
        assert_eq!(available_seats(&branch, &seats), 1);
    }
}
