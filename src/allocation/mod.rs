//! Allocation engine.
//!
//! This module contains the allocation pipeline: priority scoring, roster
//! partitioning, seat assignment, the WFH ledger, post-run verification,
//! and the orchestrator and scheduler that drive them against a store.

mod orchestrator;
mod partition;
mod priority;
mod scheduler;
mod seat_assignment;
mod verification;
mod wfh_ledger;

pub use orchestrator::AllocationOrchestrator;
pub use partition::{Partition, RankedEmployee, partition};
pub use priority::score_employee;
pub use scheduler::{
    CompanyRunOutcome, RunStatus, ScheduledRunSummary, resolve_branch, run_scheduled,
};
pub use seat_assignment::{assign_seats, assignment_mutations, clear_mutations, order_seats};
pub use verification::{VerificationReport, verify_assignments};
pub use wfh_ledger::{CountingWindow, WfhLedger, month_start};
