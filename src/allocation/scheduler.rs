//! Scheduled allocation across all companies.
//!
//! Companies share no state, so they run concurrently on the blocking pool,
//! bounded by `max_concurrent_companies`. A failing company is logged and
//! recorded; the others carry on.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationResult, Company};

use super::orchestrator::AllocationOrchestrator;

/// Status of one company's run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// The run finished and wrote everything.
    Completed {
        /// The run report.
        result: Box<AllocationResult>,
    },
    /// The run stopped with an error.
    Failed {
        /// Machine code of the error.
        code: String,
        /// Error message.
        error: String,
        /// Whether re-running is expected to help.
        retryable: bool,
    },
}

/// Outcome of one company's run in a scheduled pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRunOutcome {
    /// The company.
    pub company_id: String,
    /// The branch that was allocated, when one could be resolved.
    pub branch_id: Option<String>,
    /// What happened.
    #[serde(flatten)]
    pub status: RunStatus,
}

impl CompanyRunOutcome {
    fn failed(company_id: String, branch_id: Option<String>, err: &EngineError) -> Self {
        Self {
            company_id,
            branch_id,
            status: RunStatus::Failed {
                code: err.code().to_string(),
                error: err.to_string(),
                retryable: err.is_retryable(),
            },
        }
    }

    /// Returns true if the run completed.
    pub fn is_completed(&self) -> bool {
        matches!(self.status, RunStatus::Completed { .. })
    }
}

/// Result of a scheduled pass over all companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRunSummary {
    /// The allocation date.
    pub date: NaiveDate,
    /// One outcome per company, ordered by company id.
    pub outcomes: Vec<CompanyRunOutcome>,
}

impl ScheduledRunSummary {
    /// Number of companies whose run completed.
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    /// Number of companies whose run failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }

    /// Looks up the outcome for a company.
    pub fn outcome(&self, company_id: &str) -> Option<&CompanyRunOutcome> {
        self.outcomes.iter().find(|o| o.company_id == company_id)
    }
}

/// Picks the branch a scheduled run allocates for `company`.
///
/// The company's `default_branch_id` wins. Otherwise the company must have
/// exactly one branch with seats.
pub fn resolve_branch(orchestrator: &AllocationOrchestrator, company: &Company) -> EngineResult<String> {
    if let Some(branch_id) = &company.default_branch_id {
        return Ok(branch_id.clone());
    }

    let store = orchestrator.store();
    let branches = orchestrator.with_retry("list branches", || store.branches(&company.id))?;

    let mut seated = Vec::new();
    for branch in branches {
        let seats = orchestrator.with_retry("load seats", || store.seats(&branch.id))?;
        if !seats.is_empty() {
            seated.push(branch.id);
        }
    }

    match seated.len() {
        1 => Ok(seated.remove(0)),
        0 => Err(EngineError::configuration(format!(
            "company '{}' has no branch with seats configured",
            company.id
        ))),
        n => Err(EngineError::configuration(format!(
            "company '{}' has {} branches with seats; set default_branch_id to choose one",
            company.id, n
        ))),
    }
}

fn run_company(orchestrator: &AllocationOrchestrator, company: &Company, date: NaiveDate) -> CompanyRunOutcome {
    let branch_id = match resolve_branch(orchestrator, company) {
        Ok(branch_id) => branch_id,
        Err(err) => {
            warn!(company_id = %company.id, error = %err, "Could not resolve branch");
            return CompanyRunOutcome::failed(company.id.clone(), None, &err);
        }
    };

    match orchestrator.run_branch(&company.id, &branch_id, date) {
        Ok(result) => CompanyRunOutcome {
            company_id: company.id.clone(),
            branch_id: Some(branch_id),
            status: RunStatus::Completed {
                result: Box::new(result),
            },
        },
        Err(err) => {
            warn!(
                company_id = %company.id,
                branch_id = %branch_id,
                code = err.code(),
                error = %err,
                "Company allocation failed"
            );
            CompanyRunOutcome::failed(company.id.clone(), Some(branch_id), &err)
        }
    }
}

/// Allocates every company for `date`.
///
/// # Errors
///
/// Fails only if the company list cannot be read. Failures of individual
/// companies are reported in the summary.
pub async fn run_scheduled(
    orchestrator: AllocationOrchestrator,
    date: NaiveDate,
) -> EngineResult<ScheduledRunSummary> {
    let lister = orchestrator.clone();
    let companies = tokio::task::spawn_blocking(move || {
        lister.with_retry("list companies", || lister.store().list_companies())
    })
    .await
    .map_err(|err| EngineError::DataUnavailable {
        operation: "list companies".to_string(),
        attempts: 1,
        message: err.to_string(),
    })??;

    let limit = orchestrator
        .config()
        .runtime()
        .scheduler
        .max_concurrent_companies
        .max(1);
    info!(companies = companies.len(), concurrency = limit, %date, "Starting scheduled run");

    let semaphore = Arc::new(Semaphore::new(limit));
    let mut tasks = JoinSet::new();
    for company in companies {
        let semaphore = semaphore.clone();
        let orchestrator = orchestrator.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let company_id = company.id.clone();
            let run = tokio::task::spawn_blocking(move || run_company(&orchestrator, &company, date));
            match run.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(company_id = %company_id, error = %err, "Company allocation task aborted");
                    let err = EngineError::DataUnavailable {
                        operation: "allocation task".to_string(),
                        attempts: 1,
                        message: err.to_string(),
                    };
                    CompanyRunOutcome::failed(company_id, None, &err)
                }
            }
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => error!(error = %err, "Scheduled task join failed"),
        }
    }
    outcomes.sort_by(|a, b| a.company_id.cmp(&b.company_id));

    let summary = ScheduledRunSummary { date, outcomes };
    info!(
        completed = summary.completed(),
        failed = summary.failed(),
        %date,
        "Scheduled run finished"
    );
    Ok(summary)
}
