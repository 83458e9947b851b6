//! Fan-out orchestration — scores one candidate against many vacancies with
//! bounded concurrency, per-task timeouts, and partial-failure tolerance.
//!
//! A timed-out task is abandoned, not interrupted: the permit is released
//! when the task future is dropped, but an augmentation HTTP call already in
//! flight only stops at its next await point. The batch ceiling aborts
//! whatever is still outstanding; those pairs are silently absent from the
//! result set.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::matching::assessor::{CompatibilityAssessment, CompatibilityAssessor};
use crate::models::profile::{CandidateProfile, VacancyProfile};

/// Worker-pool ceiling; the effective size is capped by available parallelism.
const MAX_WORKERS: usize = 5;
/// Per-pair scoring timeout.
const TASK_TIMEOUT: Duration = Duration::from_secs(30);
/// Whole-batch ceiling, after which outstanding tasks are aborted.
const BATCH_TIMEOUT: Duration = Duration::from_secs(60);

pub struct FanOutOrchestrator {
    assessor: Arc<CompatibilityAssessor>,
}

impl FanOutOrchestrator {
    pub fn new(assessor: Arc<CompatibilityAssessor>) -> Self {
        Self { assessor }
    }

    /// Scores `candidate` against up to `limit` vacancies concurrently and
    /// returns the collected assessments sorted descending by percentage.
    ///
    /// Pairs that time out or panic are dropped from the result set; the
    /// batch itself never fails.
    pub async fn score_against_many(
        &self,
        candidate: CandidateProfile,
        mut vacancies: Vec<VacancyProfile>,
        limit: usize,
    ) -> Vec<CompatibilityAssessment> {
        if vacancies.is_empty() {
            return Vec::new();
        }
        // First `limit` entries in the order given; no reordering beforehand.
        vacancies.truncate(limit);

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_WORKERS);
        info!(
            "scoring candidate {} against {} vacancies with {} workers",
            candidate.id,
            vacancies.len(),
            workers
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let results: Arc<Mutex<Vec<CompatibilityAssessment>>> =
            Arc::new(Mutex::new(Vec::with_capacity(vacancies.len())));
        let candidate = Arc::new(candidate);

        let mut tasks = JoinSet::new();
        for vacancy in vacancies {
            let assessor = Arc::clone(&self.assessor);
            let candidate = Arc::clone(&candidate);
            let semaphore = Arc::clone(&semaphore);
            let results = Arc::clone(&results);

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };
                let vacancy_id = vacancy.id;
                match tokio::time::timeout(
                    TASK_TIMEOUT,
                    assessor.assess(&candidate, &vacancy),
                )
                .await
                {
                    Ok(assessment) => results.lock().await.push(assessment),
                    Err(_) => warn!(
                        "scoring timed out after {}s for vacancy {vacancy_id}; dropping pair",
                        TASK_TIMEOUT.as_secs()
                    ),
                }
            });
        }

        let drain = async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    // Panicked or aborted task: the pair is simply absent.
                    warn!("scoring task failed: {e}");
                }
            }
        };
        if tokio::time::timeout(BATCH_TIMEOUT, drain).await.is_err() {
            warn!(
                "batch ceiling of {}s reached; aborting outstanding scoring tasks",
                BATCH_TIMEOUT.as_secs()
            );
            tasks.abort_all();
        }

        let mut collected = std::mem::take(&mut *results.lock().await);
        collected.sort_by(|a, b| b.percentage.cmp(&a.percentage));
        collected
    }
}
