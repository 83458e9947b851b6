use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::assessor::CompatibilityAssessor;
use crate::matching::fanout::FanOutOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Single-pair assessor. Holds the augmentation client and jitter source;
    /// both are injected at startup so tests can swap them.
    pub assessor: Arc<CompatibilityAssessor>,
    /// Bounded-concurrency batch scorer built over the same assessor.
    pub orchestrator: Arc<FanOutOrchestrator>,
    pub config: Config,
}
