//! Startup sequence: load the study table, normalize it, retry on failure.
//!
//! The coordinator never fails: after the retry budget is spent it resolves
//! to an empty collection so the application always reaches a defined state.
//! At most one run is in flight; concurrent callers share it.
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::modules::ingest::domain::StudySource;
use crate::modules::study::{Study, StudyNormalizer};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{RetryPolicy, TimedOperation};
use crate::{log_debug, log_error, log_info, log_warn};

/// Clonable handle to a bootstrap run
pub type BootstrapFuture = Shared<BoxFuture<'static, Vec<Study>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapPhase {
    Idle,
    Loading { attempt: u32 },
    Retrying { attempt: u32 },
    Succeeded { count: usize },
    FailedExhausted { attempts: u32 },
}

impl BootstrapPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BootstrapPhase::Succeeded { .. } | BootstrapPhase::FailedExhausted { .. }
        )
    }
}

pub struct BootstrapCoordinator {
    source: Arc<dyn StudySource>,
    policy: RetryPolicy,
    phase: Arc<Mutex<BootstrapPhase>>,
    attempts: Arc<AtomicU32>,
    in_flight: Mutex<Option<BootstrapFuture>>,
}

impl BootstrapCoordinator {
    pub fn new(source: Arc<dyn StudySource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            phase: Arc::new(Mutex::new(BootstrapPhase::Idle)),
            attempts: Arc::new(AtomicU32::new(0)),
            in_flight: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase.lock().clone()
    }

    /// Load attempts made by the current (or most recent) run
    pub fn attempts_made(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Start a run, or join the one already in flight.
    ///
    /// The run is registered when this method is called, not when the
    /// returned future is first polled, so two calls made back to back
    /// always share a single run. A finished run is never reused.
    pub fn bootstrap(&self) -> BootstrapFuture {
        let mut slot = self.in_flight.lock();

        if let Some(existing) = slot.as_ref() {
            if existing.peek().is_none() {
                log_debug!("Bootstrap already in flight, joining existing run");
                return existing.clone();
            }
        }

        let run = self.start_run().boxed().shared();
        *slot = Some(run.clone());
        run
    }

    fn start_run(&self) -> impl Future<Output = Vec<Study>> + Send + 'static {
        let source = self.source.clone();
        let policy = self.policy.clone();
        let phase = self.phase.clone();
        let attempts = self.attempts.clone();

        async move {
            let timer = TimedOperation::new("catalog bootstrap");
            let max_attempts = policy.max_attempts;
            attempts.store(0, Ordering::SeqCst);
            log_info!(
                "Bootstrapping catalog from {} (up to {} attempts)",
                source.describe(),
                max_attempts
            );

            let result = policy
                .run("catalog bootstrap", |attempt| {
                    let source = source.clone();
                    let phase = phase.clone();
                    let attempts = attempts.clone();

                    async move {
                        *phase.lock() = BootstrapPhase::Loading { attempt };
                        attempts.fetch_add(1, Ordering::SeqCst);

                        let outcome = load_and_normalize(source.as_ref()).await;

                        if let Err(error) = &outcome {
                            log_warn!(
                                "Bootstrap attempt {}/{} failed: {}",
                                attempt,
                                max_attempts,
                                error
                            );
                            if attempt < max_attempts && error.is_retryable() {
                                *phase.lock() = BootstrapPhase::Retrying { attempt };
                            }
                        }
                        outcome
                    }
                })
                .await;

            match result {
                Ok(studies) => {
                    *phase.lock() = BootstrapPhase::Succeeded {
                        count: studies.len(),
                    };
                    timer.finish_with_info(&format!("{} studies", studies.len()));
                    studies
                }
                Err(error) => {
                    let made = attempts.load(Ordering::SeqCst);
                    *phase.lock() = BootstrapPhase::FailedExhausted { attempts: made };
                    log_error!(
                        "Bootstrap gave up after {} attempt(s): {}; continuing with an empty catalog",
                        made,
                        error
                    );
                    timer.finish_with_info("failed");
                    Vec::new()
                }
            }
        }
    }
}

async fn load_and_normalize(source: &dyn StudySource) -> AppResult<Vec<Study>> {
    let records = source.load().await?;
    let studies = StudyNormalizer::normalize(&records);

    if studies.is_empty() {
        return Err(AppError::ParseError(format!(
            "{} contained no usable study records",
            source.describe()
        )));
    }
    Ok(studies)
}
