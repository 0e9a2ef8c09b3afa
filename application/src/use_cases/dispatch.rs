//! Concurrent fan-out of one input to a set of engines.
//!
//! Every engine runs as its own task, raced against its own deadline.
//! Failures, panics and timeouts are contained per engine. The call
//! returns only after every task has settled (full barrier).

use crate::ports::engine::{EngineError, EvaluationContext};
use crate::ports::progress::{EngineOutcome, ProgressNotifier};
use crate::registry::RegisteredEngine;
use council_domain::Insight;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Result of one budgeted invocation
#[derive(Debug)]
pub(crate) enum Invocation {
    Succeeded(Insight),
    Failed(EngineError),
    Panicked,
    TimedOut(Duration),
}

/// Invoke one engine within its budget.
///
/// On timeout the invocation's cancellation token is cancelled and the
/// future dropped; the engine records the timeout in its own status.
/// An answer that arrives after the budget (an engine that blocked its
/// worker thread) is discarded and counted as a timeout as well.
pub(crate) async fn invoke_with_budget(
    engine: &RegisteredEngine,
    input: &str,
    context: &EvaluationContext,
    timeout: Duration,
) -> Invocation {
    let started = Instant::now();
    engine.begin();
    let evaluation = AssertUnwindSafe(engine.engine().evaluate(input, context)).catch_unwind();

    match tokio::time::timeout(timeout, evaluation).await {
        Ok(Ok(_)) if started.elapsed() > timeout => {
            debug!(
                engine = %engine.id(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Discarding answer that arrived past its budget"
            );
            timed_out(engine, context, timeout)
        }
        Ok(Ok(result)) => {
            engine.settle(&result);
            match result {
                Ok(insight) => Invocation::Succeeded(insight),
                Err(e) => Invocation::Failed(e),
            }
        }
        Ok(Err(_)) => {
            engine.record_failure("engine panicked");
            Invocation::Panicked
        }
        Err(_) => timed_out(engine, context, timeout),
    }
}

fn timed_out(
    engine: &RegisteredEngine,
    context: &EvaluationContext,
    timeout: Duration,
) -> Invocation {
    context.cancellation.cancel();
    engine.record_timeout(timeout);
    Invocation::TimedOut(timeout)
}

/// Why an engine contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Error,
    Panic,
    Timeout,
}

/// A contained per-engine failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFailure {
    pub engine_id: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Everything a dispatch produced, in selection order
#[derive(Debug, Default)]
pub(crate) struct DispatchOutcome {
    pub insights: Vec<Insight>,
    pub failures: Vec<EngineFailure>,
}

impl DispatchOutcome {
    pub fn count(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}

/// Dispatch `input` to every engine concurrently and wait for all of them.
pub(crate) async fn dispatch(
    engines: &[Arc<RegisteredEngine>],
    input: &str,
    context: &EvaluationContext,
    timeout: Duration,
    progress: &dyn ProgressNotifier,
) -> DispatchOutcome {
    progress.on_dispatch_start(engines.len());
    info!(
        engines = engines.len(),
        timeout_ms = timeout.as_millis() as u64,
        "Dispatching to engines"
    );

    let mut join_set = JoinSet::new();
    for (index, engine) in engines.iter().enumerate() {
        let engine = Arc::clone(engine);
        let input = input.to_string();
        let context = context.for_invocation(timeout);

        join_set.spawn(async move {
            let started = Instant::now();
            let invocation = invoke_with_budget(&engine, &input, &context, timeout).await;
            (index, invocation, started.elapsed())
        });
    }

    let mut slots: Vec<Option<Insight>> = vec![None; engines.len()];
    let mut failures: Vec<(usize, EngineFailure)> = Vec::new();

    while let Some(joined) = join_set.join_next().await {
        let (index, invocation, elapsed) = match joined {
            Ok(settled) => settled,
            Err(e) => {
                // Tasks are never aborted here, so this is unexpected
                warn!("Engine task join error: {}", e);
                continue;
            }
        };
        let engine_id = engines[index].id();
        let elapsed_ms = elapsed.as_millis() as u64;

        let outcome = match invocation {
            Invocation::Succeeded(insight) => {
                debug!(engine = %engine_id, elapsed_ms, confidence = %insight.confidence(), "Engine responded");
                let outcome = EngineOutcome::Succeeded {
                    confidence: insight.confidence().value(),
                };
                slots[index] = Some(insight);
                outcome
            }
            Invocation::Failed(e) => {
                warn!(engine = %engine_id, elapsed_ms, error = %e, "Engine failed");
                failures.push((index, failure(engine_id, FailureKind::Error, e.to_string())));
                EngineOutcome::Failed {
                    reason: e.to_string(),
                }
            }
            Invocation::Panicked => {
                warn!(engine = %engine_id, elapsed_ms, "Engine panicked");
                failures.push((index, failure(engine_id, FailureKind::Panic, "engine panicked")));
                EngineOutcome::Failed {
                    reason: "engine panicked".to_string(),
                }
            }
            Invocation::TimedOut(budget) => {
                let timeout_ms = budget.as_millis() as u64;
                warn!(engine = %engine_id, timeout_ms, "Engine timed out");
                failures.push((
                    index,
                    failure(
                        engine_id,
                        FailureKind::Timeout,
                        format!("timed out after {}ms", timeout_ms),
                    ),
                ));
                EngineOutcome::TimedOut { timeout_ms }
            }
        };
        progress.on_engine_complete(engine_id, &outcome);
    }

    progress.on_dispatch_complete();

    failures.sort_by_key(|(index, _)| *index);
    let outcome = DispatchOutcome {
        insights: slots.into_iter().flatten().collect(),
        failures: failures.into_iter().map(|(_, f)| f).collect(),
    };
    info!(
        succeeded = outcome.insights.len(),
        failed = outcome.failures.len(),
        "Dispatch complete"
    );
    outcome
}

fn failure(engine_id: &str, kind: FailureKind, message: impl Into<String>) -> EngineFailure {
    EngineFailure {
        engine_id: engine_id.to_string(),
        kind,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::engine::{Engine, InvocationMode};
    use crate::ports::functional_engine::{Evaluation, functional_engine};
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use council_domain::{EngineProfile, EngineStatus};
    use std::sync::Mutex;

    fn profile(id: &str) -> EngineProfile {
        EngineProfile::builder(id)
            .domain("test")
            .capability("answer")
            .build()
            .unwrap()
    }

    fn delayed(id: &str, delay_ms: u64, confidence: f64) -> Arc<RegisteredEngine> {
        let engine = functional_engine(profile(id), move |input, _ctx| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(Evaluation::new(input, confidence))
        });
        Arc::new(RegisteredEngine::new(engine))
    }

    fn failing(id: &str) -> Arc<RegisteredEngine> {
        let engine = functional_engine(profile(id), |_input, _ctx| async move {
            Err(EngineError::failed("refused"))
        });
        Arc::new(RegisteredEngine::new(engine))
    }

    struct Panicking {
        profile: EngineProfile,
    }

    #[async_trait]
    impl Engine for Panicking {
        fn profile(&self) -> &EngineProfile {
            &self.profile
        }

        async fn evaluate(
            &self,
            _input: &str,
            _context: &EvaluationContext,
        ) -> Result<Insight, EngineError> {
            panic!("engine bug");
        }
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for Recording {
        fn on_dispatch_start(&self, total_engines: usize) {
            self.events.lock().unwrap().push(format!("start:{}", total_engines));
        }
        fn on_engine_complete(&self, engine_id: &str, outcome: &EngineOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}", engine_id, outcome.is_success()));
        }
        fn on_dispatch_complete(&self) {
            self.events.lock().unwrap().push("complete".to_string());
        }
    }

    #[tokio::test]
    async fn test_preserves_selection_order() {
        let engines = vec![delayed("slow", 60, 0.3), delayed("fast", 1, 0.4)];
        let outcome = dispatch(
            &engines,
            "q",
            &EvaluationContext::new(InvocationMode::Consult),
            Duration::from_secs(2),
            &NoProgress,
        )
        .await;

        let ids: Vec<_> = outcome.insights.iter().map(|i| i.engine_id()).collect();
        assert_eq!(ids, vec!["slow", "fast"]);
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_contains_failures_and_timeouts() {
        let engines = vec![
            delayed("ok", 1, 0.3),
            failing("bad"),
            delayed("stuck", 10_000, 0.5),
            Arc::new(RegisteredEngine::new(Arc::new(Panicking {
                profile: profile("buggy"),
            }))),
        ];
        let progress = Recording::default();
        let outcome = dispatch(
            &engines,
            "q",
            &EvaluationContext::default(),
            Duration::from_millis(100),
            &progress,
        )
        .await;

        assert_eq!(outcome.insights.len(), 1);
        assert_eq!(outcome.insights[0].engine_id(), "ok");
        assert_eq!(outcome.count(FailureKind::Error), 1);
        assert_eq!(outcome.count(FailureKind::Timeout), 1);
        assert_eq!(outcome.count(FailureKind::Panic), 1);
        let failed: Vec<_> = outcome.failures.iter().map(|f| f.engine_id.as_str()).collect();
        assert_eq!(failed, vec!["bad", "stuck", "buggy"]);

        assert_eq!(engines[0].status(), EngineStatus::Idle);
        assert_eq!(engines[1].status(), EngineStatus::Error);
        assert_eq!(engines[2].status(), EngineStatus::Error);
        assert_eq!(engines[3].status(), EngineStatus::Error);

        let events = progress.events.lock().unwrap();
        assert_eq!(events.first().map(String::as_str), Some("start:4"));
        assert_eq!(events.last().map(String::as_str), Some("complete"));
        assert_eq!(events.len(), 6);
    }

    #[tokio::test]
    async fn test_timeout_cancels_invocation_token() {
        let observed = Arc::new(Mutex::new(None::<tokio_util::sync::CancellationToken>));
        let slot = Arc::clone(&observed);
        let engine = functional_engine(profile("watcher"), move |_input, ctx| {
            let slot = Arc::clone(&slot);
            async move {
                *slot.lock().unwrap() = Some(ctx.cancellation.clone());
                ctx.cancellation.cancelled().await;
                Err(EngineError::Cancelled)
            }
        });
        let engines = vec![Arc::new(RegisteredEngine::new(engine))];

        let outcome = dispatch(
            &engines,
            "q",
            &EvaluationContext::default(),
            Duration::from_millis(50),
            &NoProgress,
        )
        .await;

        assert_eq!(outcome.count(FailureKind::Timeout), 1);
        let token = observed.lock().unwrap().clone().unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_engine_past_budget_counts_as_timeout() {
        let blocking = functional_engine(profile("blocking"), |input, _ctx| async move {
            std::thread::sleep(Duration::from_millis(400));
            Ok(Evaluation::new(input, 0.6))
        });
        let engines = vec![
            delayed("quick", 1, 0.4),
            Arc::new(RegisteredEngine::new(blocking)),
        ];

        let outcome = dispatch(
            &engines,
            "q",
            &EvaluationContext::default(),
            Duration::from_millis(100),
            &NoProgress,
        )
        .await;

        let ids: Vec<_> = outcome.insights.iter().map(|i| i.engine_id()).collect();
        assert_eq!(ids, vec!["quick"]);
        assert_eq!(outcome.count(FailureKind::Timeout), 1);
        assert_eq!(outcome.failures[0].engine_id, "blocking");

        let stats = engines[1].stats();
        assert_eq!(engines[1].status(), EngineStatus::Error);
        assert_eq!(stats.invocations, 0);
        assert_eq!(stats.failures, 1);
        assert!(stats.last_insight.is_none());
    }

    #[tokio::test]
    async fn test_empty_dispatch() {
        let outcome = dispatch(
            &[],
            "q",
            &EvaluationContext::default(),
            Duration::from_millis(10),
            &NoProgress,
        )
        .await;
        assert!(outcome.insights.is_empty());
        assert!(outcome.failures.is_empty());
    }
}
