//! Integration tests for the deadline runner.
//!
//! Uses `start_paused` so tokio auto-advances the clock whenever every
//! task is idle; sleeps and deadlines resolve instantly and exactly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use firewall_tick::{DeadlineRunner, DecisionError, TickConfig, run_until};
use tokio::time::{self, Instant};

// =========================================================================
// Helpers
// =========================================================================

fn runner() -> DeadlineRunner {
    DeadlineRunner::new(TickConfig::default())
}

/// Sets its flag when dropped, i.e. when the future owning it is torn down.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

// =========================================================================
// Completion
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_decision_within_budget_returns_value() {
    let mut runner = runner();

    let result = runner
        .run(|_ctx| async {
            time::sleep(Duration::from_millis(100)).await;
            42
        })
        .await;

    assert_eq!(result, Ok(42));
    let metrics = runner.metrics();
    assert_eq!(metrics.total_decisions, 1);
    assert_eq!(metrics.completed, 1);
    assert_eq!(metrics.timeouts, 0);
    assert_eq!(metrics.max_decision_time, Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_context_carries_tick_and_deadline() {
    let mut runner = runner();

    let first = runner.run(|ctx| async move { (ctx.tick(), ctx.remaining()) }).await;
    let second = runner.run(|ctx| async move { ctx.tick() }).await;

    assert_eq!(first, Ok((1, Duration::from_millis(450))));
    assert_eq!(second, Ok(2));
    assert_eq!(runner.decision_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cooperative_agent_stops_at_deadline() {
    let mut runner = DeadlineRunner::new(TickConfig::with_budget(Duration::from_millis(100)));

    // Refines an answer until the context says time is nearly up.
    let result = runner
        .run(|ctx| async move {
            let mut iterations = 0;
            while ctx.remaining() > Duration::from_millis(20) {
                time::sleep(Duration::from_millis(10)).await;
                iterations += 1;
            }
            iterations
        })
        .await;

    assert_eq!(result, Ok(8));
    assert!(runner.metrics().budget_utilization > 0.75);
}

// =========================================================================
// Overrun
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_overrun_times_out_and_drops_the_decision() {
    let mut runner = runner();
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = DropFlag(dropped.clone());

    let start = Instant::now();
    let result: Result<(), _> = runner
        .run(move |_ctx| async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        })
        .await;

    assert_eq!(
        result,
        Err(DecisionError::TimedOut {
            budget: Duration::from_millis(450)
        })
    );
    assert_eq!(start.elapsed(), Duration::from_millis(450));
    assert!(dropped.load(Ordering::SeqCst), "cancelled decision must be dropped before returning");
    assert_eq!(runner.metrics().timeouts, 1);
    assert_eq!(runner.metrics().completed, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_decision_never_completes_later() {
    let mut runner = runner();
    let finished = Arc::new(AtomicU32::new(0));

    let counter = finished.clone();
    let result = runner
        .run(move |_ctx| async move {
            time::sleep(Duration::from_millis(600)).await;
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    assert!(matches!(result, Err(DecisionError::TimedOut { .. })));

    // Well past the point the overrunning decision would have finished.
    time::sleep(Duration::from_secs(2)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    // The runner is still usable for the next tick.
    let next = runner.run(|_ctx| async { "next" }).await;
    assert_eq!(next, Ok("next"));
    assert_eq!(runner.metrics().total_decisions, 2);
}

#[tokio::test(start_paused = true)]
async fn test_run_until_past_deadline_times_out() {
    let result = run_until(Instant::now(), Duration::ZERO, std::future::pending::<()>()).await;
    assert_eq!(result, Err(DecisionError::TimedOut { budget: Duration::ZERO }));
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_panicking_decision_is_reported() {
    let mut runner = runner();

    let result: Result<(), _> = runner
        .run(|_ctx| async { panic!("agent exploded") })
        .await;

    assert_eq!(result, Err(DecisionError::Panicked("agent exploded".into())));
    assert_eq!(runner.metrics().failures, 1);
    assert_eq!(runner.metrics().total_decisions, 1);
}
