//! Deadline-bounded decisions for FireWall agents.
//!
//! The server ticks every 500 ms and ignores late actions, so every agent
//! decision runs under a hard wall-clock budget. [`DeadlineRunner::run`]
//! spawns the decision on its own task and waits for it until the
//! deadline. On overrun the task is aborted and then joined, so nothing
//! from a cancelled decision can surface after the runner returns.
//!
//! CPU-bound agents never reach an `.await` for the abort to take hold,
//! so they also get a [`TickContext`] carrying the deadline and can stop
//! at their own check points.
//!
//! # Integration
//!
//! ```ignore
//! let mut runner = DeadlineRunner::new(TickConfig::default());
//! while let Some(state) = next_tick().await {
//!     match runner.run(|ctx| decide(ctx, state)).await {
//!         Ok(action) => send(action).await,
//!         Err(e) => warn!(error = %e, "no action this tick"),
//!     }
//! }
//! ```

use std::any::Any;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for agent decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Time between two server ticks. Default: 500 ms.
    pub tick_interval: Duration,
    /// Hard budget for one decision. Default: 450 ms, leaving room for
    /// encoding and the network hop before the next tick.
    pub compute_budget: Duration,
    /// Budget warning threshold (0.0–1.0). Default: 0.80 (80%).
    /// A tracing warning is emitted when a decision uses more than this
    /// fraction of the budget.
    pub budget_warn_threshold: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            compute_budget: Duration::from_millis(450),
            budget_warn_threshold: 0.80,
        }
    }
}

impl TickConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

    /// A config with the given budget and the default interval.
    pub fn with_budget(compute_budget: Duration) -> Self {
        Self {
            compute_budget,
            ..Default::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`DeadlineRunner::new`]. Rules:
    /// - a zero `tick_interval` is replaced by the default;
    /// - `compute_budget` must be non-zero and strictly below
    ///   `tick_interval`, otherwise it becomes 90% of the interval;
    /// - `budget_warn_threshold` clamped to `0.0..=1.0`.
    pub fn validated(mut self) -> Self {
        if self.tick_interval.is_zero() {
            warn!("tick_interval is zero, using default");
            self.tick_interval = Self::DEFAULT_TICK_INTERVAL;
        }
        if self.compute_budget.is_zero() || self.compute_budget >= self.tick_interval {
            let clamped = self.tick_interval * 9 / 10;
            warn!(
                budget_ms = self.compute_budget.as_millis() as u64,
                interval_ms = self.tick_interval.as_millis() as u64,
                clamped_ms = clamped.as_millis() as u64,
                "compute_budget must be below tick_interval, clamping"
            );
            self.compute_budget = clamped;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// TickContext
// ---------------------------------------------------------------------------

/// Handed to every decision: which decision this is and when it must end.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    tick: u64,
    started: Instant,
    deadline: Instant,
}

impl TickContext {
    /// A context whose deadline is `budget` from now.
    pub fn starting_now(tick: u64, budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            tick,
            started,
            deadline: started + budget,
        }
    }

    /// Decision number, starting at 1.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the decision is cancelled.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the deadline has passed. Long computations should poll
    /// this and return their best answer so far.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a decision produced no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The decision overran its budget and was cancelled.
    #[error("decision exceeded its {budget:?} budget")]
    TimedOut { budget: Duration },

    /// The decision task panicked.
    #[error("decision panicked: {0}")]
    Panicked(String),

    /// The decision task was cancelled from outside.
    #[error("decision task was cancelled")]
    Cancelled,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Runtime metrics for agent decisions.
///
/// Updated after each [`DeadlineRunner::run`]. Timing values are wall
/// clock from spawn to completion or cancellation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionMetrics {
    /// Decisions started.
    pub total_decisions: u64,
    /// Decisions that returned a value in time.
    pub completed: u64,
    /// Decisions cancelled at the deadline.
    pub timeouts: u64,
    /// Decisions that panicked or were cancelled externally.
    pub failures: u64,
    /// Exponential moving average of decision time (α = 0.1).
    pub avg_decision_time: Duration,
    /// Maximum decision time observed.
    pub max_decision_time: Duration,
    /// Budget utilization of the last decision (0.0–1.0).
    pub budget_utilization: f64,
}

impl DecisionMetrics {
    fn record(&mut self, elapsed: Duration, budget: Duration) {
        if elapsed > self.max_decision_time {
            self.max_decision_time = elapsed;
        }
        self.avg_decision_time = if self.total_decisions == 1 {
            elapsed
        } else {
            // Exponential moving average (α = 0.1).
            let alpha = 0.1;
            let prev = self.avg_decision_time.as_secs_f64();
            Duration::from_secs_f64(prev * (1.0 - alpha) + elapsed.as_secs_f64() * alpha)
        };
        self.budget_utilization = (elapsed.as_secs_f64() / budget.as_secs_f64()).min(1.0);
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs `future` on its own task until `deadline`.
///
/// On overrun the task is aborted and joined before returning, so the
/// future has been dropped by the time this resolves.
///
/// An abort only takes effect at the task's next `.await`. A future that
/// computes without yielding keeps running past the deadline, and the
/// join waits for it; such work should poll [`TickContext::is_expired`]
/// or call `tokio::task::yield_now` between steps.
///
/// # Errors
/// [`DecisionError::TimedOut`] on overrun (reported against `budget`),
/// [`DecisionError::Panicked`] if the task panicked.
pub async fn run_until<Fut, T>(
    deadline: Instant,
    budget: Duration,
    future: Fut,
) -> Result<T, DecisionError>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = tokio::spawn(future);
    match time::timeout_at(deadline, &mut handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_panic() => Err(DecisionError::Panicked(panic_message(e.into_panic()))),
        Ok(Err(_)) => Err(DecisionError::Cancelled),
        Err(_) => {
            handle.abort();
            // Joining guarantees the aborted future has been dropped.
            let _ = handle.await;
            Err(DecisionError::TimedOut { budget })
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Runs one decision at a time under the configured budget and keeps
/// metrics over all of them.
///
/// One `DeadlineRunner` per session; `&mut self` on [`run`](Self::run)
/// keeps decisions strictly sequential.
#[derive(Debug)]
pub struct DeadlineRunner {
    config: TickConfig,
    decision_count: u64,
    metrics: DecisionMetrics,
}

impl DeadlineRunner {
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        trace!(
            budget_ms = config.compute_budget.as_millis() as u64,
            interval_ms = config.tick_interval.as_millis() as u64,
            "deadline runner created"
        );
        Self {
            config,
            decision_count: 0,
            metrics: DecisionMetrics::default(),
        }
    }

    /// Runs one decision. `decide` receives the decision's [`TickContext`]
    /// and returns the future to run.
    ///
    /// # Errors
    /// See [`run_until`]. Errors are already logged and counted.
    pub async fn run<F, Fut, T>(&mut self, decide: F) -> Result<T, DecisionError>
    where
        F: FnOnce(TickContext) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.decision_count += 1;
        self.metrics.total_decisions += 1;

        let budget = self.config.compute_budget;
        let ctx = TickContext::starting_now(self.decision_count, budget);
        let result = run_until(ctx.deadline(), budget, decide(ctx)).await;
        let elapsed = ctx.elapsed();

        self.metrics.record(elapsed, budget);
        match &result {
            Ok(_) => {
                self.metrics.completed += 1;
                let utilization = elapsed.as_secs_f64() / budget.as_secs_f64();
                if utilization >= self.config.budget_warn_threshold {
                    warn!(
                        tick = ctx.tick(),
                        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                        budget_ms = budget.as_secs_f64() * 1000.0,
                        utilization_pct = format!("{:.1}", utilization * 100.0),
                        "decision approaching budget limit"
                    );
                }
            }
            Err(DecisionError::TimedOut { .. }) => {
                self.metrics.timeouts += 1;
                warn!(
                    tick = ctx.tick(),
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    "decision overran its budget, cancelled"
                );
            }
            Err(e) => {
                self.metrics.failures += 1;
                warn!(tick = ctx.tick(), error = %e, "decision failed");
            }
        }
        trace!(tick = ctx.tick(), elapsed_us = elapsed.as_micros() as u64, "decision finished");

        result
    }

    /// Number of decisions started.
    pub fn decision_count(&self) -> u64 {
        self.decision_count
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Snapshot of current metrics.
    pub fn metrics(&self) -> &DecisionMetrics {
        &self.metrics
    }
}

impl Default for DeadlineRunner {
    fn default() -> Self {
        Self::new(TickConfig::default())
    }
}
