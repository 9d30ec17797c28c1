//! Periodic maintenance tasks.
//!
//! Each `Ticker` runs one task on a fixed interval and never overlaps itself.
//! Different tickers run independently.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::ClockPort;
use crate::use_cases::persistence::SaveWorld;
use crate::use_cases::WipeOrphanedInstances;

pub const WIPE_ORPHANS_TICKER: &str = "WipeOrphanedInstances";
pub const PERIODIC_SAVE_TICKER: &str = "PeriodicSave";

const WIPE_ORPHANS_INTERVAL: Duration = Duration::from_secs(60 * 60);
const PERIODIC_SAVE_INTERVAL: Duration = Duration::from_secs(2 * 60);

#[async_trait]
pub trait TickTask: Send + Sync {
    async fn run(&self);
}

#[async_trait]
impl TickTask for WipeOrphanedInstances {
    async fn run(&self) {
        let summary = self.execute().await;
        if summary.deleted > 0 || summary.failed > 0 {
            tracing::info!(?summary, "Orphan sweep finished");
        }
    }
}

#[async_trait]
impl TickTask for SaveWorld {
    async fn run(&self) {
        if let Err(e) = self.execute().await {
            tracing::error!(error = %e, "Periodic save failed");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSnapshot {
    pub name: &'static str,
    pub interval: Duration,
    pub last_start: Option<DateTime<Utc>>,
    pub last_duration: Option<Duration>,
    pub iterations: u64,
}

#[derive(Default)]
struct TickerStats {
    last_start: Option<DateTime<Utc>>,
    last_duration: Option<Duration>,
    iterations: u64,
}

pub struct Ticker {
    name: &'static str,
    interval: Duration,
    run_at_boot: bool,
    task: Arc<dyn TickTask>,
    clock: Arc<dyn ClockPort>,
    run_lock: Mutex<()>,
    stats: Mutex<TickerStats>,
}

impl Ticker {
    pub fn new(
        name: &'static str,
        interval: Duration,
        run_at_boot: bool,
        task: Arc<dyn TickTask>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            name,
            interval,
            run_at_boot,
            task,
            clock,
            run_lock: Mutex::new(()),
            stats: Mutex::new(TickerStats::default()),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the task once, waiting for any run already in progress.
    pub async fn run_once(&self) {
        let _running = self.run_lock.lock().await;

        let started = Instant::now();
        self.stats.lock().await.last_start = Some(self.clock.now());

        self.task.run().await;

        let elapsed = started.elapsed();
        {
            let mut stats = self.stats.lock().await;
            stats.last_duration = Some(elapsed);
            stats.iterations += 1;
        }
        tracing::debug!(ticker = self.name, duration_ms = elapsed.as_millis() as u64, "Ticker ran");
    }

    pub async fn snapshot(&self) -> TickerSnapshot {
        let stats = self.stats.lock().await;
        TickerSnapshot {
            name: self.name,
            interval: self.interval,
            last_start: stats.last_start,
            last_duration: stats.last_duration,
            iterations: stats.iterations,
        }
    }

    /// Runs on every interval until `cancel` fires. A run that overruns its
    /// interval delays the next tick instead of bursting to catch up.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let first = if self.run_at_boot {
                Instant::now()
            } else {
                Instant::now() + self.interval
            };
            let mut ticks = tokio::time::interval_at(first, self.interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(ticker = self.name, interval_secs = self.interval.as_secs(), "Ticker started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticks.tick() => self.run_once().await,
                }
            }
            tracing::info!(ticker = self.name, "Ticker stopped");
        })
    }
}

/// The set of tickers owned by the server.
pub struct Scheduler {
    tickers: Vec<Arc<Ticker>>,
}

impl Scheduler {
    pub fn new(tickers: Vec<Arc<Ticker>>) -> Self {
        Self { tickers }
    }

    /// The orphan sweep and the periodic save.
    pub fn standard(
        sweep: Arc<WipeOrphanedInstances>,
        save: Arc<SaveWorld>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self::new(vec![
            Arc::new(Ticker::new(
                WIPE_ORPHANS_TICKER,
                WIPE_ORPHANS_INTERVAL,
                true,
                sweep,
                Arc::clone(&clock),
            )),
            Arc::new(Ticker::new(
                PERIODIC_SAVE_TICKER,
                PERIODIC_SAVE_INTERVAL,
                false,
                save,
                clock,
            )),
        ])
    }

    pub fn ticker(&self, name: &str) -> Option<Arc<Ticker>> {
        self.tickers.iter().find(|t| t.name() == name).cloned()
    }

    pub fn start(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        self.tickers
            .iter()
            .map(|t| Arc::clone(t).spawn(cancel.child_token()))
            .collect()
    }

    pub async fn snapshots(&self) -> Vec<TickerSnapshot> {
        let mut snapshots = Vec::with_capacity(self.tickers.len());
        for ticker in &self.tickers {
            snapshots.push(ticker.snapshot().await);
        }
        snapshots
    }
}
