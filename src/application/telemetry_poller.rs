// Telemetry poller - Periodic status fetch feeding the console
use crate::application::console_service::{ConsoleService, PollApplied};
use crate::application::oven_backend::OvenBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// Polls the backend once per sample period.
///
/// Only one status request is ever outstanding: each fetch is awaited before
/// the next tick, and ticks missed meanwhile are skipped rather than bursted.
pub struct TelemetryPoller {
    backend: Arc<dyn OvenBackend>,
    console: ConsoleService,
    period: Duration,
    tick: u64,
}

impl TelemetryPoller {
    pub fn new(backend: Arc<dyn OvenBackend>, console: ConsoleService, period: Duration) -> Self {
        Self {
            backend,
            console,
            period,
            tick: 0,
        }
    }

    pub async fn poll_once(&mut self) -> PollApplied {
        self.tick += 1;
        let result = self.backend.fetch_status().await;
        self.console.record_poll(self.tick, result).await
    }

    /// Poll until `shutdown_rx` fires or its sender is dropped
    pub async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(period_ms = self.period.as_millis() as u64, "Telemetry poller started");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = interval.tick() => {
                    // an in-flight fetch is abandoned on shutdown
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        _ = self.poll_once() => {}
                    }
                }
            }
        }

        tracing::info!(ticks = self.tick, "Telemetry poller stopped");
    }
}
