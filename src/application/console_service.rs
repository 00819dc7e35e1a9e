// Console service - One operator session against one oven
use crate::application::command_dispatcher::CommandDispatcher;
use crate::application::oven_backend::{BackendError, OvenBackend};
use crate::application::telemetry_poller::TelemetryPoller;
use crate::domain::console::{ConsoleView, TemperatureChart};
use crate::domain::oven::{OvenStatus, StartCommand};
use crate::domain::profile::{Profile, ProfileDirectory};
use crate::domain::sample::SampleBuffer;
use crate::domain::selection::{ManualSubmit, Selection, SelectionError, SelectionState};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, RwLock};
use tokio::task::JoinHandle;

const COMMAND_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleSettings {
    pub sample_period: Duration,
    pub window: Duration,
    pub default_manual_target: f64,
    /// Start index for manual mode when the backend lists no "Manual" profile
    pub manual_wire_index: i32,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(500),
            window: Duration::from_secs(300),
            default_manual_target: 25.0,
            manual_wire_index: -1,
        }
    }
}

/// What happened to one poll result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollApplied {
    Appended,
    Skipped,
    Stale,
    Closed,
}

struct ConsoleState {
    buffer: SampleBuffer,
    status: OvenStatus,
    directory: ProfileDirectory,
    selection: SelectionState,
    last_tick: u64,
    last_poll_at: Option<DateTime<Utc>>,
    failed_ticks: u64,
    closed: bool,
}

impl ConsoleState {
    fn view(&self) -> ConsoleView {
        ConsoleView {
            status: self.status,
            displayed_target: self.selection.displayed_target(&self.status),
            selection: self.selection.selection(),
            selection_label: self.selection.label(&self.directory),
            manual_target: self.selection.manual_target(),
            controls: self.selection.controls(self.status.running),
            sample_count: self.buffer.len(),
            last_poll_at: self.last_poll_at,
            closed: self.closed,
        }
    }
}

#[derive(Clone)]
pub struct ConsoleService {
    backend: Arc<dyn OvenBackend>,
    state: Arc<RwLock<ConsoleState>>,
    dispatcher: CommandDispatcher,
    views: Arc<watch::Sender<ConsoleView>>,
    manual_wire_index: i32,
}

impl ConsoleService {
    pub fn new(backend: Arc<dyn OvenBackend>, settings: &ConsoleSettings) -> Self {
        let state = ConsoleState {
            buffer: SampleBuffer::for_window(settings.sample_period, settings.window),
            status: OvenStatus::default(),
            directory: ProfileDirectory::empty(),
            selection: SelectionState::new(settings.default_manual_target),
            last_tick: 0,
            last_poll_at: None,
            failed_ticks: 0,
            closed: false,
        };
        let (views, _) = watch::channel(state.view());

        Self {
            dispatcher: CommandDispatcher::new(backend.clone()),
            backend,
            state: Arc::new(RwLock::new(state)),
            views: Arc::new(views),
            manual_wire_index: settings.manual_wire_index,
        }
    }

    /// Load profiles, then start polling. The first poll happens right away.
    pub async fn launch(backend: Arc<dyn OvenBackend>, settings: &ConsoleSettings) -> ConsoleHandle {
        let service = Self::new(backend.clone(), settings);
        service.load_profiles().await;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let poller = TelemetryPoller::new(backend, service.clone(), settings.sample_period);
        let poller = tokio::spawn(poller.run(shutdown_rx));

        ConsoleHandle {
            service,
            poller,
            shutdown_tx,
        }
    }

    /// Fetch the profile list; any failure leaves the directory empty
    pub async fn load_profiles(&self) {
        let directory = match self.backend.fetch_profiles().await {
            Ok(profiles) => {
                let directory = ProfileDirectory::new(profiles);
                if directory.is_empty() {
                    tracing::warn!("Backend lists no profiles, only manual mode is available");
                } else {
                    tracing::info!("Loaded {} profiles", directory.len());
                }
                directory
            }
            Err(e) => {
                tracing::warn!("Could not load profiles, continuing without: {}", e);
                ProfileDirectory::empty()
            }
        };

        let mut state = self.state.write().await;
        state.directory = directory;
        self.publish(&state);
    }

    /// Apply the result of poll number `tick`.
    ///
    /// Results must arrive with increasing ticks; anything not newer than the
    /// last applied tick is dropped.
    pub async fn record_poll(&self, tick: u64, result: Result<OvenStatus, BackendError>) -> PollApplied {
        let mut state = self.state.write().await;
        if state.closed {
            return PollApplied::Closed;
        }
        if tick <= state.last_tick {
            tracing::debug!(tick, last_tick = state.last_tick, "Dropping stale poll result");
            return PollApplied::Stale;
        }
        state.last_tick = tick;

        let status = match result {
            Ok(status) if status.is_finite() => status,
            Ok(status) => {
                Self::note_failure(&mut state, tick, &format!("non-finite reading {:?}", status));
                return PollApplied::Skipped;
            }
            Err(e) => {
                Self::note_failure(&mut state, tick, &e.to_string());
                return PollApplied::Skipped;
            }
        };

        if state.failed_ticks > 0 {
            tracing::info!("Status poll recovered after {} skipped ticks", state.failed_ticks);
            state.failed_ticks = 0;
        }

        if state.buffer.is_empty() {
            tracing::info!(current = status.current, running = status.running, "First telemetry sample");
        }
        state.status = status;
        state.last_poll_at = Some(Utc::now());
        state.buffer.append(status.current, status.target);
        tracing::debug!(
            tick,
            current = status.current,
            target_temp = status.target,
            running = status.running,
            "Sample appended"
        );

        self.publish(&state);
        PollApplied::Appended
    }

    pub async fn profiles(&self) -> Vec<Profile> {
        self.state.read().await.directory.iter().cloned().collect()
    }

    pub async fn select_profile(&self, index: usize) -> Result<Selection, SelectionError> {
        let mut state = self.state.write().await;
        let state = &mut *state;
        if state.closed {
            return Ok(state.selection.selection());
        }
        let selection = state.selection.select_profile(index, &state.directory)?;
        tracing::info!(index, "Profile selected");
        self.publish(state);
        Ok(selection)
    }

    pub async fn select_manual(&self) -> Selection {
        let mut state = self.state.write().await;
        if state.closed {
            return state.selection.selection();
        }
        let selection = state.selection.select_manual();
        tracing::info!(temp = state.selection.manual_target(), "Manual mode selected");
        self.publish(&state);
        selection
    }

    /// Submit the manual target field; re-targets the oven if it is already running
    pub async fn submit_manual_target(&self, input: &str) -> ManualSubmit {
        let mut state = self.state.write().await;
        if state.closed {
            return ManualSubmit::Ignored;
        }
        let manual_idx = self.manual_index(&state);
        let running = state.status.running;
        let outcome = state.selection.submit_manual_target(input, running, manual_idx);

        match outcome {
            ManualSubmit::Accepted {
                target,
                retarget: Some(command),
            } => {
                self.publish(&state);
                tracing::info!(temp = target, "Re-targeting running oven");
                // still under the lock: nothing is spawned once closed
                self.dispatcher.start(command).await;
            }
            ManualSubmit::Accepted { target, retarget: None } => {
                self.publish(&state);
                tracing::info!(temp = target, "Manual target updated");
            }
            ManualSubmit::Rejected => tracing::debug!("Discarding malformed manual target input"),
            ManualSubmit::Ignored => tracing::debug!("Manual target submitted outside manual mode"),
        }

        outcome
    }

    /// Press Start. Returns the dispatched command, or `None` when Start is inert.
    pub async fn start(&self) -> Option<StartCommand> {
        let state = self.state.read().await;
        if state.closed {
            return None;
        }

        let command = state
            .selection
            .start_command(state.status.running, self.manual_index(&state));
        match command {
            Some(command) => self.dispatcher.start(command).await,
            None => tracing::debug!("Start ignored, nothing selected or oven already running"),
        }
        command
    }

    pub async fn stop(&self) -> bool {
        let state = self.state.read().await;
        if state.closed {
            return false;
        }
        self.dispatcher.stop().await;
        true
    }

    pub async fn view(&self) -> ConsoleView {
        self.state.read().await.view()
    }

    #[cfg(test)]
    pub async fn samples(&self) -> Vec<crate::domain::sample::Sample> {
        self.state.read().await.buffer.snapshot()
    }

    pub async fn chart(&self) -> TemperatureChart {
        let state = self.state.read().await;
        TemperatureChart::new(
            state.buffer.snapshot(),
            state.buffer.sample_period(),
            state.buffer.capacity(),
        )
    }

    /// Views published after every state change
    pub fn subscribe(&self) -> watch::Receiver<ConsoleView> {
        self.views.subscribe()
    }

    #[cfg(test)]
    pub async fn drain_commands(&self) {
        self.dispatcher.drain().await;
    }

    async fn close(&self) {
        {
            let mut state = self.state.write().await;
            state.closed = true;
            self.publish(&state);
        }
        self.dispatcher.settle(COMMAND_GRACE).await;
    }

    fn manual_index(&self, state: &ConsoleState) -> i32 {
        state
            .directory
            .manual_row()
            .map(|row| row as i32)
            .unwrap_or(self.manual_wire_index)
    }

    fn note_failure(state: &mut ConsoleState, tick: u64, reason: &str) {
        if state.failed_ticks == 0 {
            tracing::warn!(tick, "Status poll failed, skipping tick: {}", reason);
        } else {
            tracing::debug!(tick, "Status poll still failing: {}", reason);
        }
        state.failed_ticks += 1;
    }

    fn publish(&self, state: &ConsoleState) {
        self.views.send_replace(state.view());
    }
}

/// Running console: the session plus its poller task
pub struct ConsoleHandle {
    service: ConsoleService,
    poller: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl ConsoleHandle {
    pub fn service(&self) -> &ConsoleService {
        &self.service
    }

    /// Stop polling and let in-flight commands settle; no state changes after this returns
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.poller.await {
            tracing::error!("Telemetry poller ended abnormally: {}", e);
        }
        self.service.close().await;
        tracing::info!("Console shut down");
    }
}
