// In-memory backend for tests
use crate::application::oven_backend::{BackendError, OvenBackend};
use crate::domain::oven::{OvenStatus, StartCommand};
use crate::domain::profile::Profile;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    Start(StartCommand),
    Stop,
}

/// Replays scripted status responses, then repeats `fallback_status`
pub struct FakeOvenBackend {
    profiles: Result<Vec<Profile>, BackendError>,
    statuses: Mutex<VecDeque<Result<OvenStatus, BackendError>>>,
    fallback_status: OvenStatus,
    commands: Mutex<Vec<RecordedCommand>>,
    fail_commands: bool,
}

impl FakeOvenBackend {
    pub fn new() -> Self {
        Self {
            profiles: Ok(Vec::new()),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: OvenStatus::new(20.0, 0.0, false),
            commands: Mutex::new(Vec::new()),
            fail_commands: false,
        }
    }

    pub fn with_profiles(mut self, names: &[&str]) -> Self {
        self.profiles = Ok(names.iter().map(|name| Profile::named(name)).collect());
        self
    }

    pub fn with_profile_error(mut self) -> Self {
        self.profiles = Err(BackendError::Unreachable("connection refused".to_string()));
        self
    }

    pub fn with_failing_commands(mut self) -> Self {
        self.fail_commands = true;
        self
    }

    pub fn push_status(&self, status: Result<OvenStatus, BackendError>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }

    fn record(&self, command: RecordedCommand) -> Result<(), BackendError> {
        self.commands.lock().unwrap().push(command);
        if self.fail_commands {
            return Err(BackendError::Status(500));
        }
        Ok(())
    }
}

#[async_trait]
impl OvenBackend for FakeOvenBackend {
    async fn fetch_profiles(&self) -> Result<Vec<Profile>, BackendError> {
        self.profiles.clone()
    }

    async fn fetch_status(&self) -> Result<OvenStatus, BackendError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.fallback_status))
    }

    async fn start(&self, command: StartCommand) -> Result<(), BackendError> {
        self.record(RecordedCommand::Start(command))
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.record(RecordedCommand::Stop)
    }
}
