// Command dispatcher - Fire-and-forget start/stop requests
use crate::application::oven_backend::OvenBackend;
use crate::domain::oven::StartCommand;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Sends operator commands without waiting on them; the next poll shows the effect.
/// Failures are logged and dropped, never retried.
#[derive(Clone)]
pub struct CommandDispatcher {
    backend: Arc<dyn OvenBackend>,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn OvenBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    pub async fn start(&self, command: StartCommand) {
        let backend = self.backend.clone();
        self.spawn(async move {
            match backend.start(command).await {
                Ok(()) => tracing::info!(idx = command.idx, temp = command.temp, "Start command sent"),
                Err(e) => tracing::warn!(idx = command.idx, temp = command.temp, "Start command dropped: {}", e),
            }
        })
        .await;
    }

    pub async fn stop(&self) {
        let backend = self.backend.clone();
        self.spawn(async move {
            match backend.stop().await {
                Ok(()) => tracing::info!("Stop command sent"),
                Err(e) => tracing::warn!("Stop command dropped: {}", e),
            }
        })
        .await;
    }

    /// Wait for every command already handed to the backend
    pub async fn drain(&self) {
        let mut in_flight = self.in_flight.lock().await;
        while in_flight.join_next().await.is_some() {}
    }

    /// Give in-flight commands up to `grace` to finish, then abort the rest
    pub async fn settle(&self, grace: Duration) {
        if tokio::time::timeout(grace, self.drain()).await.is_ok() {
            return;
        }

        let mut in_flight = self.in_flight.lock().await;
        tracing::warn!("Aborting {} unfinished commands", in_flight.len());
        in_flight.abort_all();
        while in_flight.join_next().await.is_some() {}
    }

    async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().await;
        // reap finished commands so the set stays small
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_backend::{FakeOvenBackend, RecordedCommand};
    use crate::application::oven_backend::BackendError;

    #[tokio::test]
    async fn test_start_and_stop_reach_backend() {
        let backend = Arc::new(FakeOvenBackend::new());
        let dispatcher = CommandDispatcher::new(backend.clone());

        dispatcher.start(StartCommand::new(-1, 250.0)).await;
        dispatcher.drain().await;
        dispatcher.stop().await;
        dispatcher.drain().await;

        assert_eq!(
            backend.commands(),
            vec![
                RecordedCommand::Start(StartCommand::new(-1, 250.0)),
                RecordedCommand::Stop
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_commands_are_dropped() {
        let backend = Arc::new(FakeOvenBackend::new().with_failing_commands());
        let dispatcher = CommandDispatcher::new(backend.clone());

        dispatcher.start(StartCommand::new(1, 25.0)).await;
        dispatcher.stop().await;
        dispatcher.drain().await;

        // one attempt each, no retry
        assert_eq!(backend.commands().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_commands_are_each_sent() {
        let backend = Arc::new(FakeOvenBackend::new());
        let dispatcher = CommandDispatcher::new(backend.clone());

        dispatcher.stop().await;
        dispatcher.stop().await;
        dispatcher.drain().await;

        assert_eq!(backend.commands(), vec![RecordedCommand::Stop, RecordedCommand::Stop]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_aborts_hung_commands() {
        struct HungBackend;

        #[async_trait::async_trait]
        impl OvenBackend for HungBackend {
            async fn fetch_profiles(&self) -> Result<Vec<crate::domain::profile::Profile>, BackendError> {
                Ok(Vec::new())
            }
            async fn fetch_status(&self) -> Result<crate::domain::oven::OvenStatus, BackendError> {
                Err(BackendError::Status(503))
            }
            async fn start(&self, _command: StartCommand) -> Result<(), BackendError> {
                std::future::pending().await
            }
            async fn stop(&self) -> Result<(), BackendError> {
                std::future::pending().await
            }
        }

        let dispatcher = CommandDispatcher::new(Arc::new(HungBackend));
        dispatcher.stop().await;
        dispatcher.settle(Duration::from_secs(1)).await;

        assert!(dispatcher.in_flight.lock().await.is_empty());
    }
}
