// Application layer - Console use cases and the backend port
pub mod command_dispatcher;
pub mod console_service;
pub mod oven_backend;
pub mod telemetry_poller;

#[cfg(test)]
pub mod fake_backend;
