// Console view models handed to renderers
use super::oven::OvenStatus;
use super::sample::Sample;
use super::selection::{Controls, Selection};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Everything a renderer needs for the sidebar: readings, selection and controls
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleView {
    pub status: OvenStatus,
    pub displayed_target: f64,
    pub selection: Selection,
    pub selection_label: String,
    pub manual_target: f64,
    pub controls: Controls,
    pub sample_count: usize,
    pub last_poll_at: Option<DateTime<Utc>>,
    /// Set once the console is torn down; no further views follow
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct TemperatureChart {
    pub samples: Vec<Sample>,
    pub sample_period: Duration,
    pub capacity: usize,
}

impl TemperatureChart {
    pub fn new(samples: Vec<Sample>, sample_period: Duration, capacity: usize) -> Self {
        Self {
            samples,
            sample_period,
            capacity,
        }
    }

    /// Span of time the full window covers
    pub fn window_secs(&self) -> f64 {
        self.capacity as f64 * self.sample_period.as_secs_f64()
    }

    /// Time axis ticks, multiples of `step_secs` bracketing the retained samples.
    ///
    /// The axis spans at least one full window, starting at the oldest sample
    /// rounded down to a tick.
    pub fn time_ticks(&self, step_secs: u32) -> Vec<u32> {
        let step = f64::from(step_secs.max(1));
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => (0.0, 0.0),
        };

        let start = (first / step).floor() * step;
        let end = ((last / step).ceil() * step).max(start + self.window_secs().floor());
        (start as u32..=end as u32).step_by(step as usize).collect()
    }
}
