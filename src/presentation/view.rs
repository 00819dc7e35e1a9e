// Mapper from console view models to JSON payloads
use crate::domain::console::{ConsoleView, TemperatureChart};
use crate::domain::oven::StartCommand;
use crate::domain::profile::Profile;
use crate::domain::selection::Selection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHART_Y_MIN: f64 = 0.0;
pub const CHART_Y_MAX: f64 = 300.0;
pub const CHART_TICK_STEP_SECS: u32 = 20;

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub current: f64,
    /// Target to display: backend target while running, pending selection otherwise
    pub target: f64,
    pub backend_target: f64,
    pub running: bool,
    pub selection: SelectionView,
    pub selection_label: String,
    pub manual_target: f64,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub samples: usize,
    pub last_poll_at: Option<DateTime<Utc>>,
    pub closed: bool,
    pub current_label: String,
    pub target_label: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionView {
    Unselected,
    Profile { index: usize },
    Manual { target: f64 },
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub window_secs: f64,
    pub sample_period_secs: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub time_ticks: Vec<u32>,
    pub samples: Vec<SampleView>,
}

#[derive(Debug, Serialize)]
pub struct SampleView {
    pub time: f64,
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Serialize)]
pub struct ProfilesView {
    pub profiles: Vec<ProfileView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub index: usize,
    pub name: String,
    /// Ramp/soak parameters exactly as the backend listed them
    pub params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionRequest {
    Profile { index: usize },
    Manual,
}

#[derive(Debug, Deserialize)]
pub struct ManualTargetRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct ManualTargetResponse {
    pub accepted: bool,
    pub manual_target: f64,
    pub retargeted: bool,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub idx: i32,
    pub temp: f64,
}

pub fn format_temp(temp: f64) -> String {
    format!("{:.1}°C", temp)
}

impl From<&ConsoleView> for StatusView {
    fn from(view: &ConsoleView) -> Self {
        let selection = match view.selection {
            Selection::Unselected => SelectionView::Unselected,
            Selection::Profile(index) => SelectionView::Profile { index },
            Selection::Manual(target) => SelectionView::Manual { target },
        };

        Self {
            current: view.status.current,
            target: view.displayed_target,
            backend_target: view.status.target,
            running: view.status.running,
            selection,
            selection_label: view.selection_label.clone(),
            manual_target: view.manual_target,
            start_enabled: view.controls.start_enabled,
            stop_enabled: view.controls.stop_enabled,
            samples: view.sample_count,
            last_poll_at: view.last_poll_at,
            closed: view.closed,
            current_label: format_temp(view.status.current),
            target_label: format_temp(view.displayed_target),
        }
    }
}

impl From<TemperatureChart> for ChartView {
    fn from(chart: TemperatureChart) -> Self {
        let time_ticks = chart.time_ticks(CHART_TICK_STEP_SECS);
        let samples = chart
            .samples
            .iter()
            .map(|s| SampleView {
                time: s.time,
                current: s.current,
                target: s.target,
            })
            .collect();

        Self {
            window_secs: chart.window_secs(),
            sample_period_secs: chart.sample_period.as_secs_f64(),
            y_min: CHART_Y_MIN,
            y_max: CHART_Y_MAX,
            time_ticks,
            samples,
        }
    }
}

impl From<Vec<Profile>> for ProfilesView {
    fn from(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .enumerate()
                .map(|(index, p)| ProfileView {
                    index,
                    name: p.name,
                    params: p.params,
                })
                .collect(),
        }
    }
}

impl From<StartCommand> for StartResponse {
    fn from(command: StartCommand) -> Self {
        Self {
            idx: command.idx,
            temp: command.temp,
        }
    }
}
