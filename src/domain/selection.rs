// Operator selection state machine
use super::oven::{OvenStatus, StartCommand};
use super::profile::ProfileDirectory;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Unselected,
    Profile(usize),
    Manual(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("profile {index} does not exist ({available} profiles loaded)")]
    UnknownProfile { index: usize, available: usize },
}

/// Result of submitting the manual target field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManualSubmit {
    /// New target accepted; carries the start to dispatch when the oven is already running
    Accepted {
        target: f64,
        retarget: Option<StartCommand>,
    },
    /// Input did not parse, nothing changed
    Rejected,
    /// Not in manual mode, nothing changed
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

/// What the operator has picked, reconciled against the backend's `running` flag.
///
/// The backend is the only authority on whether the oven is running; this
/// state never tracks "started" itself.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selection: Selection,
    manual_target: f64,
}

impl SelectionState {
    pub fn new(default_manual_target: f64) -> Self {
        Self {
            selection: Selection::Unselected,
            manual_target: default_manual_target,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn manual_target(&self) -> f64 {
        self.manual_target
    }

    pub fn select_profile(
        &mut self,
        index: usize,
        directory: &ProfileDirectory,
    ) -> Result<Selection, SelectionError> {
        let profile = directory.get(index).ok_or(SelectionError::UnknownProfile {
            index,
            available: directory.len(),
        })?;

        if profile.is_manual() {
            return Ok(self.select_manual());
        }

        self.selection = Selection::Profile(index);
        Ok(self.selection)
    }

    pub fn select_manual(&mut self) -> Selection {
        self.selection = Selection::Manual(self.manual_target);
        self.selection
    }

    /// Apply the text of the manual target field.
    ///
    /// `manual_idx` is the start index the backend expects for manual mode.
    pub fn submit_manual_target(&mut self, input: &str, running: bool, manual_idx: i32) -> ManualSubmit {
        if !matches!(self.selection, Selection::Manual(_)) {
            return ManualSubmit::Ignored;
        }

        let Some(target) = parse_temperature(input) else {
            return ManualSubmit::Rejected;
        };

        self.manual_target = target;
        self.selection = Selection::Manual(target);

        let retarget = running.then(|| StartCommand::new(manual_idx, target));
        ManualSubmit::Accepted { target, retarget }
    }

    /// Command for the Start control, `None` when Start is inert
    pub fn start_command(&self, running: bool, manual_idx: i32) -> Option<StartCommand> {
        if running {
            return None;
        }

        match self.selection {
            Selection::Unselected => None,
            Selection::Profile(index) => {
                let idx = i32::try_from(index).ok()?;
                Some(StartCommand::new(idx, self.manual_target))
            }
            Selection::Manual(target) => Some(StartCommand::new(manual_idx, target)),
        }
    }

    /// Target to show: the backend's while running, otherwise the pending manual target
    pub fn displayed_target(&self, status: &OvenStatus) -> f64 {
        if status.running {
            return status.target;
        }

        match self.selection {
            Selection::Manual(target) => target,
            Selection::Unselected | Selection::Profile(_) => status.target,
        }
    }

    pub fn controls(&self, running: bool) -> Controls {
        Controls {
            start_enabled: !running
                && match self.selection {
                    Selection::Unselected => false,
                    Selection::Profile(index) => i32::try_from(index).is_ok(),
                    Selection::Manual(_) => true,
                },
            stop_enabled: true,
        }
    }

    pub fn label(&self, directory: &ProfileDirectory) -> String {
        match self.selection {
            Selection::Unselected => "None".to_string(),
            Selection::Profile(index) => directory
                .get(index)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("Profile {}", index)),
            Selection::Manual(_) => "Manual".to_string(),
        }
    }
}

fn parse_temperature(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
