// Oven status and command domain models

/// Status as reported by the backend on each poll
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OvenStatus {
    pub current: f64,
    pub target: f64,
    pub running: bool,
}

impl OvenStatus {
    pub fn new(current: f64, target: f64, running: bool) -> Self {
        Self {
            current,
            target,
            running,
        }
    }

    /// A disconnected thermocouple shows up as a non-finite reading
    pub fn is_finite(&self) -> bool {
        self.current.is_finite() && self.target.is_finite()
    }
}

/// Body of a start request: a profile row, or the manual index plus target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartCommand {
    pub idx: i32,
    pub temp: f64,
}

impl StartCommand {
    pub fn new(idx: i32, temp: f64) -> Self {
        Self { idx, temp }
    }
}
