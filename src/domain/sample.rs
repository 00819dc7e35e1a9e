// Telemetry sample window for the temperature chart
use std::collections::VecDeque;
use std::time::Duration;

/// Largest window a buffer will hold, in samples
pub const MAX_CAPACITY: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the first sample of this buffer
    pub time: f64,
    pub current: f64,
    pub target: f64,
}

/// Sliding window of the most recent samples, oldest first.
///
/// Sample times come from a synthetic clock: the first sample is at 0 and
/// every later one is exactly one sample period after the previous, even if
/// polls were skipped in between.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    sample_period: Duration,
    next_seq: u64,
}

impl SampleBuffer {
    /// Capacity is clamped to `1..=MAX_CAPACITY`; storage grows as samples arrive.
    pub fn new(sample_period: Duration, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            samples: VecDeque::new(),
            capacity,
            sample_period,
            next_seq: 0,
        }
    }

    /// Buffer sized to hold `window` worth of samples (`floor(window / period)`)
    pub fn for_window(sample_period: Duration, window: Duration) -> Self {
        Self::new(sample_period, window_capacity(sample_period, window))
    }

    pub fn append(&mut self, current: f64, target: f64) {
        let time = self.next_seq as f64 * self.sample_period.as_secs_f64();
        self.next_seq += 1;

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample {
            time,
            current,
            target,
        });
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sample_period(&self) -> Duration {
        self.sample_period
    }
}

/// Samples needed to cover `window`, saturating at `usize::MAX`
pub fn window_capacity(sample_period: Duration, window: Duration) -> usize {
    if sample_period.is_zero() {
        return 1;
    }
    usize::try_from(window.as_nanos() / sample_period.as_nanos()).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(500);

    fn default_buffer() -> SampleBuffer {
        SampleBuffer::for_window(PERIOD, Duration::from_secs(300))
    }

    #[test]
    fn test_capacity_from_window() {
        assert_eq!(default_buffer().capacity(), 600);
        assert_eq!(
            SampleBuffer::for_window(Duration::from_millis(300), Duration::from_secs(1)).capacity(),
            3
        );
    }

    #[test]
    fn test_times_form_arithmetic_sequence_below_capacity() {
        let mut buffer = default_buffer();
        for i in 0..10 {
            buffer.append(20.0 + i as f64, 100.0);
        }

        let samples = buffer.snapshot();
        assert_eq!(samples.len(), 10);
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.time, i as f64 * 0.5);
        }
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut buffer = SampleBuffer::new(PERIOD, 4);
        for i in 0..7 {
            buffer.append(i as f64, 10.0 * i as f64);
        }

        let currents: Vec<f64> = buffer.snapshot().iter().map(|s| s.current).collect();
        assert_eq!(currents, vec![3.0, 4.0, 5.0, 6.0]);
        let targets: Vec<f64> = buffer.snapshot().iter().map(|s| s.target).collect();
        assert_eq!(targets, vec![30.0, 40.0, 50.0, 60.0]);
        assert_eq!(buffer.snapshot()[0].time, 1.5);
    }

    #[test]
    fn test_window_stabilizes_after_overflow() {
        let mut buffer = default_buffer();
        for _ in 0..601 {
            buffer.append(20.0, 0.0);
        }

        assert_eq!(buffer.len(), 600);
        let samples = buffer.snapshot();
        assert_eq!(samples[0].time, 0.5);
        assert_eq!(samples[599].time, 300.0);
    }

    #[test]
    fn test_snapshot_is_stable_without_append() {
        let mut buffer = default_buffer();
        buffer.append(21.0, 150.0);
        buffer.append(22.5, 150.0);

        assert_eq!(buffer.snapshot(), buffer.snapshot());
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let window = Duration::from_secs(1_000_000_000_000_000);
        assert!(window_capacity(Duration::from_millis(1), window) > MAX_CAPACITY);

        let mut buffer = SampleBuffer::for_window(Duration::from_millis(1), window);
        assert_eq!(buffer.capacity(), MAX_CAPACITY);
        buffer.append(20.0, 0.0);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = default_buffer();
        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());
    }
}
