use std::collections::VecDeque;
use std::time::Instant;

/// Capability that produces frame timestamps, in milliseconds.
///
/// The display's repaint callback is one implementation; tests and replays use a scripted one.
pub trait TickSource {
    /// Timestamp of the next frame, or `None` when the source has no more frames.
    fn next_timestamp_ms(&mut self) -> Option<f64>;
}

/// Wall-clock source measuring from its creation.
#[derive(Clone, Copy, Debug)]
pub struct InstantTickSource {
    origin: Instant,
}

impl InstantTickSource {
    /// Start measuring now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantTickSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for InstantTickSource {
    fn next_timestamp_ms(&mut self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Scripted source that replays a queue of timestamps.
#[derive(Clone, Debug, Default)]
pub struct ManualTickSource {
    queue: VecDeque<f64>,
}

impl ManualTickSource {
    /// Empty source; feed it with [`ManualTickSource::push`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the given timestamps in order.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: timestamps.into_iter().collect(),
        }
    }

    /// `frames` timestamps spaced `interval_ms` apart, starting at zero.
    pub fn fixed_rate(frames: usize, interval_ms: f64) -> Self {
        Self::from_timestamps((0..frames).map(|i| i as f64 * interval_ms))
    }

    /// Queue one more timestamp.
    pub fn push(&mut self, timestamp_ms: f64) {
        self.queue.push_back(timestamp_ms);
    }

    /// Timestamps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl TickSource for ManualTickSource {
    fn next_timestamp_ms(&mut self) -> Option<f64> {
        self.queue.pop_front()
    }
}
