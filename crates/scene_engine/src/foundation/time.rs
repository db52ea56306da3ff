//! Frame clock and load timing

use std::time::{Duration, Instant};

/// Wall-clock frame timer
///
/// `update` samples the clock once per frame; `advance` feeds a fixed step
/// for headless loops. Either way the stored delta is capped by the
/// configured ceiling.
pub struct Timer {
    previous: Instant,
    delta: f32,
    elapsed: f32,
    frames: u64,
    /// Delta ceiling in seconds, 0 disables it
    ceiling: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Timer starting now with no ceiling
    pub fn new() -> Self {
        Self { previous: Instant::now(), delta: 0.0, elapsed: 0.0, frames: 0, ceiling: 0.0 }
    }

    /// Cap every delta at `ceiling` seconds
    pub fn with_max_delta(self, ceiling: f32) -> Self {
        Self { ceiling: ceiling.max(0.0), ..self }
    }

    /// Sample the wall clock
    pub fn update(&mut self) {
        let now = Instant::now();
        let step = now.saturating_duration_since(self.previous).as_secs_f32();
        self.previous = now;
        self.advance(step);
    }

    /// Step by `seconds` without touching the clock
    pub fn advance(&mut self, seconds: f32) {
        self.delta = match self.ceiling {
            c if c > 0.0 => seconds.min(c),
            _ => seconds,
        };
        self.elapsed += self.delta;
        self.frames += 1;
    }

    /// Seconds covered by the last step
    pub fn delta_time(&self) -> f32 {
        self.delta
    }

    /// Sum of every step so far
    pub fn total_time(&self) -> f32 {
        self.elapsed
    }

    /// Steps taken
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

/// How long the gameplay scene took to finish loading
///
/// Armed on entering the Game scene and stopped the first frame nothing is
/// left loading. Threaded and inline runs are recorded separately.
#[derive(Debug, Default)]
pub struct LoadTimer {
    started: Option<Instant>,
    /// Last load time with inline loading
    pub elapsed_inline: Option<Duration>,
    /// Last load time with the worker pool
    pub elapsed_threaded: Option<Duration>,
}

impl LoadTimer {
    /// Idle timer with no results
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing, discarding any unfinished measurement
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// A measurement is running
    pub fn is_pending(&self) -> bool {
        self.started.is_some()
    }

    /// Stop timing and record the result under the given mode
    ///
    /// Returns `None` if nothing was running.
    pub fn finish(&mut self, threaded: bool) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        let slot = if threaded { &mut self.elapsed_threaded } else { &mut self.elapsed_inline };
        *slot = Some(elapsed);
        Some(elapsed)
    }

    /// Drop a running measurement; recorded results stay
    pub fn reset(&mut self) {
        self.started = None;
    }
}
