//! # STRANDED Frame Timing
//!
//! One tick = one frame:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. CLOCK      dt = min(elapsed, max_frame_delta), sim time += dt     │
//! │ 2. PHYSICS    fixed sub-steps, contacts resolved in handle order     │
//! │ 3. LOGIC      doors, movement, combat, AI, survival, day-night,      │
//! │               particles, interactions, timers, spawns                │
//! │ 4. PURGE      queued entities leave their registries                 │
//! │ 5. END        feedback advanced, FrameStats recorded                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tracing::info;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Simulation clock. Time only advances through `advance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    now: f32,
    frame: u64,
    max_delta: f32,
}

impl FrameClock {
    /// Clock at time zero clamping deltas to `max_delta`.
    #[must_use]
    pub const fn new(max_delta: f32) -> Self {
        Self {
            now: 0.0,
            frame: 0,
            max_delta,
        }
    }

    /// Starts a frame and returns its clamped delta.
    ///
    /// Negative or NaN elapsed times count as zero.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        let dt = if elapsed > 0.0 {
            elapsed.min(self.max_delta)
        } else {
            0.0
        };
        self.now += dt;
        self.frame += 1;
        dt
    }

    /// Simulated seconds since start.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }

    /// Frames started so far.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

/// Timing and work counters of one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Clamped delta time.
    pub delta_time: f32,
    /// Total tick time in microseconds.
    pub total_us: u64,
    /// Physics step time in microseconds.
    pub physics_us: u64,
    /// Gameplay logic time in microseconds.
    pub logic_us: u64,
    /// Purge time in microseconds.
    pub purge_us: u64,
    /// Contacts reported by physics.
    pub contacts: u32,
    /// Entities purged.
    pub removed: u32,
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of physics times.
    pub physics_us_sum: u64,
    /// Sum of logic times.
    pub logic_us_sum: u64,
    /// Sum of purge times.
    pub purge_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Entities purged over all frames.
    pub removed_total: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            physics_us_sum: 0,
            logic_us_sum: 0,
            purge_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            removed_total: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.physics_us_sum += stats.physics_us;
        self.logic_us_sum += stats.logic_us;
        self.purge_us_sum += stats.purge_us;
        self.removed_total += u64::from(stats.removed);
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if u128::from(stats.total_us) > TARGET_FRAME_TIME.as_micros() {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary of the statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn log_summary(&self) {
        if self.frames_recorded == 0 {
            info!("no frames recorded");
            return;
        }
        let frames = self.frames_recorded as f64;
        info!(
            frames = self.frames_recorded,
            avg_ms = format_args!("{:.3}", self.avg_frame_ms()),
            min_ms = format_args!("{:.3}", self.min_frame_us as f64 / 1000.0),
            max_ms = format_args!("{:.3}", self.max_frame_us as f64 / 1000.0),
            over_budget = format_args!("{:.1}%", self.over_budget_ratio() * 100.0),
            "frame timing"
        );
        info!(
            physics_ms = format_args!("{:.3}", self.physics_us_sum as f64 / frames / 1000.0),
            logic_ms = format_args!("{:.3}", self.logic_us_sum as f64 / frames / 1000.0),
            purge_ms = format_args!("{:.3}", self.purge_us_sum as f64 / frames / 1000.0),
            removed = self.removed_total,
            "frame breakdown"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_clamps_delta() {
        let mut clock = FrameClock::new(0.1);
        assert!((clock.advance(0.016) - 0.016).abs() < 1e-6);
        assert!((clock.advance(5.0) - 0.1).abs() < 1e-6);
        assert!((clock.now() - 0.116).abs() < 1e-5);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_clock_ignores_negative_elapsed() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();

        for i in 0..100 {
            acc.record(FrameStats {
                frame: i,
                delta_time: 1.0 / 60.0,
                total_us: 10_000 + (i * 100),
                physics_us: 2000,
                logic_us: 5000,
                purge_us: 100,
                contacts: 3,
                removed: 1,
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.removed_total, 100);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        assert!(acc.over_budget_ratio() > 0.0);
    }
}
