//! # Day-Night Cycle
//!
//! A time-of-day scalar in `[0, 1)` and the lighting derived from it. The
//! renderer applies the lighting; the simulation only advances the clock.

use std::f32::consts::TAU;

use stranded_shared::Vec3;

use crate::config::DayNightConfig;

/// Sun elevation at noon.
pub const SUN_HEIGHT: f32 = 50.0;

/// Horizontal radius of the sun's orbit.
pub const SUN_DISTANCE: f32 = 100.0;

/// Light parameters for one time of day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    /// Sun position.
    pub sun_position: Vec3,
    /// Overall brightness, 0.25 at night up to 1.
    pub brightness: f32,
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// HSL lightness of the sky color.
    pub sky_lightness: f32,
}

/// Periodic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayNightCycle {
    time_of_day: f32,
    cycle_length: f32,
}

impl DayNightCycle {
    /// Cycle starting at midnight-equivalent time 0.
    #[must_use]
    pub fn new(config: &DayNightConfig) -> Self {
        Self {
            time_of_day: 0.0,
            cycle_length: config.day_length + config.night_length,
        }
    }

    /// Current time of day in `[0, 1)`.
    #[inline]
    #[must_use]
    pub const fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    /// Moves the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if self.cycle_length <= 0.0 {
            return;
        }
        self.time_of_day = (self.time_of_day + dt / self.cycle_length).rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0
        if self.time_of_day >= 1.0 {
            self.time_of_day = 0.0;
        }
    }

    /// Lighting at the current time of day.
    #[must_use]
    pub fn lighting(&self) -> Lighting {
        let angle = self.time_of_day * TAU;
        let elevation = angle.sin() * SUN_HEIGHT;
        let brightness = (elevation / SUN_HEIGHT + 0.5).max(0.0) * 0.75 + 0.25;

        Lighting {
            sun_position: Vec3::new(angle.cos() * SUN_DISTANCE, elevation, angle.sin() * SUN_DISTANCE),
            brightness,
            ambient_intensity: 0.2 + 0.8 * brightness,
            directional_intensity: 1.5 * brightness,
            sky_lightness: 0.1 + 0.4 * brightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle() -> DayNightCycle {
        DayNightCycle::new(&DayNightConfig {
            day_length: 90.0,
            night_length: 10.0,
        })
    }

    #[test]
    fn test_advance_wraps() {
        let mut cycle = cycle();
        cycle.advance(25.0);
        assert!((cycle.time_of_day() - 0.25).abs() < 1e-6);
        cycle.advance(100.0);
        assert!((cycle.time_of_day() - 0.25).abs() < 1e-5);
        cycle.advance(80.0);
        assert!((cycle.time_of_day() - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_noon_is_brightest() {
        let mut cycle = cycle();
        cycle.advance(25.0);
        let noon = cycle.lighting();
        assert!((noon.sun_position.y - SUN_HEIGHT).abs() < 1e-3);
        assert!((noon.brightness - 1.375).abs() < 1e-4);
        assert!((noon.directional_intensity - 1.5 * noon.brightness).abs() < 1e-5);
    }

    #[test]
    fn test_night_floor() {
        let mut cycle = cycle();
        cycle.advance(75.0);
        let night = cycle.lighting();
        assert!(night.sun_position.y < 0.0);
        assert!((night.brightness - 0.25).abs() < 1e-5);
        assert!((night.ambient_intensity - 0.4).abs() < 1e-5);
        assert!((night.sky_lightness - 0.2).abs() < 1e-5);
    }
}
