//! Fixed-duration tweens
//!
//! A `Tween` interpolates between two values over a duration in
//! milliseconds. It holds no clock: the owner advances it with the frame
//! delta, so ticks interleave deterministically with input handling on the
//! same thread.

use crate::easing::Easing;
use crate::values::Interpolate;

/// A timed interpolation between two values
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    /// Duration in milliseconds
    duration_ms: u32,
    /// Elapsed time in milliseconds
    current_time: f32,
    easing: Easing,
    playing: bool,
}

impl<T: Interpolate> Tween<T> {
    /// Create a linear tween; call `start()` to begin playback
    pub fn new(from: T, to: T, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            current_time: 0.0,
            easing: Easing::Linear,
            playing: false,
        }
    }

    /// Set the easing curve (builder pattern)
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start (or restart) from the beginning
    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.playing = true;
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns true once the full duration has elapsed
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f32 {
        self.current_time
    }

    /// Get progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.current_time / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated value
    pub fn value(&self) -> T {
        self.sample_at(self.progress())
    }

    /// Value at a specific progress (0.0 to 1.0)
    pub fn sample_at(&self, progress: f32) -> T {
        let progress = progress.clamp(0.0, 1.0);
        if progress >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.easing.apply(progress))
    }

    /// Advance by delta time (in milliseconds)
    ///
    /// Returns true while the tween is still playing afterwards.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.current_time += dt_ms.max(0.0);

        if self.current_time >= self.duration_ms as f32 {
            self.current_time = self.duration_ms as f32;
            self.playing = false;
            tracing::trace!(duration_ms = self.duration_ms, "tween finished");
        }

        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween_progression() {
        let mut tween = Tween::new(0.0_f32, 240.0, 400);
        tween.start();

        assert_eq!(tween.value(), 0.0);

        assert!(tween.tick(100.0));
        assert!((tween.value() - 60.0).abs() < 1e-4);

        assert!(tween.tick(100.0));
        assert!((tween.progress() - 0.5).abs() < 1e-6);

        assert!(!tween.tick(250.0));
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 240.0);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut tween = Tween::new(0.0_f32, 10.0, 100);
        assert!(!tween.tick(50.0));
        assert_eq!(tween.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut tween = Tween::new(5.0_f32, -5.0, 0);
        tween.start();
        assert!(tween.is_finished());
        assert!(!tween.tick(16.0));
        assert_eq!(tween.value(), -5.0);
    }

    #[test]
    fn test_eased_value_mid_flight() {
        let mut tween = Tween::new(0.0_f32, 100.0, 100).easing(Easing::EaseIn);
        assert!(!tween.is_playing());
        tween.start();
        tween.tick(50.0);
        assert!(tween.is_playing());
        assert!((tween.value() - 25.0).abs() < 1e-4);

        tween.tick(50.0);
        assert!(!tween.is_playing());
        assert_eq!(tween.value(), 100.0);
    }
}
