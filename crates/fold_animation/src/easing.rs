//! Easing curves
//!
//! Maps linear progress in `[0, 1]` to eased progress. The snap animation
//! is linear by default; the other curves are available to hosts that
//! configure a different feel.

use serde::{Deserialize, Serialize};

/// Easing function applied to tween progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant velocity
    #[default]
    Linear,
    /// Quadratic acceleration from rest
    EaseIn,
    /// Quadratic deceleration to rest
    EaseOut,
    /// Quadratic acceleration then deceleration
    EaseInOut,
    /// Cubic deceleration to rest
    EaseOutCubic,
}

impl Easing {
    /// Apply the curve to `t`, clamped to `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}
