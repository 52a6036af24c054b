//! Fold Animation System
//!
//! Time-driven tweens used by the carousel snap controller.
//!
//! # Features
//!
//! - **Tweens**: fixed-duration interpolation between two values, advanced
//!   by the host's frame delta
//! - **Easing**: named curves, selectable from configuration
//! - **Typed values**: any `Interpolate` type can be tweened

pub mod easing;
pub mod tween;
pub mod values;

pub use easing::Easing;
pub use tween::Tween;
pub use values::Interpolate;
