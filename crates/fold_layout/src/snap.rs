//! Snap controller
//!
//! After a drag ends the carousel settles on the nearest item. The settle
//! is a linear tween of the offset; at most one is live at a time, held in
//! `AnimationState`.

use fold_animation::{Easing, Tween};

use crate::state::GeometryState;

/// Index the offset should settle on
///
/// Rounds half up to the next cell when one exists. `None` until an item
/// has been measured or when the data set is empty.
pub fn nearest_index(state: &GeometryState, item_count: usize) -> Option<usize> {
    let stride = state.cell_stride()? as i64;
    if item_count == 0 || stride <= 0 {
        return None;
    }
    let offset = state.horizontal_offset().abs();
    let position = (offset / stride) as usize;
    let remainder = offset % stride;

    if remainder as f32 >= stride as f32 / 2.0 && position + 1 <= item_count - 1 {
        return Some(position + 1);
    }
    Some(position.min(item_count - 1))
}

/// Offset change that brings `index` to the leading edge
///
/// Targets past the bounds settle on the boundary instead.
pub fn target_delta(state: &GeometryState, index: usize, max_offset: f32) -> Option<f32> {
    let stride = state.cell_stride()? as i64;
    let target = index as i64 * stride;
    let offset = state.horizontal_offset() as f32;
    if target as f32 > max_offset {
        Some(max_offset - offset)
    } else {
        Some(target as f32 - offset)
    }
}

/// Duration range for distance-adaptive snapping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapTiming {
    /// Duration of a zero-distance snap (ms)
    pub min_ms: u32,
    /// Duration of exactly one cell of travel (ms)
    pub max_ms: u32,
}

impl Default for SnapTiming {
    fn default() -> Self {
        Self {
            min_ms: 200,
            max_ms: 600,
        }
    }
}

impl SnapTiming {
    /// Duration for travelling `delta` with cells of `stride`
    ///
    /// Ramps linearly from `min_ms` to `max_ms` up to one cell, then grows
    /// proportionally without an upper bound. An inverted range (`min_ms`
    /// above `max_ms`) holds at `min_ms` for the first cell.
    pub fn duration_ms(&self, delta: f32, stride: i32) -> u32 {
        if stride <= 0 {
            return self.min_ms;
        }
        let distance = delta.abs();
        let fraction = distance / stride as f32;
        if distance <= stride as f32 {
            let ramp = self.max_ms.saturating_sub(self.min_ms);
            (self.min_ms as f32 + ramp as f32 * fraction) as u32
        } else {
            (self.max_ms as f32 * fraction) as u32
        }
    }
}

/// Callback fired once when a snap animation completes
pub type SnapCallback = Box<dyn FnOnce()>;

/// A running settle toward a target offset
pub struct SnapAnimation {
    start_offset: i64,
    delta: f32,
    tween: Tween<f32>,
    on_complete: Option<SnapCallback>,
}

/// One animation frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapFrame {
    /// Offset for this frame
    pub offset: i64,
    /// True on the frame that reaches the target
    pub finished: bool,
}

impl SnapAnimation {
    pub fn new(
        start_offset: i64,
        delta: f32,
        duration_ms: u32,
        easing: Easing,
        on_complete: Option<SnapCallback>,
    ) -> Self {
        let mut tween = Tween::new(0.0, delta, duration_ms).easing(easing);
        tween.start();
        Self {
            start_offset,
            delta,
            tween,
            on_complete,
        }
    }

    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }

    /// Total offset change
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn target_offset(&self) -> i64 {
        Self::offset_at(self.start_offset, self.delta)
    }

    pub fn duration_ms(&self) -> u32 {
        self.tween.duration_ms()
    }

    pub fn elapsed_fraction(&self) -> f32 {
        self.tween.progress()
    }

    /// Advance by `dt_ms` and report the offset to lay out
    pub fn tick(&mut self, dt_ms: f32) -> SnapFrame {
        self.tween.tick(dt_ms);
        SnapFrame {
            offset: Self::offset_at(self.start_offset, self.tween.value()),
            finished: self.tween.is_finished(),
        }
    }

    /// Consume the animation, firing its callback
    pub fn complete(mut self) {
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }

    fn offset_at(start: i64, value: f32) -> i64 {
        (start as f64 + value as f64) as i64
    }
}

impl std::fmt::Debug for SnapAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapAnimation")
            .field("start_offset", &self.start_offset)
            .field("delta", &self.delta)
            .field("duration_ms", &self.tween.duration_ms())
            .field("elapsed_fraction", &self.tween.progress())
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Snap animation FSM
#[derive(Debug, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating(SnapAnimation),
}

impl AnimationState {
    pub fn is_animating(&self) -> bool {
        matches!(self, AnimationState::Animating(_))
    }

    pub fn animation(&self) -> Option<&SnapAnimation> {
        match self {
            AnimationState::Animating(animation) => Some(animation),
            AnimationState::Idle => None,
        }
    }

    /// Replace any live animation
    pub fn start(&mut self, animation: SnapAnimation) {
        if self.cancel() {
            tracing::debug!("replaced a running snap animation");
        }
        *self = AnimationState::Animating(animation);
    }

    /// Drop the live animation without firing its callback
    ///
    /// Cancellation is not a completion: the callback is dropped uncalled,
    /// so only an animation that reaches its target ever reports back.
    /// Returns true if one was running. Safe to call in any state.
    pub fn cancel(&mut self) -> bool {
        matches!(
            std::mem::take(self),
            AnimationState::Animating(_)
        )
    }

    /// Advance the live animation
    ///
    /// Returns the frame and, once finished, the animation itself so the
    /// caller can lay out the last frame before completing it.
    pub fn tick(&mut self, dt_ms: f32) -> Option<(SnapFrame, Option<SnapAnimation>)> {
        let AnimationState::Animating(animation) = self else {
            return None;
        };
        let frame = animation.tick(dt_ms);
        if !frame.finished {
            return Some((frame, None));
        }
        match std::mem::take(self) {
            AnimationState::Animating(animation) => Some((frame, Some(animation))),
            AnimationState::Idle => Some((frame, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn at_offset(offset: i64) -> GeometryState {
        let mut state = GeometryState::new(40);
        state.set_item_width(200);
        state.horizontal_offset = offset;
        state
    }

    #[test]
    fn test_nearest_index_rounds_half_up() {
        // remainder 130 >= 120
        assert_eq!(nearest_index(&at_offset(2 * 240 + 130), 21), Some(3));
        // remainder exactly half
        assert_eq!(nearest_index(&at_offset(2 * 240 + 120), 21), Some(3));
        assert_eq!(nearest_index(&at_offset(2 * 240 + 119), 21), Some(2));
        assert_eq!(nearest_index(&at_offset(0), 21), Some(0));
    }

    #[test]
    fn test_nearest_index_stays_in_range() {
        // past the last index the position is capped
        assert_eq!(nearest_index(&at_offset(20 * 240 + 200), 21), Some(20));
        assert_eq!(nearest_index(&at_offset(9 * 240), 3), Some(2));
        assert_eq!(nearest_index(&at_offset(0), 0), None);
        assert_eq!(nearest_index(&GeometryState::new(40), 21), None);
    }

    #[test]
    fn test_nearest_index_is_monotonic() {
        let mut previous = 0;
        for offset in 0..=4480 {
            let index = nearest_index(&at_offset(offset), 21).unwrap();
            assert!(index >= previous, "offset {offset}");
            assert!(index <= 20);
            previous = index;
        }
    }

    #[test]
    fn test_target_delta_clamps_to_bounds() {
        let state = at_offset(1000);
        assert_eq!(target_delta(&state, 5, 4480.0), Some(200.0));
        assert_eq!(target_delta(&state, 4, 4480.0), Some(-40.0));
        assert_eq!(target_delta(&state, 20, 4480.0), Some(3480.0));
        assert_eq!(target_delta(&GeometryState::new(40), 1, 4480.0), None);
    }

    #[test]
    fn test_duration_ramp() {
        let timing = SnapTiming::default();
        assert_eq!(timing.duration_ms(0.0, 240), 200);
        assert_eq!(timing.duration_ms(120.0, 240), 400);
        assert_eq!(timing.duration_ms(-60.0, 240), 300);
        // both formulas agree at exactly one cell
        assert_eq!(timing.duration_ms(240.0, 240), 600);
        assert_eq!(timing.duration_ms(-240.0, 240), 600);
        assert_eq!(timing.duration_ms(720.0, 240), 1800);
    }

    #[test]
    fn test_inverted_duration_range() {
        let timing = SnapTiming {
            min_ms: 700,
            max_ms: 600,
        };
        assert_eq!(timing.duration_ms(0.0, 240), 700);
        assert_eq!(timing.duration_ms(240.0, 240), 700);
        assert_eq!(timing.duration_ms(480.0, 240), 1200);
    }

    #[test]
    fn test_animation_reaches_target_and_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut state = AnimationState::default();
        state.start(SnapAnimation::new(
            1000,
            200.0,
            400,
            Easing::Linear,
            Some(Box::new(move || counter.set(counter.get() + 1))),
        ));

        let (frame, done) = state.tick(100.0).unwrap();
        assert_eq!(frame.offset, 1050);
        assert!(done.is_none());

        let (frame, done) = state.tick(400.0).unwrap();
        assert_eq!(frame.offset, 1200);
        assert!(frame.finished);
        done.unwrap().complete();

        assert_eq!(fired.get(), 1);
        assert!(!state.is_animating());
        assert!(state.tick(16.0).is_none());
    }

    #[test]
    fn test_cancel_drops_callback() {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let mut state = AnimationState::default();
        state.start(SnapAnimation::new(
            0,
            240.0,
            600,
            Easing::Linear,
            Some(Box::new(move || flag.set(true))),
        ));

        assert!(state.cancel());
        assert!(!state.cancel());
        assert!(!fired.get());
    }

    #[test]
    fn test_start_replaces_live_animation() {
        let mut state = AnimationState::default();
        state.start(SnapAnimation::new(0, 240.0, 600, Easing::Linear, None));
        state.start(SnapAnimation::new(0, -40.0, 216, Easing::Linear, None));

        let animation = state.animation().unwrap();
        assert_eq!(animation.target_offset(), -40);
        assert_eq!(animation.duration_ms(), 216);
    }
}
