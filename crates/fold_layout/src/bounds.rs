//! Scroll bounds
//!
//! The maximum offset is biased past the raw content edge by
//! `content mod viewport` so the last items stay reachable as snap targets.

use crate::state::{GeometryState, Viewport};

/// Maximum legal offset for a data set
///
/// Zero when nothing is measured, the data set is empty, or the content
/// fits inside the viewport.
pub fn max_offset(item_count: usize, item_width: i32, item_spacing: i32, viewport_width: i32) -> f32 {
    if item_width <= 0 || item_count == 0 {
        return 0.0;
    }
    let content = (item_width + item_spacing) as i64 * item_count as i64;
    let viewport = viewport_width as i64;
    if content <= viewport {
        return 0.0;
    }
    // viewport > 0 here unless content is negative, which spacing cannot make it
    let remainder = if viewport > 0 { content % viewport } else { 0 };
    (content + remainder - viewport) as f32
}

/// Minimum offset: the leading padding once an item is measured
pub fn min_offset(item_width: Option<i32>, leading_padding: i32) -> i32 {
    match item_width {
        Some(width) if width != 0 => leading_padding,
        _ => 0,
    }
}

/// Offset limits for one pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub max: f32,
}

impl Bounds {
    /// Bounds for the current measurement, data set and viewport
    pub fn compute(state: &GeometryState, item_count: usize, viewport: &Viewport) -> Self {
        let width = state.item_width().unwrap_or(0);
        Self {
            max: max_offset(item_count, width, state.item_spacing(), viewport.width),
        }
    }

    /// Offset ceiling on whole pixels
    pub fn max_px(&self) -> i64 {
        self.max as i64
    }

    /// Decide how much of `delta` this pass may apply
    ///
    /// Reads the offset the pass starts with. At the left bound the offset
    /// snaps to 0, at the right bound to `max`; either way the motion is
    /// reported as not applied.
    pub fn clamp(&self, delta: i32, state: &mut GeometryState) -> i32 {
        if delta < 0 && state.horizontal_offset < 0 {
            state.horizontal_offset = 0;
            0
        } else if state.horizontal_offset as f32 >= self.max {
            state.horizontal_offset = self.max_px();
            0
        } else {
            delta
        }
    }

    /// Pull the offset into `[0, max]`
    pub fn settle(&self, state: &mut GeometryState) {
        state.horizontal_offset = state.horizontal_offset.clamp(0, self.max_px().max(0));
    }

    /// Whether the offset may still move in `direction`
    pub fn can_scroll(&self, offset: i64, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Backward => offset > 0,
            ScrollDirection::Forward => (offset as f32) < self.max,
        }
    }
}

/// Horizontal scroll direction, as queried by the host's fling logic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward index 0 (finger moving right)
    Backward,
    /// Toward the last index (finger moving left)
    Forward,
}

impl ScrollDirection {
    /// Direction of a signed host delta; `None` for zero
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            -1 => Some(ScrollDirection::Backward),
            1 => Some(ScrollDirection::Forward),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(offset: i64) -> GeometryState {
        let mut state = GeometryState::new(40);
        state.set_item_width(200);
        state.horizontal_offset = offset;
        state
    }

    #[test]
    fn test_max_offset_reference_config() {
        // 21 * 240 = 5040; 5040 mod 800 = 240
        assert_eq!(max_offset(21, 200, 40, 800), 4480.0);
    }

    #[test]
    fn test_max_offset_zero_cases() {
        assert_eq!(max_offset(0, 200, 40, 800), 0.0);
        assert_eq!(max_offset(21, 0, 40, 800), 0.0);
        // content exactly fills the viewport
        assert_eq!(max_offset(4, 160, 40, 800), 0.0);
        assert_eq!(max_offset(3, 200, 40, 800), 0.0);
    }

    #[test]
    fn test_min_never_exceeds_max() {
        for count in 0..40 {
            for width in [0, 1, 50, 200, 333] {
                for spacing in [0, 8, 40] {
                    for viewport in [1, 320, 800, 1080] {
                        let max = max_offset(count, width, spacing, viewport);
                        let min = min_offset(Some(width).filter(|w| *w > 0), 0);
                        assert!(min as f32 <= max, "{count} {width} {spacing} {viewport}");
                        let content = (width + spacing) as i64 * count as i64;
                        if content <= viewport as i64 {
                            assert_eq!(max, 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_min_offset_uses_padding_once_measured() {
        assert_eq!(min_offset(None, 24), 0);
        assert_eq!(min_offset(Some(200), 24), 24);
    }

    #[test]
    fn test_clamp_at_left_bound() {
        let bounds = Bounds { max: 4480.0 };
        let mut state = measured(-30);
        assert_eq!(bounds.clamp(-30, &mut state), 0);
        assert_eq!(state.horizontal_offset(), 0);
    }

    #[test]
    fn test_clamp_at_right_bound() {
        let bounds = Bounds { max: 4480.0 };
        let mut state = measured(4500);
        assert_eq!(bounds.clamp(20, &mut state), 0);
        assert_eq!(state.horizontal_offset(), 4480);

        // sitting exactly on the bound also reports no motion
        assert_eq!(bounds.clamp(-10, &mut state), 0);
    }

    #[test]
    fn test_clamp_passes_through_inside_bounds() {
        let bounds = Bounds { max: 4480.0 };
        let mut state = measured(1200);
        assert_eq!(bounds.clamp(-35, &mut state), -35);
        assert_eq!(state.horizontal_offset(), 1200);
    }

    #[test]
    fn test_settle_and_can_scroll() {
        let bounds = Bounds { max: 960.0 };
        let mut state = measured(-3);
        bounds.settle(&mut state);
        assert_eq!(state.horizontal_offset(), 0);
        assert!(!bounds.can_scroll(0, ScrollDirection::Backward));
        assert!(bounds.can_scroll(0, ScrollDirection::Forward));
        assert!(!bounds.can_scroll(960, ScrollDirection::Forward));
        assert_eq!(ScrollDirection::from_delta(-4), Some(ScrollDirection::Backward));
        assert_eq!(ScrollDirection::from_delta(0), None);
    }
}
