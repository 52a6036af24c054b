//! Pending jumps
//!
//! `request_index` does not move anything by itself. It records the target
//! and the next pass turns it into a one-off synthetic scroll delta that
//! replaces whatever delta the host supplied.

use crate::state::GeometryState;

/// Offset change that lands the pending index at the leading edge
///
/// `None` when nothing is pending or no item has been measured yet.
pub fn synthetic_delta(state: &GeometryState) -> Option<i64> {
    let index = state.pending_index()?;
    let stride = state.cell_stride()? as i64;
    let offset = state.horizontal_offset();

    if index == 0 {
        return Some(-offset);
    }

    let first = state.walk_start() as i64;
    // how far the offset sits past the first visible item's aligned position
    let sub_cell_offset = offset - first * stride;
    Some(-(first - index as i64) * stride - sub_cell_offset)
}

/// Whether `index` names an item of a data set with `item_count` entries
pub fn is_valid_index(index: usize, item_count: usize) -> bool {
    index < item_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(offset: i64, first: usize, pending: Option<usize>) -> GeometryState {
        let mut state = GeometryState::new(40);
        state.set_item_width(200);
        state.horizontal_offset = offset;
        state.first_visible_index = Some(first);
        state.pending_index = pending;
        state
    }

    #[test]
    fn test_index_zero_rewinds_whole_offset() {
        assert_eq!(synthetic_delta(&state(1000, 4, Some(0))), Some(-1000));
    }

    #[test]
    fn test_forward_and_backward_jumps() {
        // first 4 at 960, 40px past it
        assert_eq!(synthetic_delta(&state(1000, 4, Some(7))), Some(680));
        assert_eq!(synthetic_delta(&state(1000, 4, Some(2))), Some(-520));
        // already aligned on the target
        assert_eq!(synthetic_delta(&state(960, 4, Some(4))), Some(0));
    }

    #[test]
    fn test_lands_on_aligned_offset() {
        for (offset, first) in [(0, 0), (150, 0), (1000, 4), (3333, 14)] {
            for index in [1, 5, 13, 20] {
                let s = state(offset, first, Some(index));
                let delta = synthetic_delta(&s).unwrap();
                assert_eq!(Some(offset + delta), s.aligned_offset(index));
            }
        }
    }

    #[test]
    fn test_nothing_without_request_or_measurement() {
        assert_eq!(synthetic_delta(&state(1000, 4, None)), None);

        let mut unmeasured = GeometryState::new(40);
        unmeasured.pending_index = Some(3);
        assert_eq!(synthetic_delta(&unmeasured), None);
    }

    #[test]
    fn test_index_validation() {
        assert!(is_valid_index(0, 1));
        assert!(is_valid_index(20, 21));
        assert!(!is_valid_index(21, 21));
        assert!(!is_valid_index(0, 0));
    }
}
