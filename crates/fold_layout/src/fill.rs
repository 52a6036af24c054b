//! Fill engine
//!
//! One pass re-lays the whole visible window:
//!
//! 1. clamp the delta against the bounds
//! 2. treat everything laid out so far as scrap
//! 3. measure one item if the width is unknown or stale
//! 4. derive the first visible index and sub-cell fraction from the offset
//! 5. walk forward placing items until the draw cursor leaves the viewport
//! 6. release scrap that was not reused
//!
//! The engine takes a `GeometryState` by value and returns the next one in
//! `FillOutcome`. On error every instance fetched during the pass has been
//! released again and the caller still owns the previous state and items.

use fold_core::PixelRect;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::bounds::Bounds;
use crate::error::Result;
use crate::recycler::{DrawSlot, ItemRecycler, Measurement};
use crate::state::{GeometryState, Viewport};
use crate::transform::{fold, FoldInput, FoldVisual, TransformAnchor};

/// An item laid out by the last successful pass
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleItem<H> {
    pub index: usize,
    pub handle: H,
    pub visual: FoldVisual,
    /// Position in the draw list, 0 = painted first (bottom)
    pub z_order: usize,
}

impl<H> VisibleItem<H> {
    pub fn rect(&self) -> PixelRect {
        self.visual.rect
    }

    pub fn scale(&self) -> f32 {
        self.visual.scale
    }

    pub fn opacity(&self) -> f32 {
        self.visual.opacity
    }

    pub fn anchor(&self) -> TransformAnchor {
        self.visual.anchor
    }
}

/// Result of a successful pass
#[derive(Debug)]
pub struct FillOutcome<H> {
    /// Next geometry state
    pub state: GeometryState,
    /// Portion of the requested delta the pass applied
    pub applied: i32,
    /// Items now on screen, in index order
    pub items: Vec<VisibleItem<H>>,
}

/// Items from the previous pass, reusable by index before fetching anew
struct Scrap<'s, H> {
    items: &'s [VisibleItem<H>],
    taken: SmallVec<[bool; 16]>,
    /// Handles fetched during this pass, released if the pass fails
    fresh: Vec<H>,
}

impl<'s, H: Clone> Scrap<'s, H> {
    fn new(items: &'s [VisibleItem<H>]) -> Self {
        Self {
            items,
            taken: SmallVec::from_elem(false, items.len()),
            fresh: Vec::new(),
        }
    }

    fn obtain<R>(&mut self, recycler: &mut R, index: usize) -> Result<H>
    where
        R: ItemRecycler<Handle = H>,
    {
        let taken = &self.taken;
        let reusable = self
            .items
            .iter()
            .enumerate()
            .position(|(slot, item)| item.index == index && !taken[slot]);

        if let Some(slot) = reusable {
            self.taken[slot] = true;
            return Ok(self.items[slot].handle.clone());
        }

        let handle = recycler.fetch(index)?;
        self.fresh.push(handle.clone());
        Ok(handle)
    }

    fn release_unused<R>(self, recycler: &mut R)
    where
        R: ItemRecycler<Handle = H>,
    {
        for (item, taken) in self.items.iter().zip(self.taken.iter()) {
            if !taken {
                recycler.release(item.handle.clone());
            }
        }
    }

    fn discard_fresh<R>(self, recycler: &mut R)
    where
        R: ItemRecycler<Handle = H>,
    {
        for handle in self.fresh {
            recycler.release(handle);
        }
    }
}

/// Runs layout passes against a recycler
pub struct FillEngine<'a, R: ItemRecycler> {
    recycler: &'a mut R,
    viewport: Viewport,
}

impl<'a, R: ItemRecycler> FillEngine<'a, R> {
    pub fn new(recycler: &'a mut R, viewport: Viewport) -> Self {
        Self { recycler, viewport }
    }

    /// Run one pass
    ///
    /// `scrap` is the item list of the previous pass; the caller must have
    /// detached those items already. On success the unused ones are
    /// released here. On error they are left untouched.
    pub fn fill(
        &mut self,
        state: GeometryState,
        delta: i32,
        item_count: usize,
        scrap: &[VisibleItem<R::Handle>],
    ) -> Result<FillOutcome<R::Handle>> {
        let mut scrap = Scrap::new(scrap);
        match self.fill_window(state, delta, item_count, &mut scrap) {
            Ok(outcome) => {
                scrap.release_unused(self.recycler);
                Ok(outcome)
            }
            Err(err) => {
                scrap.discard_fresh(self.recycler);
                Err(err)
            }
        }
    }

    fn fill_window(
        &mut self,
        mut state: GeometryState,
        delta: i32,
        item_count: usize,
        scrap: &mut Scrap<'_, R::Handle>,
    ) -> Result<FillOutcome<R::Handle>> {
        let bounds = Bounds::compute(&state, item_count, &self.viewport);
        let applied = bounds.clamp(delta, &mut state);
        bounds.settle(&mut state);

        let walk_start = state.walk_start();
        if walk_start >= item_count {
            debug!(walk_start, item_count, "first visible index past the data set");
            return Ok(FillOutcome {
                state,
                applied: delta,
                items: Vec::new(),
            });
        }

        let mut measured: Option<(usize, R::Handle, Measurement)> = None;
        if state.needs_measure() {
            let handle = scrap.obtain(self.recycler, walk_start)?;
            let measurement = self.recycler.measure(&handle)?;
            let width = measurement.decorated_width();
            if width <= 0 {
                debug!(width, "item measured without width, geometry stays unmeasured");
                self.recycler.release(handle);
                state.item_width = None;
                return Ok(FillOutcome {
                    state,
                    applied: 0,
                    items: Vec::new(),
                });
            }
            state.set_item_width(width);
            // a new width moves the right bound
            Bounds::compute(&state, item_count, &self.viewport).settle(&mut state);
            measured = Some((walk_start, handle, measurement));
        }
        let Some(item_width) = state.item_width() else {
            return Ok(FillOutcome {
                state,
                applied: 0,
                items: Vec::new(),
            });
        };

        let spacing = state.item_spacing();
        let stride = item_width + spacing;
        let offset = state.horizontal_offset();
        let leading = self.viewport.leading_padding();

        let pending = state.pending_index.take();
        let jump = pending
            .filter(|&index| index < item_count && state.aligned_offset(index) == Some(offset));
        if pending.is_some() && jump.is_none() {
            debug!(?pending, offset, "pending index did not land, deriving window from offset");
        }

        // (first index, fraction, walk origin, stride the fraction is taken over)
        let (first, fraction, origin, fraction_stride) = if let Some(index) = jump {
            (index, 0.0, leading, stride)
        } else if offset < item_width as i64 {
            let fraction = (offset.abs() % item_width as i64) as f32 / item_width as f32;
            (0, fraction, leading, item_width)
        } else {
            let past = (offset - item_width as i64).abs();
            let first = (past / stride as i64) as usize + 1;
            let fraction = (past % stride as i64) as f32 / stride as f32;
            (first, fraction, leading + spacing, stride)
        };
        let first = first.min(item_count - 1);

        let focus = (offset.abs() / stride as i64) as usize;
        let limit = self.viewport.width - self.viewport.trailing_padding();
        let top = self.viewport.padding.top;
        let mut cursor = origin - (fraction_stride as f32 * fraction) as i32;
        let mut last = item_count - 1;

        let mut items: Vec<VisibleItem<R::Handle>> = Vec::new();
        let mut draw_order: SmallVec<[usize; 8]> = SmallVec::new();

        for index in first..item_count {
            let (handle, measurement) = match measured.take() {
                Some((measured_index, handle, measurement)) if measured_index == index => {
                    (handle, measurement)
                }
                unused => {
                    measured = unused;
                    let handle = scrap.obtain(self.recycler, index)?;
                    let measurement = self.recycler.measure(&handle)?;
                    (handle, measurement)
                }
            };

            let slot = if index <= focus {
                DrawSlot::Top
            } else {
                DrawSlot::BehindFirst
            };
            self.recycler.attach(&handle, slot)?;
            draw_order.insert(slot.position(draw_order.len()), items.len());

            let rect = PixelRect::from_origin_size(
                cursor,
                top,
                measurement.decorated_width(),
                measurement.decorated_height(),
            );
            let visual = fold(&FoldInput {
                index,
                first_visible_index: first,
                rect,
                content_width: measurement.width,
                content_height: measurement.height,
                item_width,
                item_spacing: spacing,
                leading_padding: leading,
                viewport_width: self.viewport.width,
            });
            self.recycler.place(&handle, visual.rect)?;
            self.recycler.set_visual(&handle, &visual)?;
            trace!(
                index,
                left = visual.rect.left,
                scale = visual.scale,
                opacity = visual.opacity,
                edge = ?visual.edge,
                "laid out item"
            );

            items.push(VisibleItem {
                index,
                handle,
                visual,
                z_order: 0,
            });

            cursor += stride;
            if cursor > limit {
                last = index;
                break;
            }
        }

        for (z_order, &slot) in draw_order.iter().enumerate() {
            items[slot].z_order = z_order;
        }

        // Measured for the width only; the walk started elsewhere.
        if let Some((_, handle, _)) = measured {
            self.recycler.release(handle);
        }

        state.first_visible_index = Some(first);
        state.last_visible_index = Some(last);
        state.sub_cell_fraction = fraction;

        Ok(FillOutcome {
            state,
            applied,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::recycler::{ItemHandle, MemoryRecycler};
    use crate::transform::{FoldEdge, TRAILING_OPACITY};

    const COUNT: usize = 21;

    fn recycler() -> MemoryRecycler {
        MemoryRecycler::new(Measurement::new(200, 300))
    }

    fn viewport() -> Viewport {
        Viewport::new(800, 400)
    }

    fn at_offset(offset: i64) -> GeometryState {
        let mut state = GeometryState::new(40);
        state.set_item_width(200);
        state.horizontal_offset = offset;
        state
    }

    fn run(
        recycler: &mut MemoryRecycler,
        state: GeometryState,
        scrap: &[VisibleItem<ItemHandle>],
    ) -> FillOutcome<ItemHandle> {
        FillEngine::new(recycler, viewport())
            .fill(state, 0, COUNT, scrap)
            .unwrap()
    }

    fn indices(items: &[VisibleItem<ItemHandle>]) -> Vec<usize> {
        items.iter().map(|item| item.index).collect()
    }

    #[test]
    fn test_first_pass_measures_and_fills() {
        let mut recycler = recycler();
        let outcome = run(&mut recycler, GeometryState::new(40), &[]);

        assert_eq!(outcome.state.item_width(), Some(200));
        assert_eq!(outcome.state.cell_stride(), Some(240));
        assert_eq!(outcome.state.first_visible_index(), Some(0));
        assert_eq!(outcome.state.last_visible_index(), Some(3));
        assert_eq!(indices(&outcome.items), vec![0, 1, 2, 3]);

        // the measuring instance was reused, nothing leaked
        assert_eq!(recycler.created(), 4);
        assert_eq!(recycler.outstanding(), 4);

        let lead = &outcome.items[0];
        assert_eq!(lead.rect(), PixelRect::new(0, 0, 200, 300));
        assert_eq!(lead.scale(), 1.0);
        assert_eq!(lead.opacity(), 1.0);

        let trailing = &outcome.items[3];
        assert_eq!(trailing.visual.edge, FoldEdge::Trailing);
        assert_eq!(trailing.rect(), PixelRect::new(600, 0, 800, 300));
        assert_eq!(trailing.opacity(), TRAILING_OPACITY);

        // the host saw exactly what the pass reports
        for item in &outcome.items {
            let applied = recycler.applied(item.handle.id).unwrap();
            assert_eq!(applied.index, item.index);
            assert_eq!(applied.rect, item.rect());
            assert_eq!(applied.visual, Some(item.visual));
        }
    }

    #[test]
    fn test_narrower_measurement_resettles_offset() {
        let mut recycler = MemoryRecycler::new(Measurement::new(100, 300));
        let mut state = at_offset(4480);
        state.invalidate_measurement();
        let outcome = run(&mut recycler, state, &[]);

        // 21 cells of 140 give a right bound of 2680
        assert_eq!(outcome.state.item_width(), Some(100));
        assert_eq!(outcome.state.horizontal_offset(), 2680);
        assert_eq!(outcome.state.first_visible_index(), Some(19));
        assert_eq!(indices(&outcome.items), vec![19, 20]);
        // the instance measured at the old walk start went back to the pool
        assert_eq!(recycler.outstanding(), 2);
    }

    #[test]
    fn test_revealing_first_item() {
        let mut recycler = recycler();
        let outcome = run(&mut recycler, at_offset(150), &[]);

        assert_eq!(outcome.state.first_visible_index(), Some(0));
        assert!((outcome.state.sub_cell_fraction() - 0.75).abs() < 1e-6);

        let lead = &outcome.items[0];
        assert_eq!(lead.visual.edge, FoldEdge::Leading);
        assert!(lead.scale() < 1.0);
        // the second item starts one stride after the shifted cursor
        assert_eq!(outcome.items[1].rect().left, 90);
    }

    #[test]
    fn test_steady_regime_advances_window() {
        let mut recycler = recycler();
        // 1000 - 200 = 800 = 3 strides + 80
        let outcome = run(&mut recycler, at_offset(1000), &[]);

        assert_eq!(outcome.state.first_visible_index(), Some(4));
        assert!((outcome.state.sub_cell_fraction() - 80.0 / 240.0).abs() < 1e-6);
        assert_eq!(outcome.items[0].index, 4);
        assert_eq!(outcome.items[0].visual.edge, FoldEdge::Leading);
    }

    #[test]
    fn test_aligned_offset_puts_item_at_leading_edge() {
        let mut recycler = recycler();
        let outcome = run(&mut recycler, at_offset(5 * 240), &[]);

        assert_eq!(outcome.state.first_visible_index(), Some(5));
        let lead = &outcome.items[0];
        assert_eq!(lead.rect().left, 0);
        assert_eq!(lead.visual.edge, FoldEdge::None);
    }

    #[test]
    fn test_draw_order_puts_focus_on_top_of_followers() {
        let mut recycler = recycler();
        let outcome = run(&mut recycler, at_offset(0), &[]);

        // focus 0 at the bottom, each follower slides under its left neighbour
        assert_eq!(recycler.draw_order(), vec![0, 3, 2, 1]);
        let z: Vec<usize> = outcome.items.iter().map(|item| item.z_order).collect();
        assert_eq!(z, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_scrap_is_reused_and_surplus_released() {
        let mut recycler = recycler();
        let first = run(&mut recycler, at_offset(0), &[]);

        let second = run(&mut recycler, at_offset(480), &first.items);
        assert_eq!(indices(&second.items), vec![2, 3, 4, 5]);

        // items 2 and 3 kept their instances, 0 and 1 went back to the pool
        assert_eq!(second.items[0].handle.id, first.items[2].handle.id);
        assert_eq!(second.items[1].handle.id, first.items[3].handle.id);
        assert_eq!(recycler.outstanding(), 4);

        // the next pass binds 6 and 7 to the pooled instances
        let created = recycler.created();
        let third = run(&mut recycler, at_offset(960), &second.items);
        assert_eq!(indices(&third.items), vec![4, 5, 6, 7]);
        assert_eq!(recycler.created(), created);
        assert_eq!(recycler.outstanding(), 4);
    }

    #[test]
    fn test_clamp_reports_no_motion_at_right_bound() {
        let mut recycler = recycler();
        let outcome = FillEngine::new(&mut recycler, viewport())
            .fill(at_offset(4600), 120, COUNT, &[])
            .unwrap();

        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.state.horizontal_offset(), 4480);
        assert_eq!(outcome.state.last_visible_index(), Some(COUNT - 1));
    }

    #[test]
    fn test_walk_start_past_data_set_aborts() {
        let mut recycler = recycler();
        let mut state = at_offset(0);
        state.first_visible_index = Some(30);

        let outcome = FillEngine::new(&mut recycler, viewport())
            .fill(state, 7, COUNT, &[])
            .unwrap();
        assert_eq!(outcome.applied, 7);
        assert!(outcome.items.is_empty());
        assert_eq!(recycler.outstanding(), 0);
    }

    #[test]
    fn test_zero_width_measurement_stays_unmeasured() {
        let mut recycler = MemoryRecycler::new(Measurement::new(0, 300));
        let outcome = FillEngine::new(&mut recycler, viewport())
            .fill(GeometryState::new(40), 25, COUNT, &[])
            .unwrap();

        assert_eq!(outcome.applied, 0);
        assert!(!outcome.state.is_measured());
        assert_eq!(recycler.outstanding(), 0);
    }

    #[test]
    fn test_failure_releases_fresh_instances_only() {
        let mut recycler = recycler();
        let first = run(&mut recycler, at_offset(0), &[]);
        recycler.fail_fetch_at(Some(5));

        let result =
            FillEngine::new(&mut recycler, viewport()).fill(at_offset(480), 0, COUNT, &first.items);
        assert!(matches!(result, Err(LayoutError::Fetch { index: 5, .. })));

        // previous instances are still live, the fresh item 4 went back
        assert_eq!(recycler.outstanding(), first.items.len());
    }

    #[test]
    fn test_pending_index_on_aligned_offset() {
        let mut recycler = recycler();
        let mut state = at_offset(7 * 240);
        state.pending_index = Some(7);

        let outcome = run(&mut recycler, state, &[]);
        assert_eq!(outcome.state.pending_index(), None);
        assert_eq!(outcome.state.first_visible_index(), Some(7));
        assert_eq!(outcome.state.sub_cell_fraction(), 0.0);
        assert_eq!(outcome.items[0].rect().left, 0);
    }

    #[test]
    fn test_pending_index_off_target_is_dropped() {
        let mut recycler = recycler();
        let mut state = at_offset(1000);
        state.pending_index = Some(12);

        let outcome = run(&mut recycler, state, &[]);
        assert_eq!(outcome.state.pending_index(), None);
        assert_eq!(outcome.state.first_visible_index(), Some(4));
    }

    #[test]
    fn test_padding_shifts_walk_and_limit() {
        let mut recycler = recycler();
        let viewport = Viewport::new(800, 400).with_padding(fold_core::EdgeInsets::new(24, 8, 24, 8));
        let outcome = FillEngine::new(&mut recycler, viewport)
            .fill(at_offset(0), 0, COUNT, &[])
            .unwrap();

        assert_eq!(outcome.items[0].rect(), PixelRect::new(24, 8, 224, 308));
        // cursor after item 2 is 744, not past 776; item 3 ends the walk
        assert_eq!(outcome.state.last_visible_index(), Some(3));
    }
}
