//! Fold carousel
//!
//! `FoldCarousel` is what the host talks to. It owns the injected recycler,
//! the geometry state, the items of the last pass and the snap animation,
//! and turns host callbacks (layout, scroll deltas, drag phase changes,
//! frame ticks) into fill passes.
//!
//! Every pass runs on a copy of the geometry state. The copy is committed
//! only when the pass succeeds; a failing pass is logged and the previous
//! frame is put back on screen unchanged.

use fold_core::{ScrollPhase, StateTransitions};
use tracing::{debug, trace, warn};

use crate::bounds::{Bounds, ScrollDirection};
use crate::config::CarouselConfig;
use crate::fill::{FillEngine, VisibleItem};
use crate::jump;
use crate::recycler::{DrawSlot, ItemRecycler};
use crate::snap::{self, AnimationState, SnapAnimation, SnapCallback};
use crate::state::{GeometryState, Viewport};

/// Horizontal folding-card carousel over a host recycler
pub struct FoldCarousel<R: ItemRecycler> {
    config: CarouselConfig,
    viewport: Viewport,
    recycler: R,
    state: GeometryState,
    items: Vec<VisibleItem<R::Handle>>,
    animation: AnimationState,
    phase: ScrollPhase,
    /// Data set size seen by the last pass
    item_count: usize,
    needs_layout: bool,
}

impl<R: ItemRecycler> FoldCarousel<R> {
    pub fn new(config: CarouselConfig, viewport: Viewport, recycler: R) -> Self {
        let state = GeometryState::new(config.item_spacing_px());
        Self {
            config,
            viewport,
            recycler,
            state,
            items: Vec::new(),
            animation: AnimationState::Idle,
            phase: ScrollPhase::Idle,
            item_count: 0,
            needs_layout: true,
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the container geometry; takes effect on the next layout
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.needs_layout = true;
        }
    }

    pub fn state(&self) -> &GeometryState {
        &self.state
    }

    /// Items on screen after the last successful pass, in index order
    pub fn visible_items(&self) -> &[VisibleItem<R::Handle>] {
        &self.items
    }

    pub fn recycler(&self) -> &R {
        &self.recycler
    }

    pub fn recycler_mut(&mut self) -> &mut R {
        &mut self.recycler
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    pub fn snap_animation(&self) -> Option<&SnapAnimation> {
        self.animation.animation()
    }

    /// True when a request is waiting for the host to call `layout`
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Read and clear the layout request flag
    pub fn take_needs_layout(&mut self) -> bool {
        std::mem::take(&mut self.needs_layout)
    }

    // ========================================================================
    // Host callbacks
    // ========================================================================

    /// Full layout pass
    ///
    /// Re-measures, applies any pending jump, and refills the window at the
    /// current offset. An empty data set releases everything and resets.
    pub fn layout(&mut self, item_count: usize) {
        self.needs_layout = false;
        self.item_count = item_count;

        if item_count == 0 {
            debug!("empty data set, resetting carousel");
            self.detach_all();
            self.state.reset();
            return;
        }

        self.layout_from(self.state, item_count);
    }

    /// Apply a horizontal scroll delta and report how much was consumed
    ///
    /// A pending jump replaces `delta` for this pass.
    pub fn consume_scroll_delta(&mut self, delta: i32, item_count: usize) -> i32 {
        self.item_count = item_count;

        let dx = match jump::synthetic_delta(&self.state) {
            Some(synthetic) => {
                debug!(synthetic, dropped = delta, "pending index overrides scroll delta");
                synthetic
            }
            None => delta as i64,
        };
        // a pending index left here is applied by the next layout
        if dx == 0 || self.items.is_empty() || !self.state.is_measured() {
            return 0;
        }

        let bounds = Bounds::compute(&self.state, item_count, &self.viewport);
        if dx > 0 && self.state.horizontal_offset() as f32 > bounds.max {
            return 0;
        }

        let mut next = self.state;
        next.horizontal_offset += dx;
        self.run_fill(next, saturating_i32(dx), item_count)
    }

    /// Host drag/idle notification
    ///
    /// A drag start cancels the snap animation; coming to rest snaps to the
    /// nearest item. Repeated reports of the same phase are ignored.
    pub fn on_scroll_state_changed(&mut self, phase: ScrollPhase, item_count: usize) {
        self.item_count = item_count;

        let Some(next) = self.phase.on_event(phase.entry_event()) else {
            trace!(?phase, current = ?self.phase, "no phase transition");
            return;
        };
        debug!(from = ?self.phase, to = ?next, "scroll phase changed");
        self.phase = next;

        match next {
            ScrollPhase::Dragging => {
                if self.animation.cancel() {
                    debug!("drag cancelled snap animation");
                }
            }
            ScrollPhase::Idle => {
                if let Some(index) = snap::nearest_index(&self.state, item_count) {
                    self.animate_to_index(index, item_count, None, None);
                }
            }
            ScrollPhase::Settling => {}
        }
    }

    /// Advance the snap animation by one frame
    ///
    /// Lays out the new offset and returns true while the animation is still
    /// running. The completion callback fires on the final frame.
    pub fn tick(&mut self, dt_ms: f32, item_count: usize) -> bool {
        let Some((frame, finished)) = self.animation.tick(dt_ms) else {
            return false;
        };
        self.item_count = item_count;

        let mut next = self.state;
        next.horizontal_offset = frame.offset;
        self.layout_from(next, item_count);

        match finished {
            Some(animation) => {
                debug!(offset = frame.offset, "snap animation finished");
                animation.complete();
                false
            }
            None => true,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Jump to `index` on the next pass without animating
    pub fn request_index(&mut self, index: usize, item_count: usize) {
        if !jump::is_valid_index(index, item_count) {
            debug!(index, item_count, "ignoring jump to index out of range");
            return;
        }
        if self.animation.cancel() {
            debug!("jump request cancelled snap animation");
        }
        self.state.pending_index = Some(index);
        self.needs_layout = true;
    }

    /// Animate until `index` sits at the leading edge
    ///
    /// Without an explicit duration the length adapts to the distance.
    /// Returns false when the request was ignored.
    pub fn animate_to_index(
        &mut self,
        index: usize,
        item_count: usize,
        duration_ms: Option<u32>,
        on_complete: Option<SnapCallback>,
    ) -> bool {
        if !jump::is_valid_index(index, item_count) {
            debug!(index, item_count, "ignoring animation to index out of range");
            return false;
        }
        let Some(stride) = self.state.cell_stride() else {
            debug!(index, "ignoring animation before first measurement");
            return false;
        };
        let max = Bounds::compute(&self.state, item_count, &self.viewport).max;
        let Some(delta) = snap::target_delta(&self.state, index, max) else {
            return false;
        };

        let duration =
            duration_ms.unwrap_or_else(|| self.config.snap_timing().duration_ms(delta, stride));
        debug!(
            index,
            delta,
            duration_ms = duration,
            offset = self.state.horizontal_offset(),
            "starting snap animation"
        );
        self.animation.start(SnapAnimation::new(
            self.state.horizontal_offset(),
            delta,
            duration,
            self.config.snap_easing,
            on_complete,
        ));
        true
    }

    /// Host smooth-scroll hook
    pub fn smooth_scroll_to(&mut self, index: usize, item_count: usize) -> bool {
        self.animate_to_index(index, item_count, None, None)
    }

    /// Rewind to index 0 from at most `rewind_distance` away
    ///
    /// The offset jumps close to the start first so long lists rewind with
    /// a short, fixed-length animation.
    pub fn rewind_to_first(&mut self, item_count: usize) -> bool {
        if !self.state.is_measured() {
            return false;
        }
        let max = Bounds::compute(&self.state, item_count, &self.viewport).max_px();
        self.state.horizontal_offset = max.min(self.config.rewind_distance);
        self.needs_layout = true;
        self.animate_to_index(0, item_count, Some(self.config.rewind_duration_ms), None)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether the offset can still move in `direction`
    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        Bounds::compute(&self.state, self.item_count, &self.viewport)
            .can_scroll(self.state.horizontal_offset(), direction)
    }

    pub fn can_scroll_horizontally(&self) -> bool {
        true
    }

    pub fn can_scroll_vertically(&self) -> bool {
        false
    }

    /// Index a snap would settle on from the current offset
    pub fn nearest_index(&self) -> Option<usize> {
        snap::nearest_index(&self.state, self.item_count)
    }

    pub fn max_offset(&self) -> f32 {
        Bounds::compute(&self.state, self.item_count, &self.viewport).max
    }

    /// Release every visible item, as on a data set change
    pub fn detach_all(&mut self) {
        for item in self.items.drain(..) {
            self.recycler.release(item.handle);
        }
    }

    // ========================================================================
    // Passes
    // ========================================================================

    fn layout_from(&mut self, mut next: GeometryState, item_count: usize) {
        if next.walk_start() >= item_count {
            debug!(
                first = next.walk_start(),
                item_count,
                "window past the data set, resetting geometry"
            );
            next.reset();
        }
        next.invalidate_measurement();
        if let Some(synthetic) = jump::synthetic_delta(&next) {
            debug!(synthetic, "applying pending index");
            next.horizontal_offset += synthetic;
        }
        self.run_fill(next, 0, item_count);
    }

    fn run_fill(&mut self, next: GeometryState, delta: i32, item_count: usize) -> i32 {
        for item in &self.items {
            self.recycler.detach(&item.handle);
        }
        let previous = std::mem::take(&mut self.items);

        let result =
            FillEngine::new(&mut self.recycler, self.viewport).fill(next, delta, item_count, &previous);
        match result {
            Ok(outcome) => {
                self.state = outcome.state;
                self.items = outcome.items;
                debug!(
                    offset = self.state.horizontal_offset(),
                    first = ?self.state.first_visible_index(),
                    last = ?self.state.last_visible_index(),
                    applied = outcome.applied,
                    "layout pass"
                );
                outcome.applied
            }
            Err(err) => {
                warn!(%err, "layout pass aborted, keeping previous frame");
                self.state.pending_index = None;
                self.restore(previous);
                0
            }
        }
    }

    /// Put the previous frame back after an aborted pass
    fn restore(&mut self, mut previous: Vec<VisibleItem<R::Handle>>) {
        previous.sort_by_key(|item| item.z_order);
        for item in &previous {
            let restored = self
                .recycler
                .attach(&item.handle, DrawSlot::Top)
                .and_then(|()| self.recycler.place(&item.handle, item.visual.rect))
                .and_then(|()| self.recycler.set_visual(&item.handle, &item.visual));
            if let Err(err) = restored {
                warn!(index = item.index, %err, "failed to restore item");
            }
        }
        previous.sort_by_key(|item| item.index);
        self.items = previous;
    }
}

impl<R> std::fmt::Debug for FoldCarousel<R>
where
    R: ItemRecycler + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldCarousel")
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("visible", &self.items.len())
            .field("animation", &self.animation)
            .field("phase", &self.phase)
            .field("recycler", &self.recycler)
            .finish()
    }
}

fn saturating_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
