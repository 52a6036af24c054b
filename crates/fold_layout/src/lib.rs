//! Fold Layout Engine
//!
//! A horizontal, recycling carousel where items fold as they cross the
//! viewport edges: the leading item shrinks toward the left boundary, the
//! trailing item shrinks and dims at the right boundary.
//!
//! # Features
//!
//! - **Fill passes**: re-lay the whole visible window from a scroll offset,
//!   reusing instances from the previous pass before fetching new ones
//! - **Bounds**: offset clamped to `[0, max]`, where `max` leaves the last
//!   items reachable as snap targets
//! - **Fold transform**: per-item scale, opacity and pivot
//! - **Snapping**: distance-adaptive linear settle onto the nearest item
//! - **Jumps**: `request_index` lands an item on the leading edge on the
//!   next pass
//! - **Recycler seam**: the host supplies instances through `ItemRecycler`
//!
//! # Example
//!
//! ```rust
//! use fold_layout::prelude::*;
//!
//! let recycler = MemoryRecycler::new(Measurement::new(200, 300));
//! let mut carousel = FoldCarousel::new(
//!     CarouselConfig::standard(),
//!     Viewport::new(800, 400),
//!     recycler,
//! );
//!
//! carousel.layout(21);
//! assert_eq!(carousel.visible_items().len(), 4);
//!
//! carousel.consume_scroll_delta(150, 21);
//! assert!(carousel.visible_items()[0].scale() < 1.0);
//! ```

pub mod bounds;
pub mod carousel;
pub mod config;
pub mod error;
pub mod fill;
pub mod jump;
pub mod recycler;
pub mod snap;
pub mod state;
pub mod transform;

pub use bounds::{max_offset, min_offset, Bounds, ScrollDirection};
pub use carousel::FoldCarousel;
pub use config::CarouselConfig;
pub use error::{ConfigError, LayoutError, Result};
pub use fill::{FillEngine, FillOutcome, VisibleItem};
pub use recycler::{
    AppliedItem, DrawSlot, ItemHandle, ItemRecycler, Measurement, MemoryRecycler, RecyclerEvent,
};
pub use snap::{nearest_index, AnimationState, SnapAnimation, SnapCallback, SnapTiming};
pub use state::{GeometryState, Viewport};
pub use transform::{fold, FoldEdge, FoldInput, FoldVisual, TransformAnchor, MIN_SCALE, TRAILING_OPACITY};

/// Prelude for hosts embedding the carousel
pub mod prelude {
    pub use crate::bounds::ScrollDirection;
    pub use crate::carousel::FoldCarousel;
    pub use crate::config::CarouselConfig;
    pub use crate::fill::VisibleItem;
    pub use crate::recycler::{DrawSlot, ItemRecycler, Measurement, MemoryRecycler};
    pub use crate::state::Viewport;
    pub use crate::transform::{FoldEdge, FoldVisual, TransformAnchor};

    pub use fold_core::{EdgeInsets, PixelRect, ScrollPhase};
}
