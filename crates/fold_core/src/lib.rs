//! Fold Core
//!
//! Foundational primitives shared by the fold carousel crates:
//!
//! - **Geometry**: points, sizes, float rects for transform anchors, and
//!   integer pixel rects/insets for item placement
//! - **State Machines**: the scroll phase FSM driven by host drag/idle events
//!
//! # Example
//!
//! ```rust
//! use fold_core::{PixelRect, ScrollPhase, StateTransitions};
//! use fold_core::fsm::phase_events;
//!
//! let rect = PixelRect::new(0, 0, 200, 300);
//! assert_eq!(rect.width(), 200);
//!
//! let phase = ScrollPhase::Idle;
//! assert_eq!(phase.on_event(phase_events::DRAG_START), Some(ScrollPhase::Dragging));
//! ```

pub mod fsm;
pub mod geometry;

pub use fsm::{ScrollPhase, StateTransitions};
pub use geometry::{EdgeInsets, PixelRect, Point, Rect, Size};
