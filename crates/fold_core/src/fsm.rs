//! Scroll phase state machine
//!
//! The host container reports discrete drag/idle transitions. They are
//! modelled as events fed to a small FSM so the carousel reacts only to
//! real phase changes (a repeated "dragging" report does not cancel twice).

use std::hash::Hash;

/// Trait for state types that react to events
///
/// `on_event` returns the new state, or `None` when the event does not
/// cause a transition from the current state.
///
/// # Example
///
/// ```rust
/// use fold_core::StateTransitions;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Toggle { Off, On }
///
/// impl StateTransitions for Toggle {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Toggle::Off, 1) => Some(Toggle::On),
///             (Toggle::On, 1) => Some(Toggle::Off),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Toggle::Off.on_event(1), Some(Toggle::On));
/// ```
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Events delivered by the host's gesture layer
pub mod phase_events {
    /// Finger down and moving content
    pub const DRAG_START: u32 = 20000;
    /// Finger lifted while content still has velocity (fling)
    pub const RELEASE: u32 = 20001;
    /// Content came to rest
    pub const SETTLED: u32 = 20002;
}

/// Scroll phase as reported by the host container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    /// Content at rest
    #[default]
    Idle,
    /// User is actively dragging
    Dragging,
    /// Content moving without a finger down (fling or programmatic scroll)
    Settling,
}

impl ScrollPhase {
    /// Returns true while the user has a finger on the content
    pub fn is_dragging(&self) -> bool {
        matches!(self, ScrollPhase::Dragging)
    }

    /// Returns true if the content is at rest
    pub fn is_idle(&self) -> bool {
        matches!(self, ScrollPhase::Idle)
    }

    /// Event that moves any phase into `self`
    pub fn entry_event(&self) -> u32 {
        match self {
            ScrollPhase::Idle => phase_events::SETTLED,
            ScrollPhase::Dragging => phase_events::DRAG_START,
            ScrollPhase::Settling => phase_events::RELEASE,
        }
    }
}

impl StateTransitions for ScrollPhase {
    fn on_event(&self, event: u32) -> Option<Self> {
        use phase_events::*;

        match (self, event) {
            // Idle -> Dragging: finger down
            (ScrollPhase::Idle, DRAG_START) => Some(ScrollPhase::Dragging),

            // Idle -> Settling: programmatic scroll started
            (ScrollPhase::Idle, RELEASE) => Some(ScrollPhase::Settling),

            // Dragging -> Settling: fling after release
            (ScrollPhase::Dragging, RELEASE) => Some(ScrollPhase::Settling),

            // Dragging -> Idle: released without velocity
            (ScrollPhase::Dragging, SETTLED) => Some(ScrollPhase::Idle),

            // Settling -> Dragging: caught a moving carousel
            (ScrollPhase::Settling, DRAG_START) => Some(ScrollPhase::Dragging),

            // Settling -> Idle: fling ran out
            (ScrollPhase::Settling, SETTLED) => Some(ScrollPhase::Idle),

            _ => None,
        }
    }
}
