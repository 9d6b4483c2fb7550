//! Interface to the per-key tracker collaborator.
//!
//! Each physical key has its own tracker (owned by the acquisition layer, not by
//! this crate) that reduces the raw position stream to a discrete press/release
//! state plus an occasional percussive-onset event. The gesture decoder only
//! ever reads those two things, so the whole dependency is a two-method trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normalized position a tracker reports when a key reaches full press.
pub const PRESS_POSITION: f32 = 0.75;
/// Slack around [`PRESS_POSITION`] the trackers allow before leaving `Down`.
pub const PRESS_HYSTERESIS: f32 = 0.05;

/// Discrete per-key state as reported by the key tracker.
///
/// The decoder never inspects individual variants beyond equality; all gesture
/// logic goes through the three predicates below.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTrackerState {
    #[default]
    Unknown,
    PartialPressAwaitingMax,
    PartialPressFoundMax,
    PressInProgress,
    Down,
    ReleaseInProgress,
    ReleaseFinished,
}

impl KeyTrackerState {
    /// The key is fully down.
    pub fn is_pressed(self) -> bool {
        self == KeyTrackerState::Down
    }

    /// The key is on its way down but has not reached `Down` yet.
    pub fn is_pressing(self) -> bool {
        matches!(
            self,
            KeyTrackerState::PartialPressAwaitingMax
                | KeyTrackerState::PartialPressFoundMax
                | KeyTrackerState::PressInProgress
        )
    }

    /// The key is on its way back up.
    pub fn is_releasing(self) -> bool {
        self == KeyTrackerState::ReleaseInProgress
    }
}

/// Read-only view of one key's tracker, queried once per control block.
pub trait KeyTracker {
    fn current_state(&self) -> KeyTrackerState;

    /// Onset-strength event for this block, or `None` when no strike was
    /// detected. `None` means "no update", never zero.
    fn percussiveness(&self) -> Option<f32>;
}
