//! Monophonic gesture decoding for a continuous-touch keyboard.
//!
//! A board of touch-sensitive keys produces, every control block, one raw
//! position per key plus a discrete tracker state per key. That signal is noisy
//! and ambiguous: during a pitch bend two keys are down at once, during a fast
//! trill two keys fight for dominance, and a released key can mechanically
//! bounce back above zero. [`KeyboardState::render`] stabilizes all of that
//! into a single musical gesture per block:
//!
//!   mono key        which key is "the note" right now
//!   bend            signed, continuous deflection toward a neighbour
//!   position        crossfaded key position driving the voice envelope
//!   percussiveness  onset strength, gated against re-triggering
//!
//! Four cooperating stages run over shared per-key bookkeeping, one stage per
//! file in this directory:
//!
//!   selection.rs    recency-aware argmax with switch hysteresis
//!   bend.rs         secondary-key search, bend and debend classification
//!   crossfade.rs    primary/secondary position blending
//!   percussive.rs   decaying-threshold onset filter
//!
//! `render` is meant to be called from a realtime audio callback: it never
//! allocates, never blocks, and touches each key in the rendered range a
//! bounded number of times. Out-of-range bounds are clamped rather than
//! rejected so there is no error path that could stall the audio thread.

mod bend;
mod crossfade;
mod percussive;
mod selection;

use core::ops::{Bound, Range, RangeBounds};

use crate::msg::GestureFrame;
use crate::tracker::{KeyTracker, KeyTrackerState};

/// Secondary-key position above which a bend gesture can engage.
pub(crate) const BEND_ON_THRESHOLD: f32 = 0.1;
/// Widest key distance, in either direction, a bend partner may sit at.
pub(crate) const BEND_MAX_DISTANCE: usize = 4;
/// Position a pressing key must cross to register as a fresh attempt.
pub(crate) const PRESSING_KEY_ON_THRESHOLD: f32 = 0.4;
/// Margin below the on-threshold that cancels a registered attempt.
pub(crate) const PROGRESS_OFF_MARGIN: f32 = 0.05;
/// Guard value re-armed whenever a primary-key switch is blocked.
pub(crate) const HYSTERESIS_START: f32 = 0.03;
/// Per-block geometric decay of the hysteresis guard.
pub(crate) const HYSTERESIS_DECAY: f32 = 0.95;
/// Keys below this position never take part in hysteresis arbitration.
pub(crate) const ACTIVE_POSITION_FLOOR: f32 = 0.1;
/// Per-block decay of the percussiveness acceptance threshold.
pub(crate) const PERCUSSIVENESS_DECAY_RATE: f32 = 0.001;

const DEFAULT_CROSS_FADE_DIP: f32 = 0.1;

/// Per-board gesture decoder state. One instance per physical keyboard,
/// exclusively owned by the voice that consumes it.
pub struct KeyboardState {
    num_keys: usize,

    // Per-key bookkeeping, all sized to num_keys by setup().
    past_states: Vec<KeyTrackerState>,
    states: Vec<KeyTrackerState>,
    timestamps_down: Vec<u64>,
    timestamps_progress: Vec<u64>,

    // Block counter; only ever compared for relative recency. A stamp of zero
    // means "never" so the counter is advanced before any stamping happens.
    frame_counter: u64,

    // Outputs of the last rendered block.
    mono_key: usize,
    other_key: Option<usize>,
    bend: f32,
    bend_range: i32,
    position: f32,
    other_position: f32,
    percussiveness: f32,

    highest_position_hysteresis: f32,
    last_percussiveness_timestamp: u64,
    // Most recent active bend pair (from, to), kept across blocks so the
    // symmetric debend transition can be recognized.
    last_bent: Option<(usize, usize)>,

    position_cross_fade_dip: f32,
}

impl KeyboardState {
    pub fn new(num_keys: usize) -> Self {
        let mut state = Self {
            num_keys: 0,
            past_states: Vec::new(),
            states: Vec::new(),
            timestamps_down: Vec::new(),
            timestamps_progress: Vec::new(),
            frame_counter: 0,
            mono_key: 0,
            other_key: None,
            bend: 0.0,
            bend_range: 0,
            position: 0.0,
            other_position: 0.0,
            percussiveness: 0.0,
            highest_position_hysteresis: 0.0,
            last_percussiveness_timestamp: 0,
            last_bent: None,
            position_cross_fade_dip: DEFAULT_CROSS_FADE_DIP,
        };
        state.setup(num_keys);
        state
    }

    /// Re-size for a different board and reset all bookkeeping. This is the
    /// only place the decoder allocates; call it before the audio thread runs.
    pub fn setup(&mut self, num_keys: usize) {
        self.num_keys = num_keys;
        self.past_states.clear();
        self.past_states.resize(num_keys, KeyTrackerState::Unknown);
        self.states.clear();
        self.states.resize(num_keys, KeyTrackerState::Unknown);
        self.timestamps_down.clear();
        self.timestamps_down.resize(num_keys, 0);
        self.timestamps_progress.clear();
        self.timestamps_progress.resize(num_keys, 0);
        self.frame_counter = 0;
        self.mono_key = 0;
        self.other_key = None;
        self.bend = 0.0;
        self.bend_range = 0;
        self.position = 0.0;
        self.other_position = 0.0;
        self.percussiveness = 0.0;
        self.highest_position_hysteresis = 0.0;
        self.last_percussiveness_timestamp = 0;
        self.last_bent = None;
    }

    /// Decode one control block.
    ///
    /// `positions` holds the raw per-key positions for this block and
    /// `trackers` the matching per-key trackers. `range` restricts which keys
    /// are considered (e.g. one octave of a larger board); pass `..` for the
    /// whole board. Bounds beyond the board or the slices are clamped.
    pub fn render<T: KeyTracker>(
        &mut self,
        positions: &[f32],
        trackers: &[T],
        range: impl RangeBounds<usize>,
    ) {
        self.frame_counter += 1;

        let limit = self.num_keys.min(positions.len()).min(trackers.len());
        let range = resolve_range(range, limit);
        if range.is_empty() {
            return;
        }

        self.update_tracking(positions, trackers, range.clone());
        self.select_mono_key(positions, range.clone());

        // The bend search and the percussiveness scan share one window of
        // +-BEND_MAX_DISTANCE keys around the selected primary.
        let window = self.secondary_window(range);
        self.decode_bend(positions, window.clone());
        self.render_position(positions);
        self.filter_percussiveness(trackers, window);

        debug_assert!(self.mono_key < self.num_keys);
    }

    fn secondary_window(&self, range: Range<usize>) -> Range<usize> {
        let first = range.start.max(self.mono_key.saturating_sub(BEND_MAX_DISTANCE));
        let last = range.end.min(self.mono_key + BEND_MAX_DISTANCE + 1);
        first..last
    }

    /// Index of the current primary (mono) key.
    pub fn key(&self) -> usize {
        self.mono_key
    }

    /// Index of the current secondary key, when one is in play.
    pub fn other_key(&self) -> Option<usize> {
        self.other_key
    }

    /// Crossfaded position exposed to the voice.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Raw position of the secondary key (0.0 when there is none).
    pub fn other_position(&self) -> f32 {
        self.other_position
    }

    /// Signed bend amount in key units, within [-bend_range, bend_range].
    pub fn bend(&self) -> f32 {
        self.bend
    }

    /// Signed key distance of the current bend pair, 0 when no pair exists.
    pub fn bend_range(&self) -> i32 {
        self.bend_range
    }

    /// Last accepted onset strength.
    pub fn percussiveness(&self) -> f32 {
        self.percussiveness
    }

    /// How much of the output position may dip toward the secondary key
    /// during a bend. Clamped to [0, 1].
    pub fn set_position_cross_fade_dip(&mut self, weight: f32) {
        self.position_cross_fade_dip = weight.clamp(0.0, 1.0);
    }

    /// Snapshot the last block's outputs for hand-off to another thread.
    pub fn frame(&self) -> GestureFrame {
        GestureFrame {
            key: self.mono_key,
            position: self.position,
            bend: self.bend,
            percussiveness: self.percussiveness,
        }
    }
}

fn resolve_range(range: impl RangeBounds<usize>, limit: usize) -> Range<usize> {
    let first = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let last = match range.end_bound() {
        Bound::Included(&n) => n.saturating_add(1),
        Bound::Excluded(&n) => n,
        Bound::Unbounded => limit,
    };
    let last = last.min(limit);
    first.min(last)..last
}
