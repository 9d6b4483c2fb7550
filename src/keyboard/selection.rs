//! Key Selection Engine: recency bookkeeping and primary-key arbitration.

use core::ops::Range;

use super::{
    KeyboardState, ACTIVE_POSITION_FLOOR, BEND_MAX_DISTANCE, HYSTERESIS_DECAY, HYSTERESIS_START,
    PRESSING_KEY_ON_THRESHOLD, PROGRESS_OFF_MARGIN,
};
use crate::tracker::KeyTracker;

impl KeyboardState {
    /// Refresh the per-key state and timestamp arrays for this block.
    ///
    /// Two timestamp families are kept deliberately separate: `timestamps_down`
    /// tracks completed presses, `timestamps_progress` tracks fresh attempts,
    /// including ones that never reach `Down`.
    pub(super) fn update_tracking<T: KeyTracker>(
        &mut self,
        positions: &[f32],
        trackers: &[T],
        range: Range<usize>,
    ) {
        for n in range {
            let state = trackers[n].current_state();
            self.past_states[n] = self.states[n];
            self.states[n] = state;

            if state.is_pressed() && !self.past_states[n].is_pressed() {
                self.timestamps_down[n] = self.frame_counter;
            } else if self.past_states[n].is_pressed() && !state.is_pressed() {
                self.timestamps_down[n] = 0;
            }

            if self.timestamps_progress[n] == 0
                && state.is_pressing()
                && positions[n] > PRESSING_KEY_ON_THRESHOLD
            {
                self.timestamps_progress[n] = self.frame_counter;
            } else if positions[n] < PRESSING_KEY_ON_THRESHOLD - PROGRESS_OFF_MARGIN {
                self.timestamps_progress[n] = 0;
            }
        }
    }

    /// Pick this block's primary key.
    ///
    /// Raw argmax of position, overridden by the most recently completed press
    /// when one is held, which in turn yields to a brand-new attempt landing
    /// outside bend reach. A decaying hysteresis guard keeps sensor noise from
    /// flapping the choice between two near-equal keys.
    pub(super) fn select_mono_key(&mut self, positions: &[f32], range: Range<usize>) {
        let mut candidate = index_of_peak(positions, range);

        let most_recent_down = index_of_latest(&self.timestamps_down);
        if most_recent_down < positions.len() && self.timestamps_down[most_recent_down] != 0 {
            candidate = most_recent_down;

            let most_recent_progress = index_of_latest(&self.timestamps_progress);
            if most_recent_progress < positions.len()
                && self.timestamps_progress[most_recent_progress]
                    > self.timestamps_down[candidate]
                && most_recent_progress.abs_diff(candidate) > BEND_MAX_DISTANCE
            {
                // An unrelated attack far from the held note wins outright.
                candidate = most_recent_progress;
            }
        }

        let previous = self.mono_key;
        if candidate != previous
            && previous < positions.len()
            && positions[previous] > ACTIVE_POSITION_FLOOR
            && positions[candidate] > ACTIVE_POSITION_FLOOR
        {
            if positions[candidate]
                > PRESSING_KEY_ON_THRESHOLD + self.highest_position_hysteresis
            {
                self.mono_key = candidate;
                self.highest_position_hysteresis *= HYSTERESIS_DECAY;
            } else {
                // Blocked switch: keep the incumbent and re-arm the guard.
                self.highest_position_hysteresis = HYSTERESIS_START;
            }
        } else {
            self.mono_key = candidate;
            self.highest_position_hysteresis *= HYSTERESIS_DECAY;
        }
    }
}

/// Index of the highest position within `range`; lowest index wins ties.
fn index_of_peak(positions: &[f32], range: Range<usize>) -> usize {
    let mut best = range.start;
    for n in range {
        if positions[n] > positions[best] {
            best = n;
        }
    }
    best
}

/// Index of the largest timestamp; lowest index wins ties.
fn index_of_latest(timestamps: &[u64]) -> usize {
    let mut best = 0;
    for (n, stamp) in timestamps.iter().enumerate() {
        if *stamp > timestamps[best] {
            best = n;
        }
    }
    best
}
