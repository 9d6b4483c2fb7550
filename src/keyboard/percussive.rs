//! Percussiveness Threshold Filter.

use core::ops::Range;

use super::{KeyboardState, PERCUSSIVENESS_DECAY_RATE};
use crate::tracker::KeyTracker;

impl KeyboardState {
    /// Accept or reject this block's onset events.
    ///
    /// The acceptance threshold starts at the last accepted strength and
    /// decays linearly with the frames elapsed since, giving each onset a
    /// shrinking refractory window: a quieter echo of the strike is rejected,
    /// while a genuinely louder hit still registers immediately. Events are
    /// scanned in ascending key order over the secondary window and the first
    /// accepted one wins the block.
    pub(super) fn filter_percussiveness<T: KeyTracker>(
        &mut self,
        trackers: &[T],
        window: Range<usize>,
    ) {
        let elapsed = self.frame_counter - self.last_percussiveness_timestamp;
        let threshold = self.percussiveness - elapsed as f32 * PERCUSSIVENESS_DECAY_RATE;
        for n in window {
            if let Some(onset) = trackers[n].percussiveness() {
                if onset > threshold {
                    self.percussiveness = onset;
                    self.last_percussiveness_timestamp = self.frame_counter;
                    break;
                }
            }
        }
    }
}
