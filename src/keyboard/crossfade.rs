//! Position Crossfade Renderer.

use super::KeyboardState;
use crate::tracker::KeyTrackerState;

impl KeyboardState {
    /// Produce the single position scalar handed to the voice.
    ///
    /// While a bend pair exists, the output stays anchored to the primary
    /// key's own envelope, with up to `position_cross_fade_dip` of it blended
    /// between the pair according to bend progress. That keeps the position
    /// continuous when the reported primary flips mid-bend.
    pub(super) fn render_position(&mut self, positions: &[f32]) {
        let primary_pos = if self.states[self.mono_key] == KeyTrackerState::ReleaseFinished {
            // Gate off mechanical bounce after a finished release.
            0.0
        } else {
            positions[self.mono_key]
        };
        let secondary_pos = match self.other_key {
            Some(n) => positions[n],
            None => 0.0,
        };
        self.other_position = secondary_pos;

        if self.bend_range != 0 {
            let bend_index = self.bend / self.bend_range as f32;
            let dip = self.position_cross_fade_dip;
            let w_primary = (1.0 - bend_index) * dip;
            let w_secondary = bend_index * dip;
            self.position = primary_pos * w_primary
                + secondary_pos * w_secondary
                + primary_pos * (1.0 - dip);
        } else {
            self.position = primary_pos;
        }
    }
}
