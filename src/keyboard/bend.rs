//! Bend/Debend Gesture Decoder.
//!
//! A bend is played by holding one key down and progressively pressing a
//! neighbour: the neighbour's position, normalized over the tracker's press
//! range, scales a signed deflection of up to `secondary - primary` key units.
//! The decoder also has to recognize the mirror image: when the bent-to key is
//! let go, control must hand back to the origin key along the same curve
//! (the "debend") instead of snapping. The last active bend pair is remembered
//! across blocks precisely so that a releasing partner, which no longer counts
//! as "pressing", stays visible to the secondary search.

use core::ops::Range;

use super::{KeyboardState, BEND_ON_THRESHOLD};
use crate::tracker::{PRESS_HYSTERESIS, PRESS_POSITION};

impl KeyboardState {
    /// Find a bend partner for the current primary and compute the signed
    /// bend, possibly reassigning the primary role along the way.
    pub(super) fn decode_bend(&mut self, positions: &[f32], window: Range<usize>) {
        let mut primary = self.mono_key;

        // Highest-positioned neighbour that is either on its way down or part
        // of the remembered bend pair. Anything at rest position is ignored.
        let mut secondary = None;
        let mut secondary_pos = f32::MIN_POSITIVE;
        for n in window {
            if n == primary || positions[n] <= secondary_pos {
                continue;
            }
            if self.states[n].is_pressing() || self.is_recorded_partner(primary, n) {
                secondary_pos = positions[n];
                secondary = Some(n);
            }
        }

        let mut bend = 0.0_f32;
        let mut distance = 0_i32;
        if let Some(mut partner) = secondary {
            let mut debend = false;
            if let Some((from, to)) = self.last_bent {
                if primary == to && partner == from {
                    // What was bent to is now leading: this is the release
                    // path of the previous bend. Restore the original roles.
                    primary = from;
                    partner = to;
                    debend = true;
                } else if primary == from && partner == to {
                    debend = true;
                }
            }

            let partner_pos = positions[partner];
            distance = partner as i32 - primary as i32;
            if partner_pos > BEND_ON_THRESHOLD {
                let primary_state = self.states[primary];
                let partner_state = self.states[partner];
                if debend || (primary_state.is_pressed() && partner_state.is_pressing()) {
                    let span = PRESS_POSITION + PRESS_HYSTERESIS - BEND_ON_THRESHOLD;
                    let coeff =
                        ((partner_pos - BEND_ON_THRESHOLD) / span).clamp(-1.0, 1.0);
                    bend = coeff * distance as f32;
                    self.last_bent = Some((primary, partner));
                } else if primary_state.is_releasing()
                    || (partner_state.is_pressed()
                        && self.timestamps_down[partner] > self.timestamps_down[primary])
                {
                    // The supposed bend partner is really the new note: the
                    // primary is on its way out, or the partner landed fully
                    // down more recently. Promote it, with no bend.
                    primary = partner;
                    distance = 0;
                }
            }
            secondary = Some(partner);
        }

        self.mono_key = primary;
        self.other_key = secondary;
        self.bend = bend;
        self.bend_range = distance;
    }

    fn is_recorded_partner(&self, primary: usize, n: usize) -> bool {
        match self.last_bent {
            Some((from, to)) => (primary == from && n == to) || (primary == to && n == from),
            None => false,
        }
    }
}
