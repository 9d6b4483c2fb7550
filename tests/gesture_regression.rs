//! End-to-end gesture scenarios, rendered block by block the way a voice
//! would drive the decoder from its audio callback.

use keytouch_dsp::{KeyTracker, KeyTrackerState, KeyboardState};

#[derive(Clone)]
struct ScriptedKey {
    state: KeyTrackerState,
    onset: Option<f32>,
}

impl ScriptedKey {
    fn idle() -> Self {
        Self {
            state: KeyTrackerState::Unknown,
            onset: None,
        }
    }
}

impl KeyTracker for ScriptedKey {
    fn current_state(&self) -> KeyTrackerState {
        self.state
    }

    fn percussiveness(&self) -> Option<f32> {
        self.onset
    }
}

fn board(num_keys: usize) -> (Vec<f32>, Vec<ScriptedKey>) {
    (vec![0.0; num_keys], vec![ScriptedKey::idle(); num_keys])
}

#[test]
fn full_bend_and_debend_performance_arc() {
    let mut kb = KeyboardState::new(13);
    let (mut positions, mut trackers) = board(13);

    // Silence: nothing selected, nothing sounding.
    for _ in 0..2 {
        kb.render(&positions, &trackers, ..);
        assert_eq!(kb.position(), 0.0);
        assert_eq!(kb.bend(), 0.0);
    }

    // Key 5 is struck and lands.
    positions[5] = 0.5;
    trackers[5].state = KeyTrackerState::PressInProgress;
    trackers[5].onset = Some(0.7);
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.key(), 5);
    assert_eq!(kb.percussiveness(), 0.7);

    positions[5] = 0.95;
    trackers[5].state = KeyTrackerState::Down;
    trackers[5].onset = None;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.position(), 0.95);

    // Key 7 is pressed progressively: the bend ramps up, key 5 stays the note.
    let mut previous_bend = 0.0;
    for pos in [0.3, 0.5, 0.8] {
        positions[7] = pos;
        trackers[7].state = KeyTrackerState::PressInProgress;
        kb.render(&positions, &trackers, ..);
        assert_eq!(kb.key(), 5);
        assert_eq!(kb.bend_range(), 2);
        assert!(kb.bend() > previous_bend);
        previous_bend = kb.bend();
    }
    assert!((kb.bend() - 2.0).abs() < 1e-5);

    // The bend completes: key 7 reaches Down, but the gesture still reads as
    // key 5 bent two keys up.
    positions[7] = 0.9;
    trackers[7].state = KeyTrackerState::Down;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.key(), 5);
    assert!((kb.bend() - 2.0).abs() < 1e-5);

    // Debend: key 7 lets go, the bend retraces to zero without the note
    // ever leaving key 5.
    trackers[7].state = KeyTrackerState::ReleaseInProgress;
    let mut last_bend = kb.bend();
    for pos in [0.6, 0.3, 0.08] {
        positions[7] = pos;
        kb.render(&positions, &trackers, ..);
        assert_eq!(kb.key(), 5);
        assert!(kb.bend() < last_bend);
        last_bend = kb.bend();
    }
    assert_eq!(kb.bend(), 0.0);

    positions[7] = 0.0;
    trackers[7].state = KeyTrackerState::ReleaseFinished;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.key(), 5);
    assert_eq!(kb.bend_range(), 0);

    // Key 5 releases; its post-release bounce must not leak out.
    positions[5] = 0.5;
    trackers[5].state = KeyTrackerState::ReleaseInProgress;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.position(), 0.5);

    positions[5] = 0.2;
    trackers[5].state = KeyTrackerState::ReleaseFinished;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.position(), 0.0);

    // A fresh note takes over cleanly.
    positions[2] = 0.6;
    trackers[2].state = KeyTrackerState::PressInProgress;
    kb.render(&positions, &trackers, ..);
    assert_eq!(kb.key(), 2);
    assert_eq!(kb.bend(), 0.0);
    assert_eq!(kb.position(), 0.6);
}

#[cfg(feature = "rtrb")]
#[test]
fn frames_stream_through_the_ring() {
    use keytouch_dsp::msg::{FrameSink, FrameSource};

    let mut kb = KeyboardState::new(13);
    let (mut positions, mut trackers) = board(13);
    positions[5] = 0.9;
    trackers[5].state = KeyTrackerState::Down;

    let (mut tx, mut rx) = rtrb::RingBuffer::new(32);
    for _ in 0..8 {
        kb.render(&positions, &trackers, ..);
        assert!(FrameSink::push(&mut tx, kb.frame()));
    }

    let mut received = 0;
    let mut last = None;
    while let Some(frame) = FrameSource::pop(&mut rx) {
        received += 1;
        last = Some(frame);
    }
    assert_eq!(received, 8);
    let last = last.unwrap();
    assert_eq!(last.key, 5);
    assert_eq!(last.position, 0.9);
}
