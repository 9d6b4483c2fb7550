//! Gesture decoding for continuous-touch keyboard sensors.
//!
//! Turns per-block, per-key position and tracker data from a touch-sensing
//! keyboard into a single monophonic performance signal: active key, pitch
//! bend, crossfaded position, and percussive-onset strength. The decoding is
//! realtime-safe: after setup it never allocates, blocks, or locks.

pub mod keyboard; // Per-block gesture state machine
pub mod msg; // Cross-thread gesture hand-off
pub mod tracker; // Interface to the per-key tracker collaborator

pub use keyboard::KeyboardState;
pub use msg::GestureFrame;
pub use tracker::{KeyTracker, KeyTrackerState};
