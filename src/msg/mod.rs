//! Hand-off of decoded gestures to other threads.
//!
//! The accessors on [`crate::KeyboardState`] are plain unsynchronized reads;
//! reading them from outside the render thread can observe a half-written
//! block. Consumers on another thread should instead take a [`GestureFrame`]
//! snapshot after each `render` and push it through a wait-free SPSC ring.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One block's decoded gesture, as consumed by a synthesizer voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    pub key: usize,
    pub position: f32,
    pub bend: f32,
    pub percussiveness: f32,
}

/// Producer side of a gesture hand-off. Must never block.
pub trait FrameSink {
    /// Push a frame; returns false when it was dropped (ring full).
    fn push(&mut self, frame: GestureFrame) -> bool;
}

/// Consumer side of a gesture hand-off.
pub trait FrameSource {
    fn pop(&mut self) -> Option<GestureFrame>;
}

#[cfg(feature = "rtrb")]
impl FrameSink for Producer<GestureFrame> {
    fn push(&mut self, frame: GestureFrame) -> bool {
        Producer::push(self, frame).is_ok()
    }
}

#[cfg(feature = "rtrb")]
impl FrameSource for Consumer<GestureFrame> {
    fn pop(&mut self) -> Option<GestureFrame> {
        Consumer::pop(self).ok()
    }
}
