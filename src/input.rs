/// Abstract input events consumed by the engine.
///
/// Every device (mouse, touch, keys, a scripted test) is reduced to the same
/// small vocabulary: where the ship should head, when to fire, when to reset,
/// and when the world changed size.

use std::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireKind {
    /// Green bolt.
    Primary,
    /// Red or blue bolt, picked at random.
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// New cursor target in world pixels.
    PointerMove { x: f32, y: f32 },
    /// Fire from the ship's current position.
    Fire(FireKind),
    /// Move the target to `(x, y)`, then fire.
    FireAt { x: f32, y: f32, kind: FireKind },
    /// Shift the target by whole steps (arrow keys, joystick).
    Nudge { dx: i8, dy: i8 },
    Reset,
    /// New world size in pixels.
    Resize { width: f32, height: f32 },
}

/// A provider of input events, drained by the engine between ticks.
pub trait InputSource {
    /// Append every pending event to `out`, oldest first.
    fn poll(&mut self, out: &mut Vec<InputEvent>);
}

/// Events arriving over a channel, typically from a device-reader thread.
pub struct ChannelInput {
    rx: mpsc::Receiver<InputEvent>,
}

impl ChannelInput {
    pub fn new(rx: mpsc::Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, out: &mut Vec<InputEvent>) {
        out.extend(self.rx.try_iter());
    }
}

/// A fixed list of events handed out on the first poll.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    events: Vec<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, out: &mut Vec<InputEvent>) {
        out.append(&mut self.events);
    }
}
