//! Protocol-agnostic controller input
//!
//! The MIDI layer decodes raw bytes into these events; everything past that
//! boundary works on typed inputs only.

use crate::types::DeckId;

/// Pad mode selector buttons above the performance pads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadModeButton {
    HotCue,
    Roll,
    Slicer,
    Sampler,
}

/// Input from one deck section of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckInput {
    /// Play/pause button (true = pressed)
    Play(bool),
    /// Cue button
    Cue(bool),
    /// Sync button
    Sync(bool),
    /// Headphone cue (PFL) button
    Pfl(bool),
    /// Key lock button
    Keylock(bool),
    /// Shift button
    Shift(bool),
    /// Load button for this deck (browser section)
    Load(bool),
    /// Pad mode selector
    PadModeSelect { button: PadModeButton, pressed: bool },
    /// Performance pad (0-7)
    Pad { pad: usize, pressed: bool },
    /// Tempo fader, most significant 7 bits
    TempoCoarse(u8),
    /// Tempo fader, least significant 7 bits
    TempoFine(u8),
    /// Jog wheel platter touched/released
    JogTouch(bool),
    /// Jog wheel turned from the top surface (signed ticks)
    JogScratch(i32),
    /// Jog wheel turned by its edge (signed ticks)
    JogBend(i32),
}

/// Input from the library (browser) encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryInput {
    /// Encoder turned (positive = down)
    Rotate(i32),
    /// Encoder pushed/released
    Push(bool),
}

/// Any decoded controller input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerInput {
    Deck { deck: DeckId, input: DeckInput },
    Library(LibraryInput),
}
