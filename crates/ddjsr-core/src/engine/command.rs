//! Commands sent from the mapping to the playback engine
//!
//! This module follows the **Command Pattern**: every action a control can
//! trigger is one variant of [`EngineCommand`]. The host engine decides how
//! to apply it (directly, or through its own queue). Keeping the surface a
//! plain enum lets tests record exactly what the mapping asked for.

use crate::types::DeckId;

/// Scratch parameters for vinyl-style jog wheel control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchParams {
    /// Jog wheel resolution (ticks per full revolution)
    pub intervals_per_rev: u32,
    /// Virtual platter speed in revolutions per minute
    pub rpm: f64,
    /// Alpha-beta filter alpha coefficient
    pub alpha: f64,
    /// Alpha-beta filter beta coefficient
    pub beta: f64,
}

/// Commands sent from the controller mapping to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    // ─────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────
    /// Toggle play/pause
    TogglePlay { deck: DeckId },
    /// CDJ-style cue button (pressed = true on press, false on release)
    Cue { deck: DeckId, pressed: bool },
    /// Jump to the cue point and stop
    CueGotoAndStop { deck: DeckId },
    /// Sync tempo/phase to the master deck
    Sync { deck: DeckId },
    /// Toggle headphone pre-fader listen
    TogglePfl { deck: DeckId },
    /// Toggle key lock
    ToggleKeylock { deck: DeckId },
    /// Set tempo rate (-1.0 to 1.0, relative to the rate range)
    SetRate { deck: DeckId, rate: f64 },
    /// Load the library's selected track onto the deck
    LoadSelectedTrack { deck: DeckId },

    // ─────────────────────────────────────────────────────────────
    // Beat-aligned loops and jumps (used by the slicer)
    // ─────────────────────────────────────────────────────────────
    /// Enable/disable quantize for the deck
    SetQuantize { deck: DeckId, enabled: bool },
    /// Set the length used by `BeatloopActivate`, in beats
    SetBeatloopSize { deck: DeckId, beats: u32 },
    /// Jump playback by a signed number of beats
    BeatJump { deck: DeckId, beats: i32 },
    /// Engage a loop of the configured beatloop size at the playhead
    BeatloopActivate { deck: DeckId },
    /// Exit the currently enabled loop
    ReloopExit { deck: DeckId },
    /// Momentary loop roll (slip-style) of `beats` length
    BeatloopRoll { deck: DeckId, beats: f64, active: bool },

    // ─────────────────────────────────────────────────────────────
    // Pads
    // ─────────────────────────────────────────────────────────────
    /// Hot cue pad: set if empty, otherwise jump (press) / end preview (release)
    HotcueActivate { deck: DeckId, slot: usize, pressed: bool },
    /// Remove a hot cue
    HotcueClear { deck: DeckId, slot: usize },
    /// Start a sampler slot (slots are numbered 0-based per deck)
    SamplerPlay { deck: DeckId, slot: usize },

    // ─────────────────────────────────────────────────────────────
    // Jog wheel
    // ─────────────────────────────────────────────────────────────
    /// Enter scratch mode (platter touched)
    ScratchEnable { deck: DeckId, params: ScratchParams },
    /// Leave scratch mode (platter released)
    ScratchDisable { deck: DeckId },
    /// Move the virtual platter while scratching
    ScratchTick { deck: DeckId, delta: i32 },
    /// Temporary pitch bend from the jog wheel edge
    Jog { deck: DeckId, amount: f64 },

    // ─────────────────────────────────────────────────────────────
    // Library
    // ─────────────────────────────────────────────────────────────
    /// Move the library selection up (negative) or down (positive)
    LibraryMoveVertical { delta: i32 },
    /// Cycle focus between library panes
    LibraryMoveFocusForward,
}

impl EngineCommand {
    /// Deck targeted by this command (`None` for library commands)
    pub fn deck(&self) -> Option<DeckId> {
        match self {
            Self::TogglePlay { deck }
            | Self::Cue { deck, .. }
            | Self::CueGotoAndStop { deck }
            | Self::Sync { deck }
            | Self::TogglePfl { deck }
            | Self::ToggleKeylock { deck }
            | Self::SetRate { deck, .. }
            | Self::LoadSelectedTrack { deck }
            | Self::SetQuantize { deck, .. }
            | Self::SetBeatloopSize { deck, .. }
            | Self::BeatJump { deck, .. }
            | Self::BeatloopActivate { deck }
            | Self::ReloopExit { deck }
            | Self::BeatloopRoll { deck, .. }
            | Self::HotcueActivate { deck, .. }
            | Self::HotcueClear { deck, .. }
            | Self::SamplerPlay { deck, .. }
            | Self::ScratchEnable { deck, .. }
            | Self::ScratchDisable { deck }
            | Self::ScratchTick { deck, .. }
            | Self::Jog { deck, .. } => Some(*deck),
            Self::LibraryMoveVertical { .. } | Self::LibraryMoveFocusForward => None,
        }
    }
}
