//! Behavioral tunables for the deck sections
//!
//! The MIDI map itself is fixed; these values only shape what controls do
//! (roll lengths, jog feel). They are embedded in the controller YAML file
//! loaded by `ddjsr-midi`.

use crate::engine::ScratchParams;
use crate::types::NUM_PADS;
use serde::{Deserialize, Serialize};

/// Per-deck behavior settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Loop-roll length in beats for each pad in roll mode
    pub roll_sizes: [f64; NUM_PADS],
    /// Jog wheel feel
    pub jog: JogConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            roll_sizes: [0.0625, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0],
            jog: JogConfig::default(),
        }
    }
}

/// Jog wheel scratch and pitch-bend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JogConfig {
    /// Jog ticks per platter revolution
    pub intervals_per_rev: u32,
    /// Virtual record speed
    pub rpm: f64,
    /// Scratch filter alpha
    pub alpha: f64,
    /// Scratch filter beta (usually alpha / 32)
    pub beta: f64,
    /// Multiplier applied to edge-turn ticks for pitch bend
    pub bend_sensitivity: f64,
}

impl Default for JogConfig {
    fn default() -> Self {
        let alpha = 1.0 / 8.0;
        Self {
            intervals_per_rev: 2048,
            rpm: 33.0 + 1.0 / 3.0,
            alpha,
            beta: alpha / 32.0,
            bend_sensitivity: 0.5,
        }
    }
}

impl JogConfig {
    pub fn scratch_params(&self) -> ScratchParams {
        ScratchParams {
            intervals_per_rev: self.intervals_per_rev,
            rpm: self.rpm,
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}
