//! Pad mode coordinator
//!
//! The eight performance pads are shared by five modes. Exactly one is
//! active; the coordinator owns that choice, routes pad presses to the
//! matching handler, and starts/stops the slicer as slicer modes are
//! entered and left.
//!
//! ```text
//! HOT CUE  → hot cue set/recall (shift clears)
//! ROLL     → momentary loop roll, quantize forced on while held
//! SLICER   → continuous ⇄ loop on repeated presses
//! SAMPLER  → sampler slot trigger
//! ```

use crate::engine::{Engine, EngineCommand};
use crate::input::PadModeButton;
use crate::led::{LedQueue, PadPage};
use crate::slicer::{Slicer, SlicerMode};
use crate::types::{DeckId, NUM_PADS};

/// Active pad mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadMode {
    #[default]
    HotCue,
    Roll,
    SlicerContinuous,
    SlicerLoop,
    Sampler,
}

impl PadMode {
    /// Slicer visual mode, if this is one of the slicer modes
    pub fn slicer_mode(self) -> Option<SlicerMode> {
        match self {
            PadMode::SlicerContinuous => Some(SlicerMode::Continuous),
            PadMode::SlicerLoop => Some(SlicerMode::Loop),
            _ => None,
        }
    }

    pub fn is_slicer(self) -> bool {
        self.slicer_mode().is_some()
    }

    /// LED page lit by this mode
    pub fn page(self) -> PadPage {
        match self {
            PadMode::HotCue => PadPage::HotCue,
            PadMode::Roll => PadPage::Roll,
            PadMode::SlicerContinuous | PadMode::SlicerLoop => PadPage::Slicer,
            PadMode::Sampler => PadPage::Sampler,
        }
    }
}

/// Owns the pad mode of one deck
#[derive(Debug)]
pub struct PadModeCoordinator {
    deck: DeckId,
    mode: PadMode,
    roll_sizes: [f64; NUM_PADS],
    /// Bitmap of roll pads currently held (bit N = pad N)
    rolls_held: u8,
    /// Quantize state to restore once the last roll pad is released
    quantize_before_roll: bool,
}

impl PadModeCoordinator {
    pub fn new(deck: DeckId, roll_sizes: [f64; NUM_PADS]) -> Self {
        Self {
            deck,
            mode: PadMode::default(),
            roll_sizes,
            rolls_held: 0,
            quantize_before_roll: false,
        }
    }

    #[inline]
    pub fn mode(&self) -> PadMode {
        self.mode
    }

    /// Handle a mode selector button; releases are ignored
    pub fn select<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        slicer: &mut Slicer,
        leds: &mut LedQueue,
        button: PadModeButton,
        pressed: bool,
    ) {
        if !pressed {
            return;
        }

        let next = match (button, self.mode) {
            (PadModeButton::Slicer, PadMode::SlicerContinuous) => PadMode::SlicerLoop,
            (PadModeButton::Slicer, PadMode::SlicerLoop) => PadMode::SlicerContinuous,
            (PadModeButton::Slicer, _) => PadMode::SlicerContinuous,
            (PadModeButton::HotCue, _) => PadMode::HotCue,
            (PadModeButton::Roll, _) => PadMode::Roll,
            (PadModeButton::Sampler, _) => PadMode::Sampler,
        };
        if next == self.mode {
            return;
        }

        if self.mode == PadMode::Roll {
            self.release_rolls(engine);
        }

        let previous = self.mode;
        self.mode = next;
        log::debug!("pads {}: {:?} -> {:?}", self.deck, previous, next);

        match (previous.is_slicer(), next.slicer_mode()) {
            // Continuous ⇄ loop: same session, new visuals
            (true, Some(mode)) => slicer.mode_toggle(leds, mode),
            (false, Some(mode)) => {
                slicer.mode_toggle(leds, mode);
                if engine.is_playing(self.deck) {
                    if let Err(e) = slicer.start(engine) {
                        log::debug!("pads {}: slicer not started: {}", self.deck, e);
                    }
                }
            }
            (true, None) => slicer.stop(engine),
            (false, None) => {}
        }
    }

    /// Route a performance pad press/release to the active mode
    pub fn pad_input<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        slicer: &mut Slicer,
        pad: usize,
        pressed: bool,
        shift: bool,
    ) {
        if pad >= NUM_PADS {
            log::warn!("pads {}: pad {} out of range", self.deck, pad);
            return;
        }
        let deck = self.deck;
        match self.mode {
            PadMode::HotCue => {
                if shift {
                    if pressed {
                        engine.send(EngineCommand::HotcueClear { deck, slot: pad });
                    }
                } else {
                    engine.send(EngineCommand::HotcueActivate {
                        deck,
                        slot: pad,
                        pressed,
                    });
                }
            }
            PadMode::Roll => self.roll(engine, pad, pressed),
            PadMode::SlicerContinuous | PadMode::SlicerLoop => slicer.button_input(pad, pressed),
            PadMode::Sampler => {
                if pressed {
                    engine.send(EngineCommand::SamplerPlay { deck, slot: pad });
                }
            }
        }
    }

    fn roll<E: Engine + ?Sized>(&mut self, engine: &mut E, pad: usize, pressed: bool) {
        let deck = self.deck;
        let bit = 1u8 << pad;
        let beats = self.roll_sizes[pad];
        if pressed {
            if self.rolls_held & bit != 0 {
                return;
            }
            if self.rolls_held == 0 {
                self.quantize_before_roll = engine.quantize_enabled(deck);
                engine.send(EngineCommand::SetQuantize {
                    deck,
                    enabled: true,
                });
            }
            self.rolls_held |= bit;
            engine.send(EngineCommand::BeatloopRoll {
                deck,
                beats,
                active: true,
            });
        } else {
            if self.rolls_held & bit == 0 {
                return;
            }
            self.rolls_held &= !bit;
            engine.send(EngineCommand::BeatloopRoll {
                deck,
                beats,
                active: false,
            });
            if self.rolls_held == 0 {
                engine.send(EngineCommand::SetQuantize {
                    deck,
                    enabled: self.quantize_before_roll,
                });
            }
        }
    }

    /// End every held roll (mode switched away while pads were down)
    fn release_rolls<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        for pad in 0..NUM_PADS {
            if self.rolls_held & (1 << pad) != 0 {
                self.roll(engine, pad, false);
            }
        }
    }
}
