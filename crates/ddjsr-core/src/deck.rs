//! One deck section of the controller
//!
//! A `Deck` is built once per deck index and owns everything bound to it:
//! transport buttons, the pad mode coordinator, the slicer, the jog wheel
//! and the tempo fader. Nothing is rebound after construction.

use crate::config::DeckConfig;
use crate::engine::{Connection, Engine, EngineCommand, EngineEvent, EngineSignal};
use crate::input::DeckInput;
use crate::jog::JogWheel;
use crate::led::{Led, LedChange, LedQueue, PadPage};
use crate::pad_mode::{PadMode, PadModeCoordinator};
use crate::slicer::Slicer;
use crate::types::{DeckId, NUM_PADS};

/// 14-bit tempo fader assembled from MSB/LSB control changes
#[derive(Debug, Default)]
struct TempoFader {
    msb: u8,
    lsb: u8,
}

impl TempoFader {
    /// Fader value (0-16383) mapped to a rate; top of the fader is +1.0
    fn rate(&self) -> f64 {
        let value = ((self.msb as u16 & 0x7F) << 7) | (self.lsb as u16 & 0x7F);
        1.0 - value as f64 / 8192.0
    }
}

#[derive(Debug)]
pub struct Deck {
    id: DeckId,
    pads: PadModeCoordinator,
    slicer: Slicer,
    jog: JogWheel,
    tempo: TempoFader,
    shift: bool,
    leds: LedQueue,
    /// Permanent duration and play-state connections, held while attached
    listeners: Vec<Connection>,
}

impl Deck {
    pub fn new(id: DeckId, config: &DeckConfig) -> Self {
        Self {
            id,
            pads: PadModeCoordinator::new(id, config.roll_sizes),
            slicer: Slicer::new(id),
            jog: JogWheel::new(id, config.jog.clone()),
            tempo: TempoFader::default(),
            shift: false,
            leds: LedQueue::new(),
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn pad_mode(&self) -> PadMode {
        self.pads.mode()
    }

    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    /// Connect the track-duration and play-state listeners
    pub fn attach<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        if !self.listeners.is_empty() {
            return;
        }
        self.listeners
            .push(engine.connect(self.id, EngineSignal::Duration));
        self.listeners
            .push(engine.connect(self.id, EngineSignal::PlayState));
        self.leds.set(Led::Play, engine.is_playing(self.id));
    }

    /// Stop the slicer and give every connection back to the engine
    pub fn detach<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        self.slicer.stop(engine);
        for listener in self.listeners.drain(..) {
            engine.disconnect(listener);
        }
    }

    /// The position connection belongs to the slicer session; the others to the deck
    fn is_listening(&self, signal: EngineSignal) -> bool {
        match signal {
            EngineSignal::Position => self.slicer.is_running(),
            _ => self.listeners.iter().any(|c| c.signal == signal),
        }
    }

    /// Handle a decoded control from this deck's section
    pub fn handle_input<E: Engine + ?Sized>(&mut self, engine: &mut E, input: DeckInput) {
        let deck = self.id;
        match input {
            DeckInput::Play(true) => engine.send(EngineCommand::TogglePlay { deck }),
            DeckInput::Cue(pressed) => {
                if self.shift {
                    if pressed {
                        engine.send(EngineCommand::CueGotoAndStop { deck });
                    }
                } else {
                    engine.send(EngineCommand::Cue { deck, pressed });
                }
            }
            DeckInput::Sync(true) => engine.send(EngineCommand::Sync { deck }),
            DeckInput::Pfl(true) => engine.send(EngineCommand::TogglePfl { deck }),
            DeckInput::Keylock(true) => engine.send(EngineCommand::ToggleKeylock { deck }),
            DeckInput::Load(true) => engine.send(EngineCommand::LoadSelectedTrack { deck }),
            DeckInput::Play(false)
            | DeckInput::Sync(false)
            | DeckInput::Pfl(false)
            | DeckInput::Keylock(false)
            | DeckInput::Load(false) => {}
            DeckInput::Shift(held) => self.shift = held,
            DeckInput::PadModeSelect { button, pressed } => {
                self.pads
                    .select(engine, &mut self.slicer, &mut self.leds, button, pressed);
            }
            DeckInput::Pad { pad, pressed } => {
                self.pads
                    .pad_input(engine, &mut self.slicer, pad, pressed, self.shift);
            }
            DeckInput::TempoCoarse(msb) => {
                self.tempo.msb = msb;
                engine.send(EngineCommand::SetRate {
                    deck,
                    rate: self.tempo.rate(),
                });
            }
            DeckInput::TempoFine(lsb) => {
                self.tempo.lsb = lsb;
                engine.send(EngineCommand::SetRate {
                    deck,
                    rate: self.tempo.rate(),
                });
            }
            DeckInput::JogTouch(touched) => self.jog.touch(engine, touched),
            DeckInput::JogScratch(delta) => self.jog.scratch(engine, delta),
            DeckInput::JogBend(delta) => self.jog.bend(engine, delta),
        }
    }

    /// Handle an engine notification for this deck
    pub fn handle_engine_event<E: Engine + ?Sized>(&mut self, engine: &mut E, event: EngineEvent) {
        if event.deck() != self.id {
            return;
        }
        if let Some(signal) = event.signal() {
            if !self.is_listening(signal) {
                log::trace!("{}: dropping {:?} event, not connected", self.id, signal);
                return;
            }
        }
        match event {
            EngineEvent::PositionChanged { position, .. } => {
                if let Some(mode) = self.pads.mode().slicer_mode() {
                    self.slicer
                        .on_position(engine, &mut self.leds, mode, position);
                }
            }
            EngineEvent::DurationChanged { .. } => self.slicer.on_duration_changed(engine),
            EngineEvent::PlayStateChanged { playing, .. } => {
                self.leds.set(Led::Play, playing);
                self.slicer
                    .on_play_state_changed(engine, self.pads.mode().slicer_mode(), playing);
            }
            EngineEvent::HotcueChanged { slot, set, .. } => {
                if slot < NUM_PADS {
                    self.leds.set(
                        Led::Pad {
                            page: PadPage::HotCue,
                            pad: slot,
                        },
                        set,
                    );
                }
            }
        }
    }

    /// Take pending LED changes
    pub fn drain_leds(&mut self) -> Vec<LedChange> {
        self.leds.drain()
    }
}
