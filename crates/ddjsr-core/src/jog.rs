//! Jog wheel: vinyl scratch when the platter is touched, pitch bend otherwise

use crate::config::JogConfig;
use crate::engine::{Engine, EngineCommand};
use crate::types::DeckId;

#[derive(Debug)]
pub struct JogWheel {
    deck: DeckId,
    config: JogConfig,
    touched: bool,
}

impl JogWheel {
    pub fn new(deck: DeckId, config: JogConfig) -> Self {
        Self {
            deck,
            config,
            touched: false,
        }
    }

    pub fn touch<E: Engine + ?Sized>(&mut self, engine: &mut E, touched: bool) {
        if touched == self.touched {
            return;
        }
        self.touched = touched;
        let deck = self.deck;
        if touched {
            engine.send(EngineCommand::ScratchEnable {
                deck,
                params: self.config.scratch_params(),
            });
        } else {
            engine.send(EngineCommand::ScratchDisable { deck });
        }
    }

    /// Top-surface rotation; falls back to pitch bend if the touch was missed
    pub fn scratch<E: Engine + ?Sized>(&mut self, engine: &mut E, delta: i32) {
        if self.touched {
            engine.send(EngineCommand::ScratchTick {
                deck: self.deck,
                delta,
            });
        } else {
            self.bend(engine, delta);
        }
    }

    pub fn bend<E: Engine + ?Sized>(&mut self, engine: &mut E, delta: i32) {
        engine.send(EngineCommand::Jog {
            deck: self.deck,
            amount: delta as f64 * self.config.bend_sensitivity,
        });
    }
}
