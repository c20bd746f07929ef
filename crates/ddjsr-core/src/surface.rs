//! Whole controller surface: four decks plus the library encoder

use crate::config::DeckConfig;
use crate::deck::Deck;
use crate::engine::{Engine, EngineCommand, EngineEvent};
use crate::input::{ControllerInput, LibraryInput};
use crate::led::LedChange;
use crate::types::{DeckId, NUM_DECKS};

pub struct Surface {
    decks: [Deck; NUM_DECKS],
}

impl Surface {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            decks: std::array::from_fn(|i| Deck::new(DeckId(i), config)),
        }
    }

    pub fn deck(&self, id: DeckId) -> &Deck {
        &self.decks[id.0]
    }

    /// Connect every deck's permanent listeners
    pub fn attach<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        for deck in self.decks.iter_mut() {
            deck.attach(engine);
        }
        log::info!("surface: attached {} decks", NUM_DECKS);
    }

    /// Release every connection (shutdown)
    pub fn detach<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        for deck in self.decks.iter_mut() {
            deck.detach(engine);
        }
    }

    pub fn handle_input<E: Engine + ?Sized>(&mut self, engine: &mut E, input: ControllerInput) {
        match input {
            ControllerInput::Deck { deck, input } => match self.decks.get_mut(deck.0) {
                Some(target) => target.handle_input(engine, input),
                None => log::warn!("surface: input for unknown {}", deck),
            },
            ControllerInput::Library(LibraryInput::Rotate(delta)) => {
                if delta != 0 {
                    engine.send(EngineCommand::LibraryMoveVertical { delta });
                }
            }
            ControllerInput::Library(LibraryInput::Push(true)) => {
                engine.send(EngineCommand::LibraryMoveFocusForward);
            }
            ControllerInput::Library(LibraryInput::Push(false)) => {}
        }
    }

    pub fn handle_engine_event<E: Engine + ?Sized>(&mut self, engine: &mut E, event: EngineEvent) {
        match self.decks.get_mut(event.deck().0) {
            Some(deck) => deck.handle_engine_event(engine, event),
            None => log::warn!("surface: event for unknown {}", event.deck()),
        }
    }

    /// Take pending LED changes from every deck
    pub fn drain_leds(&mut self) -> Vec<(DeckId, LedChange)> {
        self.decks
            .iter_mut()
            .flat_map(|deck| {
                let id = deck.id();
                deck.drain_leds().into_iter().map(move |change| (id, change))
            })
            .collect()
    }
}
