//! DDJ-SR Core - deck logic for the Pioneer DDJ-SR controller mapping
//!
//! This crate is protocol-agnostic: it takes decoded [`ControllerInput`]s
//! and [`EngineEvent`]s, drives the playback engine through the [`Engine`]
//! trait, and queues LED changes for the protocol layer to send.
//!
//! # Architecture
//!
//! ```text
//! ControllerInput ─┐
//!                  ├→ Surface → Deck ─┬→ PadModeCoordinator → Slicer
//! EngineEvent ─────┘                  ├→ JogWheel / tempo / transport
//!                                     └→ LedQueue → (ddjsr-midi output)
//!                           EngineCommand ←┘
//! ```
//!
//! Everything runs on the host's control thread, one event at a time.

pub mod beat_clock;
pub mod config;
pub mod deck;
pub mod engine;
pub mod input;
pub mod jog;
pub mod led;
pub mod pad_mode;
pub mod slicer;
pub mod surface;
pub mod types;

pub use beat_clock::ClockUnavailable;
pub use config::{DeckConfig, JogConfig};
pub use deck::Deck;
pub use engine::{Connection, Engine, EngineCommand, EngineEvent, EngineSignal, ScratchParams};
pub use input::{ControllerInput, DeckInput, LibraryInput, PadModeButton};
pub use led::{Led, LedChange, PadPage};
pub use pad_mode::{PadMode, PadModeCoordinator};
pub use slicer::{Slicer, SlicerMode};
pub use surface::Surface;
pub use types::*;
