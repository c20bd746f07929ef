//! Playback engine seam
//!
//! The mapping never owns audio. It reads transport state through the
//! [`Engine`] trait, issues [`EngineCommand`]s, and receives notifications
//! as [`EngineEvent`]s that the host feeds back in on the same thread.
//!
//! Notifications are opt-in: a component calls [`Engine::connect`] for a
//! signal and receives events for it until it hands the [`Connection`] back
//! to [`Engine::disconnect`]. The host may deliver events for signals nobody
//! is connected to; decks ignore those by checking their own connections.

mod command;

pub use command::{EngineCommand, ScratchParams};

use crate::types::DeckId;

/// Engine notification kinds a deck can connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineSignal {
    /// Normalized playback position changed (high rate)
    Position,
    /// Track duration changed (track loaded or ejected)
    Duration,
    /// Play state changed
    PlayState,
}

/// Handle for a live signal connection
///
/// Not `Clone`: each connection has exactly one owner, who gives it back
/// through [`Engine::disconnect`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Engine-assigned connection id
    pub id: u64,
    /// Deck the connection is bound to
    pub deck: DeckId,
    /// Which signal is delivered
    pub signal: EngineSignal,
}

/// Notification delivered from the engine to the mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Playback position changed (normalized 0.0-1.0)
    PositionChanged { deck: DeckId, position: f64 },
    /// Track duration changed, in seconds
    DurationChanged { deck: DeckId, duration: f64 },
    /// Play state changed
    PlayStateChanged { deck: DeckId, playing: bool },
    /// A hot cue was set or cleared
    HotcueChanged { deck: DeckId, slot: usize, set: bool },
}

impl EngineEvent {
    /// Deck this event belongs to
    pub fn deck(&self) -> DeckId {
        match self {
            Self::PositionChanged { deck, .. }
            | Self::DurationChanged { deck, .. }
            | Self::PlayStateChanged { deck, .. }
            | Self::HotcueChanged { deck, .. } => *deck,
        }
    }

    /// Signal kind this event is delivered under (hot cue changes are always delivered)
    pub fn signal(&self) -> Option<EngineSignal> {
        match self {
            Self::PositionChanged { .. } => Some(EngineSignal::Position),
            Self::DurationChanged { .. } => Some(EngineSignal::Duration),
            Self::PlayStateChanged { .. } => Some(EngineSignal::PlayState),
            Self::HotcueChanged { .. } => None,
        }
    }
}

/// Playback engine as seen by the controller mapping
///
/// All calls happen on the host's control thread; implementations are not
/// expected to be re-entrant.
pub trait Engine {
    /// Normalized playback position (0.0-1.0)
    fn playback_position(&self, deck: DeckId) -> f64;
    /// Current tempo in beats per minute (0.0 when no track or no beatgrid)
    fn bpm(&self, deck: DeckId) -> f64;
    /// Track duration in seconds (0.0 when no track is loaded)
    fn track_duration(&self, deck: DeckId) -> f64;
    /// Sample offset of the detected beat closest to the playhead
    fn closest_beat_sample(&self, deck: DeckId) -> i64;
    /// Total number of samples in the loaded track
    fn track_samples(&self, deck: DeckId) -> i64;
    /// Whether the deck is playing
    fn is_playing(&self, deck: DeckId) -> bool;
    /// Whether a loop is currently enabled on the deck
    fn loop_enabled(&self, deck: DeckId) -> bool;
    /// Whether quantize is currently enabled on the deck
    fn quantize_enabled(&self, deck: DeckId) -> bool;

    /// Apply a command
    fn send(&mut self, command: EngineCommand);

    /// Start delivering `signal` events for `deck`
    fn connect(&mut self, deck: DeckId, signal: EngineSignal) -> Connection;
    /// Stop delivering events for a connection
    fn disconnect(&mut self, connection: Connection);
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording engine used by unit tests across the crate

    use super::*;
    use std::collections::HashSet;

    /// Per-deck transport values reported by [`MockEngine`]
    #[derive(Debug, Clone, Default)]
    pub struct MockDeck {
        pub position: f64,
        pub bpm: f64,
        pub duration: f64,
        pub closest_beat: i64,
        pub samples: i64,
        pub playing: bool,
        pub loop_enabled: bool,
        pub quantize: bool,
    }

    /// Engine double that records commands and connection lifecycle
    #[derive(Debug, Default)]
    pub struct MockEngine {
        pub decks: [MockDeck; crate::types::NUM_DECKS],
        pub commands: Vec<EngineCommand>,
        pub live: HashSet<(u64, DeckId, EngineSignal)>,
        pub disconnects: usize,
        next_id: u64,
    }

    impl MockEngine {
        /// Engine with a 128 BPM, 240 s track on every deck
        pub fn with_track() -> Self {
            let mut engine = Self::default();
            for deck in engine.decks.iter_mut() {
                deck.bpm = 128.0;
                deck.duration = 240.0;
                deck.samples = 240 * 44_100 * 2;
                deck.closest_beat = deck.samples / 10;
                deck.position = 0.1;
            }
            engine
        }

        pub fn deck_mut(&mut self, deck: DeckId) -> &mut MockDeck {
            &mut self.decks[deck.0]
        }

        pub fn is_connected(&self, deck: DeckId, signal: EngineSignal) -> bool {
            self.live.iter().any(|(_, d, s)| *d == deck && *s == signal)
        }

        pub fn take_commands(&mut self) -> Vec<EngineCommand> {
            std::mem::take(&mut self.commands)
        }

        pub fn beat_jumps(&self) -> Vec<i32> {
            self.commands
                .iter()
                .filter_map(|c| match c {
                    EngineCommand::BeatJump { beats, .. } => Some(*beats),
                    _ => None,
                })
                .collect()
        }
    }

    impl Engine for MockEngine {
        fn playback_position(&self, deck: DeckId) -> f64 {
            self.decks[deck.0].position
        }
        fn bpm(&self, deck: DeckId) -> f64 {
            self.decks[deck.0].bpm
        }
        fn track_duration(&self, deck: DeckId) -> f64 {
            self.decks[deck.0].duration
        }
        fn closest_beat_sample(&self, deck: DeckId) -> i64 {
            self.decks[deck.0].closest_beat
        }
        fn track_samples(&self, deck: DeckId) -> i64 {
            self.decks[deck.0].samples
        }
        fn is_playing(&self, deck: DeckId) -> bool {
            self.decks[deck.0].playing
        }
        fn loop_enabled(&self, deck: DeckId) -> bool {
            self.decks[deck.0].loop_enabled
        }
        fn quantize_enabled(&self, deck: DeckId) -> bool {
            self.decks[deck.0].quantize
        }

        fn send(&mut self, command: EngineCommand) {
            if let Some(deck) = command.deck() {
                let state = &mut self.decks[deck.0];
                match &command {
                    EngineCommand::SetQuantize { enabled, .. } => state.quantize = *enabled,
                    EngineCommand::BeatloopActivate { .. } => state.loop_enabled = true,
                    EngineCommand::ReloopExit { .. } => state.loop_enabled = false,
                    _ => {}
                }
            }
            self.commands.push(command);
        }

        fn connect(&mut self, deck: DeckId, signal: EngineSignal) -> Connection {
            self.next_id += 1;
            self.live.insert((self.next_id, deck, signal));
            Connection { id: self.next_id, deck, signal }
        }

        fn disconnect(&mut self, connection: Connection) {
            let removed = self
                .live
                .remove(&(connection.id, connection.deck, connection.signal));
            assert!(removed, "disconnect of unknown connection {:?}", connection);
            self.disconnects += 1;
        }
    }
}
