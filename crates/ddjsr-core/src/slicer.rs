//! Performance-pad slicer
//!
//! Divides the track into a window of 8 one-beat slices anchored to the
//! detected beat nearest the playhead when the slicer starts. While running
//! it follows the playhead beat by beat:
//!
//! - Every beat boundary advances the slice index (0-7, wrapping).
//! - A pad press is remembered and applied at the *next* boundary by a
//!   relative beat jump, so playback is redirected to that slice without
//!   a mid-beat skip.
//! - Without input the playhead simply advances and no jump is issued.
//!
//! # Visual modes
//!
//! ```text
//! Continuous: window rolls forward 8 beats on wrap; only the playing pad is lit
//! Loop:       window stays put (playback jumps back 8 beats on wrap);
//!             all pads lit, the playing pad dark
//! ```
//!
//! The slicer also engages a one-beat loop just after each boundary and
//! drops it on the following position update. The loop never holds
//! playback; it only makes the engine's loop indicator flash on the beat.

use crate::beat_clock::{self, BeatPosition, ClockUnavailable};
use crate::engine::{Connection, Engine, EngineCommand, EngineSignal};
use crate::led::LedQueue;
use crate::types::{DeckId, NUM_PADS};

/// Number of slices in the window
pub const SLICER_NUM_SLICES: i64 = NUM_PADS as i64;

/// Beat progress after a boundary at which the cue loop is engaged
pub const CUE_LOOP_THRESHOLD: f64 = 1.0 / 32.0;

/// Slicer LED/anchor behavior, selected by the pad mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlicerMode {
    /// Window rolls with playback; the playing slice is lit
    #[default]
    Continuous,
    /// Window is fixed; all slices lit, the playing slice dark
    Loop,
}

impl SlicerMode {
    /// LED states for (departing, arriving) slice on a boundary
    fn boundary_leds(self) -> (bool, bool) {
        match self {
            SlicerMode::Continuous => (false, true),
            SlicerMode::Loop => (true, false),
        }
    }

    /// LED state for every pad when the mode is (re)entered
    fn grid_led(self) -> bool {
        self == SlicerMode::Loop
    }
}

/// Per-session bookkeeping, reset by every `start()`
#[derive(Debug, Clone, Default)]
struct SliceWindow {
    /// Normalized position of slice 0
    slice_start_pos: f64,
    /// Normalized distance covered by one beat
    position_per_beat: f64,
    /// Beat boundaries seen since the anchor, wrapped into 0-7
    slice_index: i64,
    /// Slice the slicer considers playing (negative during pre-roll)
    active_beat: i64,
    /// Pad pressed since the last boundary
    sampled_beat: Option<usize>,
    /// A boundary was crossed and the cue loop has not been shown yet
    beat_update: bool,
    /// The cue loop is engaged
    loop_on: bool,
}

impl SliceWindow {
    fn new(slice_start_pos: f64, position_per_beat: f64) -> Self {
        Self {
            slice_start_pos,
            position_per_beat,
            slice_index: -1,
            active_beat: -1,
            sampled_beat: None,
            beat_update: false,
            loop_on: false,
        }
    }
}

/// Beat-synchronized slicer for one deck
///
/// Running state is the presence of the position connection: there is at
/// most one per slicer, taken on `start()` and returned on `stop()`.
#[derive(Debug)]
pub struct Slicer {
    deck: DeckId,
    window: SliceWindow,
    position_listener: Option<Connection>,
}

impl Slicer {
    pub fn new(deck: DeckId) -> Self {
        Self {
            deck,
            window: SliceWindow::default(),
            position_listener: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.position_listener.is_some()
    }

    /// Normalized position of slice 0 of the current window
    pub fn slice_start_pos(&self) -> f64 {
        self.window.slice_start_pos
    }

    pub fn position_per_beat(&self) -> f64 {
        self.window.position_per_beat
    }

    pub fn slice_index(&self) -> i64 {
        self.window.slice_index
    }

    pub fn active_beat(&self) -> i64 {
        self.window.active_beat
    }

    /// Pad waiting to be applied at the next boundary
    pub fn sampled_beat(&self) -> Option<usize> {
        self.window.sampled_beat
    }

    /// Start a slicing session at the beat nearest the playhead
    ///
    /// Does nothing if already running. Fails without touching the engine
    /// when the deck has no usable beat clock.
    pub fn start<E: Engine + ?Sized>(&mut self, engine: &mut E) -> Result<(), ClockUnavailable> {
        if self.is_running() {
            log::debug!("slicer {}: start ignored, already running", self.deck);
            return Ok(());
        }

        let deck = self.deck;
        let position_per_beat =
            beat_clock::position_per_beat(engine.bpm(deck), engine.track_duration(deck))?;
        let anchor = beat_clock::nearest_beat_anchor(
            engine.closest_beat_sample(deck),
            engine.track_samples(deck),
        )?;

        self.window = SliceWindow::new(anchor, position_per_beat);
        engine.send(EngineCommand::SetQuantize {
            deck,
            enabled: true,
        });
        engine.send(EngineCommand::SetBeatloopSize { deck, beats: 1 });
        self.position_listener = Some(engine.connect(deck, EngineSignal::Position));

        log::info!(
            "slicer {}: STARTED (anchor={:.6}, position_per_beat={:.6})",
            deck,
            anchor,
            position_per_beat
        );
        Ok(())
    }

    /// End the session
    ///
    /// Disconnects the position listener, drops the cue loop and turns
    /// quantize back off. Calling it while stopped does nothing.
    pub fn stop<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        let Some(listener) = self.position_listener.take() else {
            return;
        };
        engine.disconnect(listener);
        if self.window.loop_on {
            self.exit_cue_loop(engine);
        }
        self.window.beat_update = false;
        engine.send(EngineCommand::SetQuantize {
            deck: self.deck,
            enabled: false,
        });
        log::info!("slicer {}: STOPPED", self.deck);
    }

    /// Switch between continuous and loop visuals without restarting
    ///
    /// Repaints the whole pad grid for `mode`; slice bookkeeping is kept.
    pub fn mode_toggle(&mut self, leds: &mut LedQueue, mode: SlicerMode) {
        leds.slicer_all(mode.grid_led());
        log::debug!("slicer {}: mode -> {:?}", self.deck, mode);
    }

    /// Pad input: a press selects the slice to play from the next boundary
    pub fn button_input(&mut self, pad: usize, pressed: bool) {
        if !pressed {
            return;
        }
        if pad >= NUM_PADS {
            log::warn!("slicer {}: pad {} out of range", self.deck, pad);
            return;
        }
        self.window.sampled_beat = Some(pad);
        log::debug!("slicer {}: pad {} queued for next beat", self.deck, pad);
    }

    /// Position listener body, run for every position update while running
    pub fn on_position<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        leds: &mut LedQueue,
        mode: SlicerMode,
        position: f64,
    ) {
        if !self.is_running() {
            return;
        }

        let BeatPosition {
            beat: mut track_beat,
            progress,
        } = beat_clock::beat_at(
            position,
            self.window.slice_start_pos,
            self.window.position_per_beat,
        );

        if self.window.beat_update && progress > CUE_LOOP_THRESHOLD {
            engine.send(EngineCommand::BeatloopActivate { deck: self.deck });
            self.window.loop_on = true;
            self.window.beat_update = false;
        } else if self.window.loop_on {
            self.exit_cue_loop(engine);
        }

        if track_beat == self.window.active_beat {
            return;
        }

        // Beat boundary
        let window = &mut self.window;
        window.beat_update = true;
        window.slice_index += 1;
        if window.slice_index >= SLICER_NUM_SLICES {
            window.slice_index -= SLICER_NUM_SLICES;
            if mode == SlicerMode::Continuous {
                window.slice_start_pos += SLICER_NUM_SLICES as f64 * window.position_per_beat;
                window.active_beat -= SLICER_NUM_SLICES;
                track_beat -= SLICER_NUM_SLICES;
            }
        }

        // Pre-roll never reaches here: slice_index starts at -1 and was just incremented
        let next_active_beat = window
            .sampled_beat
            .take()
            .map_or(window.slice_index, |pad| pad as i64);

        if next_active_beat != track_beat {
            let beats = (next_active_beat - track_beat) as i32;
            log::debug!(
                "slicer {}: jump {} beats (track beat {} -> slice {})",
                self.deck,
                beats,
                track_beat,
                next_active_beat
            );
            engine.send(EngineCommand::BeatJump {
                deck: self.deck,
                beats,
            });
        }

        let (departing, arriving) = mode.boundary_leds();
        leds.slicer_pad(window.active_beat, departing);
        leds.slicer_pad(next_active_beat, arriving);
        window.active_beat = next_active_beat;
    }

    /// Track duration listener: a new track invalidates the session
    pub fn on_duration_changed<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        if self.is_running() {
            log::info!("slicer {}: track changed, stopping stale session", self.deck);
            self.stop(engine);
        }
    }

    /// Play-state listener
    ///
    /// Pausing ends the session, so seeks made while paused are never taken
    /// for beat boundaries. Playing starts it again when a slicer mode is
    /// selected.
    pub fn on_play_state_changed<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        mode: Option<SlicerMode>,
        playing: bool,
    ) {
        if !playing {
            if self.is_running() {
                log::info!("slicer {}: paused, stopping session", self.deck);
                self.stop(engine);
            }
            return;
        }
        if mode.is_none() || self.is_running() {
            return;
        }
        if let Err(e) = self.start(engine) {
            log::debug!("slicer {}: not started on play: {}", self.deck, e);
        }
    }

    fn exit_cue_loop<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        if engine.loop_enabled(self.deck) {
            engine.send(EngineCommand::ReloopExit { deck: self.deck });
        }
        self.window.loop_on = false;
    }
}
