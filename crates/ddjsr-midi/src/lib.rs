//! MIDI controller support for the Pioneer DDJ-SR
//!
//! This crate provides:
//! - MIDI device connection and input handling via midir
//! - MIDI message parsing via midly against the fixed DDJ-SR map
//! - LED feedback output with change tracking
//! - YAML configuration for the port name and deck tunables
//!
//! # Architecture
//!
//! ```text
//! DDJ-SR → midir callback → decode → flume channel → MidiController::poll → Surface → Engine
//!                                                                    LED changes ↓
//! DDJ-SR ← MidiOutputHandler ←──────────────────────────────────────────────────┘
//! ```
//!
//! The midir callback only decodes and forwards. All deck logic runs on the
//! host's thread when it calls [`MidiController::poll`] and
//! [`MidiController::handle_engine_event`].

mod config;
mod connection;
mod input;
mod mapping;
mod output;

pub use config::{default_config_path, load_config, save_config, ControllerConfig};
pub use connection::{list_input_ports, list_output_ports, MidiConnectionError};
pub use input::{ControllerMessage, MidiInputHandler};
pub use mapping::{decode, DdjSrMap, MappingError};
pub use output::{MidiOutputHandler, MidiSink};

use ddjsr_core::{Engine, EngineEvent, Surface};
use flume::{Receiver, Sender};

/// Boxed LED output so the controller is not generic over the port type
type LedOutput = MidiOutputHandler<Box<dyn MidiSink + Send>>;

/// Main DDJ-SR controller manager
///
/// Owns the port connections and the deck logic. The host polls it with its
/// [`Engine`] and forwards engine notifications to it.
pub struct MidiController {
    config: ControllerConfig,
    message_rx: Receiver<ControllerMessage>,
    input_handler: Option<MidiInputHandler>,
    output_handler: Option<LedOutput>,
    surface: Surface,
}

/// Error type for MIDI controller operations
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("MIDI connection error: {0}")]
    ConnectionError(#[from] MidiConnectionError),

    /// The device sent input the fixed map does not define
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
}

impl MidiController {
    /// Create a controller from a config file (default path when `None`)
    ///
    /// Returns Ok even if no device is found (graceful degradation).
    pub fn new(config_path: Option<&std::path::Path>) -> Result<Self, MidiError> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(default_config_path);
        let config = load_config(&config_path);

        let (message_tx, message_rx) = flume::bounded(256);
        let mut controller = Self::with_parts(config, message_rx, None);
        controller.try_connect(message_tx);
        Ok(controller)
    }

    fn with_parts(
        config: ControllerConfig,
        message_rx: Receiver<ControllerMessage>,
        output_handler: Option<LedOutput>,
    ) -> Self {
        let surface = Surface::new(&config.deck);
        Self {
            config,
            message_rx,
            input_handler: None,
            output_handler,
            surface,
        }
    }

    fn try_connect(&mut self, message_tx: Sender<ControllerMessage>) {
        match MidiInputHandler::connect(&self.config.port_match, message_tx) {
            Ok(input_handler) => {
                log::info!("MIDI: Connected to device matching '{}'", self.config.port_match);
                self.input_handler = Some(input_handler);

                if let Some(out_conn) = connection::connect_output(&self.config.port_match) {
                    let sink: Box<dyn MidiSink + Send> = Box::new(out_conn);
                    self.output_handler = Some(MidiOutputHandler::new(sink));
                }
            }
            Err(e) => {
                log::info!(
                    "MIDI: No device found matching '{}' ({}), running without controller",
                    self.config.port_match,
                    e
                );
            }
        }
    }

    /// Check if a MIDI device is connected
    pub fn is_connected(&self) -> bool {
        self.input_handler.is_some()
    }

    pub fn port_name(&self) -> Option<&str> {
        self.input_handler.as_ref().map(|h| h.port_name())
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Connect the decks to the engine and light the initial LEDs
    pub fn attach<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        self.surface.attach(engine);
        self.flush_leds();
    }

    /// Process every pending controller message
    ///
    /// Returns the number of inputs handled. A mapping fault stops processing
    /// and is returned; messages after it stay queued.
    pub fn poll<E: Engine + ?Sized>(&mut self, engine: &mut E) -> Result<usize, MidiError> {
        let mut handled = 0;
        let result = loop {
            match self.message_rx.try_recv() {
                Ok(ControllerMessage::Input(input)) => {
                    self.surface.handle_input(engine, input);
                    handled += 1;
                }
                Ok(ControllerMessage::Fault(e)) => break Err(MidiError::Mapping(e)),
                Err(_) => break Ok(handled),
            }
        };
        self.flush_leds();
        result
    }

    /// Forward an engine notification to the owning deck
    pub fn handle_engine_event<E: Engine + ?Sized>(&mut self, engine: &mut E, event: EngineEvent) {
        self.surface.handle_engine_event(engine, event);
        self.flush_leds();
    }

    /// Release engine connections and switch the LEDs off
    pub fn shutdown<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        self.surface.detach(engine);
        self.flush_leds();
        if let Some(output) = self.output_handler.as_mut() {
            output.clear_all();
        }
        log::info!("MIDI: Controller shut down");
    }

    fn flush_leds(&mut self) {
        let changes = self.surface.drain_leds();
        if let Some(output) = self.output_handler.as_mut() {
            output.apply(&changes);
        }
    }
}
