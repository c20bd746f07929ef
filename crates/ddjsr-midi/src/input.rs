//! MIDI input handling
//!
//! Receives raw bytes in the midir callback, decodes them with the fixed
//! map, and forwards typed messages to the host thread via a flume channel.

use crate::connection::{find_input_port, MidiConnectionError};
use crate::mapping::{decode, MappingError};
use ddjsr_core::ControllerInput;
use flume::Sender;
use midir::MidiInputConnection;

/// Message from the MIDI driver thread to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerMessage {
    /// Decoded control input
    Input(ControllerInput),
    /// Input the map refuses; the host surfaces it as an error
    Fault(MappingError),
}

/// Callback data passed to midir
struct CallbackData {
    message_tx: Sender<ControllerMessage>,
}

/// MIDI input handler
///
/// Owns the midir connection; dropping it closes the port.
pub struct MidiInputHandler {
    _connection: MidiInputConnection<CallbackData>,
    port_name: String,
}

impl MidiInputHandler {
    /// Connect to the input port matching `port_match`
    pub fn connect(port_match: &str, message_tx: Sender<ControllerMessage>) -> Result<Self, MidiConnectionError> {
        let (midi_in, port, port_name) = find_input_port(port_match)?;

        let connection = midi_in
            .connect(&port, "ddjsr-midi-input", Self::midi_callback, CallbackData { message_tx })
            .map_err(|e| MidiConnectionError::ConnectionError(e.to_string()))?;

        log::info!("MIDI: Input handler connected to {}", port_name);

        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Called from the MIDI driver thread. Must not block.
    fn midi_callback(_timestamp: u64, data: &[u8], callback_data: &mut CallbackData) {
        if let Some(message) = translate(data) {
            if callback_data.message_tx.try_send(message).is_err() {
                log::warn!("MIDI input: channel full, dropping message {:02x?}", data);
            }
        }
    }
}

/// Raw bytes to a host message, `None` for unmapped input
fn translate(data: &[u8]) -> Option<ControllerMessage> {
    match decode(data) {
        Ok(Some(input)) => {
            log::debug!("[MIDI IN] {:02x?} -> {:?}", data, input);
            Some(ControllerMessage::Input(input))
        }
        Ok(None) => {
            log::trace!("[MIDI IN] unmapped {:02x?}", data);
            None
        }
        Err(e) => {
            log::error!("[MIDI IN] {}", e);
            Some(ControllerMessage::Fault(e))
        }
    }
}
