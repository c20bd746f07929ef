//! MIDI output for LED feedback
//!
//! Encodes [`LedChange`]s from the deck logic into note-on messages. Values
//! are tracked per address so an LED already in the requested state is not
//! re-sent.

use crate::mapping::DdjSrMap;
use ddjsr_core::{DeckId, LedChange};
use midir::MidiOutputConnection;
use std::collections::HashMap;

/// Destination for raw MIDI output bytes
pub trait MidiSink {
    fn send_message(&mut self, message: &[u8]) -> Result<(), String>;
}

impl MidiSink for MidiOutputConnection {
    fn send_message(&mut self, message: &[u8]) -> Result<(), String> {
        self.send(message).map_err(|e| e.to_string())
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn send_message(&mut self, message: &[u8]) -> Result<(), String> {
        (**self).send_message(message)
    }
}

/// MIDI output handler for LED feedback
pub struct MidiOutputHandler<S: MidiSink> {
    sink: S,
    /// Last value sent per (status, note)
    last_values: HashMap<(u8, u8), u8>,
}

impl<S: MidiSink> MidiOutputHandler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last_values: HashMap::new(),
        }
    }

    /// Send the changes whose value differs from what the device last received
    pub fn apply(&mut self, changes: &[(DeckId, LedChange)]) {
        for (deck, change) in changes {
            let address = DdjSrMap::led_address(*deck, change.led);
            let value = if change.on { DdjSrMap::LED_ON } else { DdjSrMap::LED_OFF };
            if self.last_values.insert(address, value) == Some(value) {
                continue;
            }
            self.send_midi(address, value);
        }
    }

    /// Switch off every LED this handler has lit
    pub fn clear_all(&mut self) {
        let lit: Vec<(u8, u8)> = self
            .last_values
            .iter()
            .filter(|(_, value)| **value != DdjSrMap::LED_OFF)
            .map(|(address, _)| *address)
            .collect();
        for address in lit {
            self.send_midi(address, DdjSrMap::LED_OFF);
        }
        self.last_values.clear();
    }

    fn send_midi(&mut self, (status, note): (u8, u8), value: u8) {
        log::debug!("[MIDI OUT] status={:#04x} note={:#04x} val={}", status, note, value);
        if let Err(e) = self.sink.send_message(&[status, note, value]) {
            log::warn!("MIDI output: Failed to send message: {}", e);
        }
    }
}

impl<S: MidiSink> Drop for MidiOutputHandler<S> {
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddjsr_core::{Led, PadPage};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Vec<u8>>>>);

    impl MidiSink for Recorder {
        fn send_message(&mut self, message: &[u8]) -> Result<(), String> {
            self.0.borrow_mut().push(message.to_vec());
            Ok(())
        }
    }

    impl Recorder {
        fn take(&self) -> Vec<Vec<u8>> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    fn pad(deck: usize, pad: usize, on: bool) -> (DeckId, LedChange) {
        (
            DeckId(deck),
            LedChange {
                led: Led::Pad {
                    page: PadPage::Slicer,
                    pad,
                },
                on,
            },
        )
    }

    #[test]
    fn test_encoding() {
        let recorder = Recorder::default();
        let mut output = MidiOutputHandler::new(recorder.clone());
        output.apply(&[
            pad(1, 2, true),
            (
                DeckId(3),
                LedChange {
                    led: Led::Play,
                    on: true,
                },
            ),
        ]);
        assert_eq!(recorder.take(), vec![vec![0x99, 0x22, 0x7F], vec![0x93, 0x0B, 0x7F]]);
    }

    #[test]
    fn test_change_tracking() {
        let recorder = Recorder::default();
        let mut output = MidiOutputHandler::new(recorder.clone());
        output.apply(&[pad(0, 0, true), pad(0, 0, true)]);
        assert_eq!(recorder.take().len(), 1);

        output.apply(&[pad(0, 0, false), pad(0, 0, true)]);
        assert_eq!(recorder.take(), vec![vec![0x98, 0x20, 0x00], vec![0x98, 0x20, 0x7F]]);

        // First off for an untracked LED is still sent
        output.apply(&[pad(0, 5, false)]);
        assert_eq!(recorder.take(), vec![vec![0x98, 0x25, 0x00]]);
    }

    #[test]
    fn test_drop_clears_lit_leds() {
        let recorder = Recorder::default();
        {
            let mut output = MidiOutputHandler::new(recorder.clone());
            output.apply(&[pad(2, 1, true), pad(2, 3, false)]);
            recorder.take();
        }
        assert_eq!(recorder.take(), vec![vec![0x9A, 0x21, 0x00]]);
    }
}
