//! Fixed DDJ-SR MIDI map
//!
//! Decodes raw MIDI bytes into protocol-agnostic [`ControllerInput`]s and
//! maps LEDs back to note addresses.
//!
//! # Layout
//!
//! ```text
//! Deck channel n (0-3), status 0x90+n / 0xB0+n:
//!   notes  PLAY 0x0B, CUE 0x0C, SYNC 0x58, PFL 0x54, KEYLOCK 0x1A, SHIFT 0x3F
//!          JOG TOUCH 0x36, pad mode HOT CUE 0x1B / ROLL 0x1E / SLICER 0x20 / SAMPLER 0x22
//!   CCs    TEMPO MSB 0x00 / LSB 0x20, JOG top 0x22 / edge 0x21 (relative, 0x40 = still)
//!
//! Pad channel n+8 (status 0x98+n):
//!   HOT CUE 0x00-0x07, ROLL 0x10-0x17, SLICER 0x20-0x27, SAMPLER 0x30-0x37
//!
//! Browser channel 6:
//!   0xB6 0x40 encoder turn (7-bit two's complement), 0x96 0x41 encoder push
//!   0x96 0x46-0x49 LOAD deck 1-4
//! ```

use ddjsr_core::{ControllerInput, DeckId, DeckInput, Led, LibraryInput, PadModeButton, PadPage, NUM_DECKS, NUM_PADS};
use midly::live::LiveEvent;
use midly::MidiMessage;

/// DDJ-SR control numbers
pub struct DdjSrMap;

impl DdjSrMap {
    // === Deck channel notes ===
    pub const PLAY: u8 = 0x0B;
    pub const CUE: u8 = 0x0C;
    pub const SYNC: u8 = 0x58;
    pub const PFL: u8 = 0x54;
    pub const KEYLOCK: u8 = 0x1A;
    pub const SHIFT: u8 = 0x3F;
    pub const JOG_TOUCH: u8 = 0x36;
    pub const MODE_HOT_CUE: u8 = 0x1B;
    pub const MODE_ROLL: u8 = 0x1E;
    pub const MODE_SLICER: u8 = 0x20;
    pub const MODE_SAMPLER: u8 = 0x22;

    // === Deck channel CCs ===
    pub const TEMPO_MSB: u8 = 0x00;
    pub const TEMPO_LSB: u8 = 0x20;
    pub const JOG_BEND: u8 = 0x21;
    pub const JOG_SCRATCH: u8 = 0x22;

    // === Pad channel ===
    /// Pads for deck n are on MIDI channel n + 8
    pub const PAD_CHANNEL_OFFSET: u8 = 8;
    pub const PAGE_HOT_CUE: u8 = 0x00;
    pub const PAGE_ROLL: u8 = 0x10;
    pub const PAGE_SLICER: u8 = 0x20;
    pub const PAGE_SAMPLER: u8 = 0x30;

    // === Browser channel ===
    pub const BROWSER_CHANNEL: u8 = 6;
    pub const ENCODER_ROTATE: u8 = 0x40;
    pub const ENCODER_PUSH: u8 = 0x41;
    /// LOAD for deck n is note 0x46 + n
    pub const LOAD_BASE: u8 = 0x46;

    pub const LED_ON: u8 = 0x7F;
    pub const LED_OFF: u8 = 0x00;

    /// First note of a pad page
    pub fn page_base(page: PadPage) -> u8 {
        match page {
            PadPage::HotCue => Self::PAGE_HOT_CUE,
            PadPage::Roll => Self::PAGE_ROLL,
            PadPage::Slicer => Self::PAGE_SLICER,
            PadPage::Sampler => Self::PAGE_SAMPLER,
        }
    }

    /// Note-on status byte and note number lighting `led` on `deck`
    pub fn led_address(deck: DeckId, led: Led) -> (u8, u8) {
        let channel = deck.0 as u8;
        match led {
            Led::Play => (0x90 | channel, Self::PLAY),
            Led::Pad { page, pad } => (
                0x90 | (channel + Self::PAD_CHANNEL_OFFSET),
                Self::page_base(page) + pad as u8,
            ),
        }
    }
}

/// Input that the fixed map cannot interpret
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A message reached the library encoder with a status it does not handle.
    /// The connected device does not match the DDJ-SR map.
    #[error("undefined status code {status:#04x} for library encoder control {control:#04x}")]
    UndefinedInput { status: u8, control: u8 },
}

/// Channel-voice message reduced to what the map needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Voice {
    Note { channel: u8, note: u8, velocity: u8 },
    Cc { channel: u8, cc: u8, value: u8 },
}

impl Voice {
    fn parse(data: &[u8]) -> Option<Self> {
        let LiveEvent::Midi { channel, message } = LiveEvent::parse(data).ok()? else {
            return None;
        };
        let channel = channel.as_int();
        match message {
            MidiMessage::NoteOn { key, vel } => Some(Self::Note {
                channel,
                note: key.as_int(),
                velocity: vel.as_int(),
            }),
            MidiMessage::NoteOff { key, .. } => Some(Self::Note {
                channel,
                note: key.as_int(),
                velocity: 0,
            }),
            MidiMessage::Controller { controller, value } => Some(Self::Cc {
                channel,
                cc: controller.as_int(),
                value: value.as_int(),
            }),
            _ => None,
        }
    }
}

/// Relative jog value around 0x40
pub fn jog_delta(value: u8) -> i32 {
    value as i32 - 0x40
}

/// Encoder value as 7-bit two's complement
pub fn encoder_delta(value: u8) -> i32 {
    if value & 0x40 != 0 {
        value as i32 - 0x80
    } else {
        value as i32
    }
}

/// Decode raw MIDI bytes
///
/// Returns `Ok(None)` for messages that are not part of the map (shifted
/// note variants, clock, sysex).
pub fn decode(data: &[u8]) -> Result<Option<ControllerInput>, MappingError> {
    let Some(voice) = Voice::parse(data) else {
        return Ok(None);
    };

    let (channel, control) = match voice {
        Voice::Note { channel, note, .. } => (channel, note),
        Voice::Cc { channel, cc, .. } => (channel, cc),
    };
    if channel == DdjSrMap::BROWSER_CHANNEL
        && (control == DdjSrMap::ENCODER_ROTATE || control == DdjSrMap::ENCODER_PUSH)
    {
        return decode_library_encoder(data[0], control, data.get(2).copied().unwrap_or(0)).map(Some);
    }

    Ok(match voice {
        Voice::Note {
            channel,
            note,
            velocity,
        } => decode_note(channel, note, velocity > 0),
        Voice::Cc { channel, cc, value } => decode_cc(channel, cc, value),
    })
}

/// Library encoder dispatch by status byte
fn decode_library_encoder(status: u8, control: u8, value: u8) -> Result<ControllerInput, MappingError> {
    match status {
        0xB6 => Ok(ControllerInput::Library(LibraryInput::Rotate(encoder_delta(value)))),
        0x96 => Ok(ControllerInput::Library(LibraryInput::Push(value > 0))),
        _ => Err(MappingError::UndefinedInput { status, control }),
    }
}

fn decode_note(channel: u8, note: u8, pressed: bool) -> Option<ControllerInput> {
    let num_decks = NUM_DECKS as u8;

    if channel < num_decks {
        let input = match note {
            DdjSrMap::PLAY => DeckInput::Play(pressed),
            DdjSrMap::CUE => DeckInput::Cue(pressed),
            DdjSrMap::SYNC => DeckInput::Sync(pressed),
            DdjSrMap::PFL => DeckInput::Pfl(pressed),
            DdjSrMap::KEYLOCK => DeckInput::Keylock(pressed),
            DdjSrMap::SHIFT => DeckInput::Shift(pressed),
            DdjSrMap::JOG_TOUCH => DeckInput::JogTouch(pressed),
            DdjSrMap::MODE_HOT_CUE => mode_select(PadModeButton::HotCue, pressed),
            DdjSrMap::MODE_ROLL => mode_select(PadModeButton::Roll, pressed),
            DdjSrMap::MODE_SLICER => mode_select(PadModeButton::Slicer, pressed),
            DdjSrMap::MODE_SAMPLER => mode_select(PadModeButton::Sampler, pressed),
            _ => return None,
        };
        return Some(deck_input(channel, input));
    }

    let pad_channels = DdjSrMap::PAD_CHANNEL_OFFSET..DdjSrMap::PAD_CHANNEL_OFFSET + num_decks;
    if pad_channels.contains(&channel) {
        let page = note & 0xF0;
        let pad = (note & 0x0F) as usize;
        let known_page = matches!(
            page,
            DdjSrMap::PAGE_HOT_CUE | DdjSrMap::PAGE_ROLL | DdjSrMap::PAGE_SLICER | DdjSrMap::PAGE_SAMPLER
        );
        if !known_page || pad >= NUM_PADS {
            return None;
        }
        return Some(deck_input(
            channel - DdjSrMap::PAD_CHANNEL_OFFSET,
            DeckInput::Pad { pad, pressed },
        ));
    }

    if channel == DdjSrMap::BROWSER_CHANNEL
        && (DdjSrMap::LOAD_BASE..DdjSrMap::LOAD_BASE + num_decks).contains(&note)
    {
        return Some(deck_input(note - DdjSrMap::LOAD_BASE, DeckInput::Load(pressed)));
    }

    None
}

fn decode_cc(channel: u8, cc: u8, value: u8) -> Option<ControllerInput> {
    if channel >= NUM_DECKS as u8 {
        return None;
    }
    let input = match cc {
        DdjSrMap::TEMPO_MSB => DeckInput::TempoCoarse(value),
        DdjSrMap::TEMPO_LSB => DeckInput::TempoFine(value),
        DdjSrMap::JOG_SCRATCH => DeckInput::JogScratch(jog_delta(value)),
        DdjSrMap::JOG_BEND => DeckInput::JogBend(jog_delta(value)),
        _ => return None,
    };
    Some(deck_input(channel, input))
}

fn mode_select(button: PadModeButton, pressed: bool) -> DeckInput {
    DeckInput::PadModeSelect { button, pressed }
}

fn deck_input(channel: u8, input: DeckInput) -> ControllerInput {
    ControllerInput::Deck {
        deck: DeckId(channel as usize),
        input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize, input: DeckInput) -> Option<ControllerInput> {
        Some(ControllerInput::Deck {
            deck: DeckId(n),
            input,
        })
    }

    #[test]
    fn test_transport_notes() {
        assert_eq!(decode(&[0x90, 0x0B, 0x7F]), Ok(deck(0, DeckInput::Play(true))));
        assert_eq!(decode(&[0x92, 0x0B, 0x00]), Ok(deck(2, DeckInput::Play(false))));
        assert_eq!(decode(&[0x81, 0x0C, 0x40]), Ok(deck(1, DeckInput::Cue(false))));
        assert_eq!(decode(&[0x93, 0x3F, 0x7F]), Ok(deck(3, DeckInput::Shift(true))));
        assert_eq!(decode(&[0x90, 0x58, 0x7F]), Ok(deck(0, DeckInput::Sync(true))));
    }

    #[test]
    fn test_pad_mode_buttons() {
        assert_eq!(
            decode(&[0x91, 0x20, 0x7F]),
            Ok(deck(
                1,
                DeckInput::PadModeSelect {
                    button: PadModeButton::Slicer,
                    pressed: true
                }
            ))
        );
        assert_eq!(
            decode(&[0x90, 0x1E, 0x00]),
            Ok(deck(
                0,
                DeckInput::PadModeSelect {
                    button: PadModeButton::Roll,
                    pressed: false
                }
            ))
        );
    }

    #[test]
    fn test_pads_all_pages() {
        assert_eq!(
            decode(&[0x98, 0x03, 0x7F]),
            Ok(deck(0, DeckInput::Pad { pad: 3, pressed: true }))
        );
        assert_eq!(
            decode(&[0x9B, 0x27, 0x7F]),
            Ok(deck(3, DeckInput::Pad { pad: 7, pressed: true }))
        );
        assert_eq!(
            decode(&[0x99, 0x15, 0x00]),
            Ok(deck(1, DeckInput::Pad { pad: 5, pressed: false }))
        );
        // Outside any page or past pad 8
        assert_eq!(decode(&[0x98, 0x08, 0x7F]), Ok(None));
        assert_eq!(decode(&[0x98, 0x40, 0x7F]), Ok(None));
    }

    #[test]
    fn test_tempo_and_jog() {
        assert_eq!(decode(&[0xB0, 0x00, 0x40]), Ok(deck(0, DeckInput::TempoCoarse(0x40))));
        assert_eq!(decode(&[0xB1, 0x20, 0x11]), Ok(deck(1, DeckInput::TempoFine(0x11))));
        assert_eq!(decode(&[0xB2, 0x22, 0x43]), Ok(deck(2, DeckInput::JogScratch(3))));
        assert_eq!(decode(&[0xB3, 0x21, 0x3E]), Ok(deck(3, DeckInput::JogBend(-2))));
        assert_eq!(decode(&[0x90, 0x36, 0x7F]), Ok(deck(0, DeckInput::JogTouch(true))));
    }

    #[test]
    fn test_library_encoder() {
        assert_eq!(
            decode(&[0xB6, 0x40, 0x01]),
            Ok(Some(ControllerInput::Library(LibraryInput::Rotate(1))))
        );
        assert_eq!(
            decode(&[0xB6, 0x40, 0x7F]),
            Ok(Some(ControllerInput::Library(LibraryInput::Rotate(-1))))
        );
        assert_eq!(
            decode(&[0x96, 0x41, 0x7F]),
            Ok(Some(ControllerInput::Library(LibraryInput::Push(true))))
        );
        assert_eq!(
            decode(&[0x96, 0x41, 0x00]),
            Ok(Some(ControllerInput::Library(LibraryInput::Push(false))))
        );
    }

    #[test]
    fn test_library_encoder_undefined_status() {
        assert_eq!(
            decode(&[0x86, 0x41, 0x00]),
            Err(MappingError::UndefinedInput {
                status: 0x86,
                control: 0x41
            })
        );
    }

    #[test]
    fn test_load_buttons() {
        assert_eq!(decode(&[0x96, 0x46, 0x7F]), Ok(deck(0, DeckInput::Load(true))));
        assert_eq!(decode(&[0x96, 0x49, 0x7F]), Ok(deck(3, DeckInput::Load(true))));
    }

    #[test]
    fn test_unmapped_and_malformed() {
        assert_eq!(decode(&[0x90, 0x47, 0x7F]), Ok(None));
        assert_eq!(decode(&[0xB5, 0x00, 0x10]), Ok(None));
        assert_eq!(decode(&[0xF8]), Ok(None));
        assert_eq!(decode(&[]), Ok(None));
        assert_eq!(decode(&[0x90, 0x0B]), Ok(None));
    }

    #[test]
    fn test_encoder_delta() {
        assert_eq!(encoder_delta(0x00), 0);
        assert_eq!(encoder_delta(0x3F), 63);
        assert_eq!(encoder_delta(0x40), -64);
        assert_eq!(encoder_delta(0x7E), -2);
    }

    #[test]
    fn test_led_address() {
        assert_eq!(DdjSrMap::led_address(DeckId(1), Led::Play), (0x91, 0x0B));
        assert_eq!(
            DdjSrMap::led_address(
                DeckId(2),
                Led::Pad {
                    page: PadPage::Slicer,
                    pad: 5
                }
            ),
            (0x9A, 0x25)
        );
    }
}
