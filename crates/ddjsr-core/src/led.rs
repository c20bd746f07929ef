//! LED feedback queue
//!
//! Deck logic records LED changes here as they happen; the protocol output
//! drains them and encodes bytes for the device. Changes are kept in order
//! so a pad switched off and on again within one callback ends up on.

use crate::types::NUM_PADS;

/// Which pad page an LED belongs to
///
/// The DDJ-SR lights each pad mode's page on separate notes, so the same
/// physical pad has one LED address per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadPage {
    HotCue,
    Roll,
    Slicer,
    Sampler,
}

/// LED on a deck section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    /// Play/pause button
    Play,
    /// Performance pad on a given page (pad 0-7)
    Pad { page: PadPage, pad: usize },
}

/// Single LED state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedChange {
    pub led: Led,
    pub on: bool,
}

/// Ordered queue of pending LED changes for one deck
#[derive(Debug, Default)]
pub struct LedQueue {
    changes: Vec<LedChange>,
}

impl LedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an LED change
    pub fn set(&mut self, led: Led, on: bool) {
        self.changes.push(LedChange { led, on });
    }

    /// Light or darken the slicer pad for `slice`, wrapped into 0-7
    ///
    /// Slice numbers may be negative or past the window (pre-roll and the
    /// beat after a wrap), so they are folded onto the 8 physical pads.
    pub fn slicer_pad(&mut self, slice: i64, on: bool) {
        let pad = slice.rem_euclid(NUM_PADS as i64) as usize;
        self.set(
            Led::Pad {
                page: PadPage::Slicer,
                pad,
            },
            on,
        );
    }

    /// Set every slicer pad to the same state
    pub fn slicer_all(&mut self, on: bool) {
        for pad in 0..NUM_PADS {
            self.set(
                Led::Pad {
                    page: PadPage::Slicer,
                    pad,
                },
                on,
            );
        }
    }

    /// Take all pending changes, oldest first
    pub fn drain(&mut self) -> Vec<LedChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
