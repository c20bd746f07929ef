//! Common types for the DDJ-SR mapping
//!
//! Deck identifiers and the fixed sizes of the controller surface.

use std::fmt;

/// Number of decks addressable from the controller
pub const NUM_DECKS: usize = 4;

/// Number of performance pads per deck
pub const NUM_PADS: usize = 8;

/// Deck identifier (0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeckId(pub usize);

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deck {}", self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(DeckId(0).to_string(), "deck 1");
        assert_eq!(DeckId(NUM_DECKS - 1).to_string(), "deck 4");
    }
}
