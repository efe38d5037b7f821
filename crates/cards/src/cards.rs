// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Card and pattern definitions.
use std::{fmt, str::FromStr};

use crate::DeckError;

/// A card, only its color matters in a Penney game.
///
/// Black cards are the `0` symbols and red cards are the `1` symbols of a
/// binary deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Card {
    /// A black card (0).
    Black = 0,
    /// A red card (1).
    Red = 1,
}

impl Card {
    /// The card symbol, 0 for black and 1 for red.
    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Card {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Card::Black),
            1 => Ok(Card::Red),
            v => Err(v),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

/// A 3-card pattern a player commits to before play.
///
/// There are exactly 8 patterns indexed by their value read most significant
/// bit first, so `Pattern(3)` is black, red, red (`011`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern(u8);

impl Pattern {
    /// The number of distinct patterns.
    pub const COUNT: usize = 8;

    /// The number of cards in a pattern.
    pub const LEN: usize = 3;

    /// Returns all patterns in index order.
    pub fn all() -> impl DoubleEndedIterator<Item = Pattern> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Pattern)
    }

    /// The pattern canonical index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The pattern cards in play order.
    pub fn cards(self) -> [Card; 3] {
        let card = |shift: u8| {
            if (self.0 >> shift) & 1 == 1 {
                Card::Red
            } else {
                Card::Black
            }
        };

        [card(2), card(1), card(0)]
    }

    /// Checks if a window of 3 cards equals this pattern.
    #[inline]
    pub fn matches(self, window: &[Card]) -> bool {
        debug_assert_eq!(window.len(), Self::LEN);
        ((window[0].bit() << 2) | (window[1].bit() << 1) | window[2].bit()) == self.0
    }
}

impl TryFrom<u8> for Pattern {
    type Error = DeckError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < Self::COUNT {
            Ok(Pattern(value))
        } else {
            Err(DeckError::Pattern(value.to_string()))
        }
    }
}

impl FromStr for Pattern {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN {
            return Err(DeckError::Pattern(s.to_string()));
        }

        s.bytes().try_fold(Pattern(0), |p, b| match b {
            b'0' => Ok(Pattern(p.0 << 1)),
            b'1' => Ok(Pattern((p.0 << 1) | 1)),
            _ => Err(DeckError::Pattern(s.to_string())),
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:03b}", self.0))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:03b})", self.0)
    }
}
