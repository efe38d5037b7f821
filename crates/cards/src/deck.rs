// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Balanced two colors decks and deck sources.
use rand::prelude::*;
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::Card;

/// Error raised when building decks or patterns from untrusted input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// The deck doesn't have 52 cards.
    #[error("deck has {len} cards, expected {}", Deck::SIZE)]
    Length {
        /// The number of cards found.
        len: usize,
    },
    /// The deck doesn't have the same number of black and red cards.
    #[error("deck has {red} red cards, expected {}", Deck::HALF)]
    Balance {
        /// The number of red cards found.
        red: usize,
    },
    /// A symbol is not a 0 or 1.
    #[error("invalid symbol {value:?} at position {pos}")]
    Symbol {
        /// The symbol position.
        pos: usize,
        /// The invalid symbol.
        value: char,
    },
    /// Invalid pattern index or label.
    #[error("invalid pattern {0:?}, expected 000..=111")]
    Pattern(String),
}

/// A shuffled deck of 26 black and 26 red cards.
///
/// A deck can only be built with exactly [Deck::HALF] cards of each color, so
/// all scoring code can rely on the deck invariant.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: [Card; Deck::SIZE],
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// The number of cards of each color.
    pub const HALF: usize = Self::SIZE / 2;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Creates a deck shuffled by a generator seeded with `seed`.
    ///
    /// The same seed always gives the same deck.
    pub fn from_seed(seed: u64) -> Self {
        Self::new_and_shuffled(&mut StdRng::seed_from_u64(seed))
    }

    /// The deck cards in play order.
    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of red cards, always [Deck::HALF].
    pub fn red_count(&self) -> usize {
        self.cards.iter().filter(|&&c| c == Card::Red).count()
    }
}

impl Default for Deck {
    /// The unshuffled deck, all black cards followed by all red cards.
    fn default() -> Self {
        let mut cards = [Card::Black; Deck::SIZE];
        cards[Deck::HALF..].fill(Card::Red);
        Self { cards }
    }
}

impl AsRef<[Card]> for Deck {
    fn as_ref(&self) -> &[Card] {
        &self.cards
    }
}

impl TryFrom<&[Card]> for Deck {
    type Error = DeckError;

    fn try_from(cards: &[Card]) -> Result<Self, Self::Error> {
        let cards: [Card; Deck::SIZE] = cards
            .try_into()
            .map_err(|_| DeckError::Length { len: cards.len() })?;

        let red = cards.iter().filter(|&&c| c == Card::Red).count();
        if red != Deck::HALF {
            return Err(DeckError::Balance { red });
        }

        Ok(Self { cards })
    }
}

impl TryFrom<&[u8]> for Deck {
    type Error = DeckError;

    fn try_from(bits: &[u8]) -> Result<Self, Self::Error> {
        let cards = bits
            .iter()
            .enumerate()
            .map(|(pos, &b)| {
                Card::try_from(b).map_err(|v| DeckError::Symbol {
                    pos,
                    value: char::from(v),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Deck::try_from(cards.as_slice())
    }
}

impl FromStr for Deck {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = s
            .chars()
            .enumerate()
            .map(|(pos, c)| match c {
                '0' => Ok(Card::Black),
                '1' => Ok(Card::Red),
                value => Err(DeckError::Symbol { pos, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Deck::try_from(cards.as_slice())
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cards.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({self})")
    }
}

/// A source of decks for scoring.
pub trait DeckSource: Sync {
    /// Generates `count` decks, the same `(count, seed)` must always give the
    /// same decks.
    fn generate(&self, count: usize, seed: u64) -> Vec<Deck>;
}

/// A deck source that shuffles deck `k` with seed `seed + k`.
///
/// Runs that derive a batch seed from the number of decks already scored never
/// shuffle two decks with the same seed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shuffler;

impl DeckSource for Shuffler {
    fn generate(&self, count: usize, seed: u64) -> Vec<Deck> {
        (0..count as u64)
            .map(|k| Deck::from_seed(seed.wrapping_add(k)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_balance() {
        let deck = Deck::default();
        assert_eq!(deck.cards().len(), Deck::SIZE);
        assert_eq!(deck.red_count(), Deck::HALF);
        assert!(deck.cards()[..Deck::HALF].iter().all(|&c| c == Card::Black));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let deck = Deck::new_and_shuffled(&mut rng);
            assert_eq!(deck.red_count(), Deck::HALF);
        }
    }

    #[test]
    fn deck_from_seed() {
        assert_eq!(Deck::from_seed(2003), Deck::from_seed(2003));
        assert_ne!(Deck::from_seed(2003), Deck::from_seed(2004));
    }

    #[test]
    fn deck_parsing() {
        let s = "01".repeat(26);
        let deck = s.parse::<Deck>().unwrap();
        assert_eq!(deck.to_string(), s);
        assert_eq!(deck.cards()[0], Card::Black);
        assert_eq!(deck.cards()[1], Card::Red);

        let bits = deck.cards().iter().map(|c| c.bit()).collect::<Vec<_>>();
        assert_eq!(Deck::try_from(bits.as_slice()).unwrap(), deck);
    }

    #[test]
    fn invalid_decks() {
        let short = "01".repeat(25);
        assert_eq!(
            short.parse::<Deck>().unwrap_err(),
            DeckError::Length { len: 50 }
        );

        let unbalanced = format!("{}{}", "0".repeat(25), "1".repeat(27));
        assert_eq!(
            unbalanced.parse::<Deck>().unwrap_err(),
            DeckError::Balance { red: 27 }
        );

        let symbol = format!("2{}", "01".repeat(25) + "1");
        assert_eq!(
            symbol.parse::<Deck>().unwrap_err(),
            DeckError::Symbol { pos: 0, value: '2' }
        );

        let mut bits = vec![0u8; Deck::HALF];
        bits.extend(vec![1u8; Deck::HALF - 1]);
        bits.push(5);
        assert!(matches!(
            Deck::try_from(bits.as_slice()),
            Err(DeckError::Symbol { pos: 51, .. })
        ));
    }

    #[test]
    fn shuffler_source() {
        let decks = Shuffler.generate(10, 2003);
        assert_eq!(decks.len(), 10);
        assert_eq!(decks, Shuffler.generate(10, 2003));

        // Deck k uses seed + k so overlapping requests share decks.
        let shifted = Shuffler.generate(5, 2008);
        assert_eq!(&decks[5..], shifted.as_slice());
        assert_eq!(decks[3], Deck::from_seed(2006));

        assert!(Shuffler.generate(0, 1).is_empty());
    }
}
