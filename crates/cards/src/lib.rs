// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Penney game cards types.
//!
//! A Penney deck has 52 cards of two colors, 26 black and 26 red, and players
//! bet on 3-cards [Pattern]s showing up as the deck is flipped:
//!
//! ```
//! # use penney_cards::{Card, Deck, Pattern};
//! let deck = Deck::from_seed(2003);
//! assert_eq!(deck.red_count(), 26);
//!
//! let p: Pattern = "011".parse().unwrap();
//! assert_eq!(p.index(), 3);
//! assert_eq!(p.cards(), [Card::Black, Card::Red, Card::Red]);
//! ```
//!
//! Decks for a batch are produced by a [DeckSource], the [Shuffler] source
//! shuffles each deck with its own seed so that batches are reproducible:
//!
//! ```
//! # use penney_cards::{DeckSource, Shuffler};
//! let decks = Shuffler.generate(4, 2003);
//! assert_eq!(decks, Shuffler.generate(4, 2003));
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod cards;
pub use cards::{Card, Pattern};

mod deck;
pub use deck::{Deck, DeckError, DeckSource, Shuffler};
