// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Penney game deck scoring.
//!
//! Two players pick different 3-cards patterns and flip a deck of 26 black and
//! 26 red cards, a matchup can be scored by tricks (non overlapping pattern
//! occurrences) or by cards (the pot of cards flipped since the last match):
//!
//! ```
//! # use penney_eval::*;
//! let deck = Deck::default();
//! let (p1, p2) = ("000".parse().unwrap(), "111".parse().unwrap());
//! assert_eq!(score_tricks(deck.cards(), p1, p2), Tally { p1: 8, p2: 8 });
//! assert_eq!(score_cards(deck.cards(), p1, p2), Tally { p1: 24, p2: 26 });
//! ```
//!
//! A [ScoreMatrix] scores all 56 matchups on a deck, and [RunningCounts]
//! counts player two wins and ties over many decks:
//!
//! ```
//! # use penney_eval::*;
//! let decks = Shuffler.generate(100, 2003);
//! let counts = aggregate(&decks);
//! let wins = counts.win_probabilities(Rule::Tricks, decks.len() as u64);
//! assert!(wins[0][0].is_none());
//! assert!(wins[0][4].is_some_and(|p| (0.0..=1.0).contains(&p)));
//! ```
//!
//! The **`parallel`** feature enables the [parallel] module to score large
//! batches with parallel tasks, the counts are the same for any number of
//! tasks and chunk size:
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn par_run() {
//! # use penney_eval::*;
//! let decks = Shuffler.generate(1_000, 2003);
//! assert_eq!(parallel::run(&decks, 64, 4), aggregate(&decks));
//! # }
//! # #[cfg(feature = "parallel")]
//! # par_run();
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod counts;
pub use counts::{CountMatrix, MergeError, Outcome, ProbMatrix, RunningCounts, aggregate};

pub mod grid;
pub use grid::{ScoreMatrix, TieFlags};

#[cfg(feature = "parallel")]
pub mod parallel;

pub mod score;
pub use score::{Player, Rule, Tally, score_cards, score_tricks};

// Reexport cards types.
pub use penney_cards::{Card, Deck, DeckError, DeckSource, Pattern, Shuffler};
