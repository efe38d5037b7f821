// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Matchup scoring rules.
//!
//! Both rules flip the deck left to right and look at windows of 3 cards,
//! they differ in what a match is worth and in how windows are consumed:
//!
//! - [Rule::Tricks] scans with a cursor, a match credits one trick and jumps
//!   the cursor past the matched cards, a miss slides the cursor by one card.
//! - [Rule::Cards] keeps a pot of the cards flipped since the last match, the
//!   player whose pattern ends at the current card takes the whole pot.
//!
//! The scorers work on card slices so they can be used with a [Deck] or any
//! other view of a deck.
//!
//! [Deck]: penney_cards::Deck
use std::fmt;

use penney_cards::{Card, Pattern};

/// A scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Count non overlapping pattern occurrences.
    Tricks,
    /// Count the cards won from the pot.
    Cards,
}

impl Rule {
    /// All scoring rules.
    pub const ALL: [Rule; 2] = [Rule::Tricks, Rule::Cards];

    /// Scores a matchup with this rule.
    pub fn score(self, cards: &[Card], p1: Pattern, p2: Pattern) -> Tally {
        match self {
            Rule::Tricks => score_tricks(cards, p1, p2),
            Rule::Cards => score_cards(cards, p1, p2),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Tricks => write!(f, "tricks"),
            Rule::Cards => write!(f, "cards"),
        }
    }
}

/// A matchup player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// The player who picks first.
    One,
    /// The player who picks second.
    Two,
}

/// The players tallies at the end of a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Player one tally.
    pub p1: u32,
    /// Player two tally.
    pub p2: u32,
}

impl Tally {
    /// Checks if the matchup ended in a tie.
    pub fn is_tie(&self) -> bool {
        self.p1 == self.p2
    }

    /// The matchup winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self.p1.cmp(&self.p2) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn credit(&mut self, player: Player, amount: u32) {
        match player {
            Player::One => self.p1 += amount,
            Player::Two => self.p2 += amount,
        }
    }
}

/// Returns the player that claims a window.
///
/// Player one's pattern has precedence, two distinct patterns can never match
/// the same window but the check order is part of the rules.
#[inline]
fn claim(window: &[Card], p1: Pattern, p2: Pattern) -> Option<Player> {
    if p1.matches(window) {
        Some(Player::One)
    } else if p2.matches(window) {
        Some(Player::Two)
    } else {
        None
    }
}

/// Scores a matchup counting tricks.
///
/// The patterns must be different.
pub fn score_tricks(cards: &[Card], p1: Pattern, p2: Pattern) -> Tally {
    debug_assert_ne!(p1, p2, "same pattern matchup");

    let mut tally = Tally::default();
    let mut pos = 0;

    while pos + Pattern::LEN <= cards.len() {
        match claim(&cards[pos..pos + Pattern::LEN], p1, p2) {
            Some(player) => {
                tally.credit(player, 1);
                pos += Pattern::LEN;
            }
            None => pos += 1,
        }
    }

    tally
}

/// Scores a matchup counting the cards taken from the pot.
///
/// Cards left in the pot after the last match are not awarded. The patterns
/// must be different.
pub fn score_cards(cards: &[Card], p1: Pattern, p2: Pattern) -> Tally {
    debug_assert_ne!(p1, p2, "same pattern matchup");

    let mut tally = Tally::default();
    let mut pot_start = 0;

    for end in 0..cards.len() {
        let pot = end + 1 - pot_start;
        if pot < Pattern::LEN {
            continue;
        }

        let window = &cards[end + 1 - Pattern::LEN..=end];
        if let Some(player) = claim(window, p1, p2) {
            tally.credit(player, pot as u32);
            pot_start = end + 1;
        }
    }

    tally
}
