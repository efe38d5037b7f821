// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Score matrices for all the matchups on a deck.
use std::{fmt, ops::Index};

use penney_cards::{Deck, Pattern};

use crate::score::Rule;

const N: usize = Pattern::COUNT;

/// Player one tallies for every matchup on a deck.
///
/// Entry `(i, j)` is player one's tally when player one picks pattern `i` and
/// player two picks pattern `j`. Same pattern matchups are never played and
/// hold [ScoreMatrix::INVALID].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMatrix([[i16; N]; N]);

impl ScoreMatrix {
    /// Diagonal marker, outside the range of any tally.
    pub const INVALID: i16 = -1;

    /// Scores all the matchups on a deck.
    pub fn eval(deck: &Deck, rule: Rule) -> Self {
        Self::eval_with_ties(deck, rule).0
    }

    /// Scores all the matchups on a deck and flags the ties.
    pub fn eval_with_ties(deck: &Deck, rule: Rule) -> (Self, TieFlags) {
        let mut scores = [[Self::INVALID; N]; N];
        let mut ties = [[TieFlags::INVALID; N]; N];

        for p1 in Pattern::all() {
            for p2 in Pattern::all().filter(|&p2| p2 != p1) {
                let (i, j) = (p1.index(), p2.index());
                let tally = rule.score(deck.cards(), p1, p2);
                scores[i][j] = tally.p1 as i16;
                ties[i][j] = tally.is_tie() as i8;
            }
        }

        (Self(scores), TieFlags(ties))
    }

    /// Player one tally for a matchup, `None` if `i == j`.
    pub fn get(&self, i: usize, j: usize) -> Option<i16> {
        (i != j).then(|| self.0[i][j])
    }

    /// Player two tally for a matchup, `None` if `i == j`.
    ///
    /// Player two's tally for `(i, j)` is player one's tally when the two
    /// players swap patterns.
    pub fn p2_tally(&self, i: usize, j: usize) -> Option<i16> {
        self.get(j, i)
    }

    /// The matrix rows, diagonal included.
    pub fn rows(&self) -> &[[i16; N]; N] {
        &self.0
    }
}

impl Index<(usize, usize)> for ScoreMatrix {
    type Output = i16;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.0[i][j]
    }
}

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P1\\P2")?;
        for p in Pattern::all() {
            write!(f, " {p:>4}")?;
        }
        writeln!(f)?;

        for (p1, row) in Pattern::all().zip(self.0.iter()) {
            write!(f, "{p1:>5}")?;
            for (j, v) in row.iter().enumerate() {
                if j == p1.index() {
                    write!(f, " {:>4}", "-")?;
                } else {
                    write!(f, " {v:>4}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Tie flags for every matchup on a deck.
///
/// Off diagonal entries are 1 for a tie and 0 for a decided matchup, the
/// diagonal holds [TieFlags::INVALID].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieFlags([[i8; N]; N]);

impl TieFlags {
    /// Diagonal marker.
    pub const INVALID: i8 = -1;

    /// Checks if a matchup ended in a tie, `None` if `i == j`.
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        (i != j).then(|| self.0[i][j] == 1)
    }

    /// The flags rows, diagonal included.
    pub fn rows(&self) -> &[[i8; N]; N] {
        &self.0
    }
}

impl Index<(usize, usize)> for TieFlags {
    type Output = i8;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.0[i][j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{score_cards, score_tricks};
    use rand::prelude::*;

    #[test]
    fn diagonal_is_invalid() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let deck = Deck::new_and_shuffled(&mut rng);
            for rule in Rule::ALL {
                let (scores, ties) = ScoreMatrix::eval_with_ties(&deck, rule);
                for i in 0..N {
                    assert_eq!(scores[(i, i)], ScoreMatrix::INVALID);
                    assert_eq!(ties[(i, i)], TieFlags::INVALID);
                    assert_eq!(scores.get(i, i), None);
                    assert_eq!(ties.get(i, i), None);
                }
            }
        }
    }

    #[test]
    fn eval_is_deterministic() {
        let deck = Deck::from_seed(2003);
        for rule in Rule::ALL {
            assert_eq!(
                ScoreMatrix::eval_with_ties(&deck, rule),
                ScoreMatrix::eval_with_ties(&deck, rule)
            );
        }
    }

    #[test]
    fn entries_match_scorers() {
        let deck = Deck::from_seed(7);
        let (tricks, tricks_ties) = ScoreMatrix::eval_with_ties(&deck, Rule::Tricks);
        let (cards, cards_ties) = ScoreMatrix::eval_with_ties(&deck, Rule::Cards);

        for p1 in Pattern::all() {
            for p2 in Pattern::all().filter(|&p2| p2 != p1) {
                let (i, j) = (p1.index(), p2.index());

                let t = score_tricks(deck.cards(), p1, p2);
                assert_eq!(tricks.get(i, j), Some(t.p1 as i16));
                assert_eq!(tricks.p2_tally(i, j), Some(t.p2 as i16));
                assert_eq!(tricks_ties.get(i, j), Some(t.is_tie()));

                let c = score_cards(deck.cards(), p1, p2);
                assert_eq!(cards.get(i, j), Some(c.p1 as i16));
                assert_eq!(cards.p2_tally(i, j), Some(c.p2 as i16));
                assert_eq!(cards_ties.get(i, j), Some(c.is_tie()));
            }
        }
    }

    #[test]
    fn sorted_deck_grid() {
        let deck = Deck::default();
        let (tricks, ties) = ScoreMatrix::eval_with_ties(&deck, Rule::Tricks);
        assert_eq!(tricks[(0, 7)], 8);
        assert_eq!(tricks[(7, 0)], 8);
        assert_eq!(ties.get(0, 7), Some(true));

        let cards = ScoreMatrix::eval(&deck, Rule::Cards);
        assert_eq!(cards[(0, 7)], 24);
        assert_eq!(cards[(7, 0)], 26);
    }

    #[test]
    fn score_matrix_display() {
        let s = ScoreMatrix::eval(&Deck::default(), Rule::Tricks).to_string();
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), N + 1);
        assert!(lines[0].starts_with("P1\\P2  000"));
        assert!(lines[1].starts_with("  000    -"));
        assert!(lines[1].ends_with("   8"));
    }
}
