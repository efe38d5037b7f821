// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Win and tie counts across many decks.
//!
//! Each deck is scored with both rules and folded into four count matrices,
//! for each matchup `(i, j)` player two wins when its tally, read from the
//! transposed entry `(j, i)` of the deck score matrix, is greater than player
//! one's tally at `(i, j)`. Counts are plain sums so a batch can be split in
//! any number of chunks and the chunks counts added back in any order.
use serde::{Deserialize, Serialize};
use std::{
    iter::Sum,
    ops::{AddAssign, Index},
};
use thiserror::Error;

use penney_cards::{Deck, Pattern};

use crate::{grid::ScoreMatrix, score::Rule};

const N: usize = Pattern::COUNT;

/// Probabilities for each matchup, `None` on the diagonal.
pub type ProbMatrix = [[Option<f64>; N]; N];

/// Error raised when counts don't agree with the number of decks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A counter overflowed.
    #[error("counts overflow")]
    Overflow,
    /// A same pattern matchup has been counted.
    #[error("{matrix} has a non zero diagonal entry at {index}")]
    Diagonal {
        /// The matrix name.
        matrix: &'static str,
        /// The diagonal index.
        index: usize,
    },
    /// A matchup has more wins and ties than decks.
    #[error("{matrix} ({i}, {j}) counts {count} outcomes for {decks} decks")]
    Exceeds {
        /// The matrix name.
        matrix: &'static str,
        /// Player one pattern index.
        i: usize,
        /// Player two pattern index.
        j: usize,
        /// The number of wins plus ties.
        count: u64,
        /// The number of decks.
        decks: u64,
    },
}

/// A matrix of counts for each matchup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMatrix([[u64; N]; N]);

impl CountMatrix {
    /// The count for matchup `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.0[i][j]
    }

    /// The matrix rows.
    pub fn rows(&self) -> &[[u64; N]; N] {
        &self.0
    }

    /// Elementwise addition, `None` on overflow.
    pub fn checked_add(&self, other: &CountMatrix) -> Option<CountMatrix> {
        let mut out = CountMatrix::default();
        for i in 0..N {
            for j in 0..N {
                out.0[i][j] = self.0[i][j].checked_add(other.0[i][j])?;
            }
        }

        Some(out)
    }

    fn fold(&mut self, ties: &mut CountMatrix, scores: &ScoreMatrix) {
        for i in 0..N {
            for j in (0..N).filter(|&j| j != i) {
                let (p1, p2) = (scores[(i, j)], scores[(j, i)]);
                if p2 > p1 {
                    self.0[i][j] += 1;
                } else if p2 == p1 {
                    ties.0[i][j] += 1;
                }
            }
        }
    }
}

impl AddAssign<&CountMatrix> for CountMatrix {
    fn add_assign(&mut self, rhs: &CountMatrix) {
        for (row, rhs_row) in self.0.iter_mut().zip(rhs.0.iter()) {
            for (v, r) in row.iter_mut().zip(rhs_row.iter()) {
                *v += r;
            }
        }
    }
}

impl Index<(usize, usize)> for CountMatrix {
    type Output = u64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.0[i][j]
    }
}

/// A matchup outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Decks won by player one.
    pub p1_wins: u64,
    /// Decks won by player two.
    pub p2_wins: u64,
    /// Tied decks.
    pub ties: u64,
}

/// Player two wins and ties for both rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCounts {
    /// Player two wins counting tricks.
    pub p2_trick_wins: CountMatrix,
    /// Ties counting tricks.
    pub trick_ties: CountMatrix,
    /// Player two wins counting cards.
    pub p2_card_wins: CountMatrix,
    /// Ties counting cards.
    pub card_ties: CountMatrix,
}

impl RunningCounts {
    /// Scores a deck with both rules and adds its outcomes.
    pub fn add_deck(&mut self, deck: &Deck) {
        let tricks = ScoreMatrix::eval(deck, Rule::Tricks);
        let cards = ScoreMatrix::eval(deck, Rule::Cards);
        self.add_scores(&tricks, &cards);
    }

    /// Adds the outcomes of a deck given its score matrices.
    pub fn add_scores(&mut self, tricks: &ScoreMatrix, cards: &ScoreMatrix) {
        self.p2_trick_wins.fold(&mut self.trick_ties, tricks);
        self.p2_card_wins.fold(&mut self.card_ties, cards);
    }

    /// Player two wins for a rule.
    pub fn p2_wins(&self, rule: Rule) -> &CountMatrix {
        match rule {
            Rule::Tricks => &self.p2_trick_wins,
            Rule::Cards => &self.p2_card_wins,
        }
    }

    /// Ties for a rule.
    pub fn ties(&self, rule: Rule) -> &CountMatrix {
        match rule {
            Rule::Tricks => &self.trick_ties,
            Rule::Cards => &self.card_ties,
        }
    }

    /// Checks if no outcome has been counted.
    pub fn is_empty(&self) -> bool {
        *self == RunningCounts::default()
    }

    /// Checks these counts could come from scoring `decks` decks.
    ///
    /// The diagonal must be zero and each matchup can't have more wins plus
    /// ties than decks.
    pub fn check(&self, decks: u64) -> Result<(), MergeError> {
        let rules = [
            ("tricks", &self.p2_trick_wins, &self.trick_ties),
            ("cards", &self.p2_card_wins, &self.card_ties),
        ];

        for (matrix, wins, ties) in rules {
            for i in 0..N {
                if wins[(i, i)] != 0 || ties[(i, i)] != 0 {
                    return Err(MergeError::Diagonal { matrix, index: i });
                }

                for j in (0..N).filter(|&j| j != i) {
                    let count = wins[(i, j)]
                        .checked_add(ties[(i, j)])
                        .ok_or(MergeError::Overflow)?;
                    if count > decks {
                        return Err(MergeError::Exceeds {
                            matrix,
                            i,
                            j,
                            count,
                            decks,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Elementwise addition, fails on overflow.
    pub fn checked_add(&self, other: &RunningCounts) -> Result<RunningCounts, MergeError> {
        let add = |a: &CountMatrix, b: &CountMatrix| a.checked_add(b).ok_or(MergeError::Overflow);

        Ok(RunningCounts {
            p2_trick_wins: add(&self.p2_trick_wins, &other.p2_trick_wins)?,
            trick_ties: add(&self.trick_ties, &other.trick_ties)?,
            p2_card_wins: add(&self.p2_card_wins, &other.p2_card_wins)?,
            card_ties: add(&self.card_ties, &other.card_ties)?,
        })
    }

    /// The outcome of matchup `(i, j)` over `total` decks, `None` if `i == j`.
    pub fn outcome(&self, rule: Rule, i: usize, j: usize, total: u64) -> Option<Outcome> {
        if i == j {
            return None;
        }

        let p2_wins = self.p2_wins(rule)[(i, j)];
        let ties = self.ties(rule)[(i, j)];
        Some(Outcome {
            p1_wins: total.saturating_sub(p2_wins + ties),
            p2_wins,
            ties,
        })
    }

    /// Player two win probability for each matchup over `total` decks.
    pub fn win_probabilities(&self, rule: Rule, total: u64) -> ProbMatrix {
        probabilities(self.p2_wins(rule), total)
    }

    /// Tie probability for each matchup over `total` decks.
    pub fn tie_probabilities(&self, rule: Rule, total: u64) -> ProbMatrix {
        probabilities(self.ties(rule), total)
    }
}

fn probabilities(counts: &CountMatrix, total: u64) -> ProbMatrix {
    let mut probs = [[None; N]; N];
    if total == 0 {
        return probs;
    }

    for (i, row) in probs.iter_mut().enumerate() {
        for (j, p) in row.iter_mut().enumerate().filter(|(j, _)| *j != i) {
            *p = Some(counts[(i, j)] as f64 / total as f64);
        }
    }

    probs
}

impl AddAssign<&RunningCounts> for RunningCounts {
    fn add_assign(&mut self, rhs: &RunningCounts) {
        self.p2_trick_wins += &rhs.p2_trick_wins;
        self.trick_ties += &rhs.trick_ties;
        self.p2_card_wins += &rhs.p2_card_wins;
        self.card_ties += &rhs.card_ties;
    }
}

impl AddAssign for RunningCounts {
    fn add_assign(&mut self, rhs: RunningCounts) {
        *self += &rhs;
    }
}

impl Sum for RunningCounts {
    fn sum<I: Iterator<Item = RunningCounts>>(iter: I) -> Self {
        iter.fold(RunningCounts::default(), |mut acc, c| {
            acc += c;
            acc
        })
    }
}

/// Scores a batch of decks and returns the batch counts.
pub fn aggregate(decks: &[Deck]) -> RunningCounts {
    let mut counts = RunningCounts::default();
    for deck in decks {
        counts.add_deck(deck);
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{score_cards, score_tricks};
    use penney_cards::{DeckSource, Shuffler};

    #[test]
    fn empty_batch() {
        let counts = aggregate(&[]);
        assert!(counts.is_empty());
        assert_eq!(counts.check(0), Ok(()));
    }

    #[test]
    fn sorted_deck_counts() {
        let counts = aggregate(&[Deck::default()]);

        // 000 vs 111 is a tie counting tricks, 111 wins counting cards.
        assert_eq!(counts.trick_ties[(0, 7)], 1);
        assert_eq!(counts.p2_trick_wins[(0, 7)], 0);
        assert_eq!(counts.p2_card_wins[(0, 7)], 1);
        assert_eq!(counts.p2_card_wins[(7, 0)], 0);
        assert_eq!(counts.card_ties[(0, 7)], 0);
        assert_eq!(counts.check(1), Ok(()));
    }

    #[test]
    fn counts_match_direct_tallies() {
        let decks = Shuffler.generate(50, 11);
        let counts = aggregate(&decks);

        for p1 in Pattern::all() {
            for p2 in Pattern::all().filter(|&p2| p2 != p1) {
                let (i, j) = (p1.index(), p2.index());
                let mut tricks = Outcome::default();
                let mut cards = Outcome::default();

                for deck in &decks {
                    let t = score_tricks(deck.cards(), p1, p2);
                    match t.p2.cmp(&t.p1) {
                        std::cmp::Ordering::Greater => tricks.p2_wins += 1,
                        std::cmp::Ordering::Equal => tricks.ties += 1,
                        std::cmp::Ordering::Less => tricks.p1_wins += 1,
                    }

                    let c = score_cards(deck.cards(), p1, p2);
                    match c.p2.cmp(&c.p1) {
                        std::cmp::Ordering::Greater => cards.p2_wins += 1,
                        std::cmp::Ordering::Equal => cards.ties += 1,
                        std::cmp::Ordering::Less => cards.p1_wins += 1,
                    }
                }

                assert_eq!(counts.outcome(Rule::Tricks, i, j, 50), Some(tricks));
                assert_eq!(counts.outcome(Rule::Cards, i, j, 50), Some(cards));
            }

            let i = p1.index();
            assert_eq!(counts.outcome(Rule::Tricks, i, i, 50), None);
        }

        assert_eq!(counts.check(50), Ok(()));
    }

    #[test]
    fn split_batches_add_up() {
        let decks = Shuffler.generate(40, 3);
        let all = aggregate(&decks);

        for split in [1, 7, 20, 39] {
            let mut parts = aggregate(&decks[split..]);
            parts += aggregate(&decks[..split]);
            assert_eq!(parts, all);
        }

        let summed = decks.chunks(9).map(aggregate).sum::<RunningCounts>();
        assert_eq!(summed, all);
    }

    #[test]
    fn check_detects_bad_counts() {
        let mut counts = aggregate(&Shuffler.generate(5, 1));
        assert_eq!(counts.check(5), Ok(()));
        assert!(matches!(counts.check(2), Err(MergeError::Exceeds { .. })));

        counts.card_ties.0[3][3] = 1;
        assert_eq!(
            counts.check(5),
            Err(MergeError::Diagonal {
                matrix: "cards",
                index: 3
            })
        );
    }

    #[test]
    fn checked_add_overflow() {
        let mut big = RunningCounts::default();
        big.trick_ties.0[0][1] = u64::MAX;

        let mut one = RunningCounts::default();
        one.trick_ties.0[0][1] = 1;

        assert_eq!(big.checked_add(&one), Err(MergeError::Overflow));
        assert_eq!(big.checked_add(&RunningCounts::default()), Ok(big));
    }

    #[test]
    fn matchup_probabilities() {
        let counts = aggregate(&[Deck::default(), Deck::default()]);

        let wins = counts.win_probabilities(Rule::Cards, 2);
        assert_eq!(wins[0][7], Some(1.0));
        assert_eq!(wins[7][0], Some(0.0));
        assert_eq!(wins[4][4], None);

        let ties = counts.tie_probabilities(Rule::Tricks, 2);
        assert_eq!(ties[0][7], Some(1.0));

        let none = counts.win_probabilities(Rule::Tricks, 0);
        assert!(none.iter().flatten().all(|p| p.is_none()));
    }
}
