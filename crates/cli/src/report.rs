// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Summary and deck reports.
use std::io::{self, Write};

use penney_core::Summary;
use penney_eval::{Deck, Pattern, Rule, ScoreMatrix};

/// Writes player two win and tie percentages for each rule.
///
/// Rows are player one patterns and columns player two patterns, each cell
/// shows the win percentage followed by the tie percentage in parens.
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    let total = summary.total_decks();
    writeln!(out, "Decks: {total}")?;

    for rule in Rule::ALL {
        let wins = summary.counts().win_probabilities(rule, total);
        let ties = summary.counts().tie_probabilities(rule, total);

        writeln!(out, "\nPlayer two win% (tie%) by {rule}:")?;
        write!(out, "P1\\P2")?;
        for p2 in Pattern::all() {
            write!(out, " {p2:>12}")?;
        }
        writeln!(out)?;

        for p1 in Pattern::all() {
            write!(out, "{p1:>5}")?;
            for p2 in Pattern::all() {
                let (i, j) = (p1.index(), p2.index());
                match (wins[i][j], ties[i][j]) {
                    (Some(w), Some(t)) => {
                        write!(out, " {:>5.1} ({:>4.1})", w * 100.0, t * 100.0)?
                    }
                    _ => write!(out, " {:>12}", "")?,
                }
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Writes the outcome counts for every matchup, one matchup per line.
pub fn write_matchups<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    let total = summary.total_decks();
    let counts = summary.counts();

    write!(out, "{:<4}{:<4}", "P1", "P2")?;
    for rule in Rule::ALL {
        for name in ["p1_wins", "p2_wins", "ties"] {
            write!(out, " {:>14}", format!("{rule}_{name}"))?;
        }
    }
    writeln!(out)?;

    for p1 in Pattern::all() {
        for p2 in Pattern::all().filter(|&p2| p2 != p1) {
            write!(out, "{p1:<4}{p2:<4}")?;
            for rule in Rule::ALL {
                let outcome = counts
                    .outcome(rule, p1.index(), p2.index(), total)
                    .unwrap_or_default();
                write!(
                    out,
                    " {:>14} {:>14} {:>14}",
                    outcome.p1_wins, outcome.p2_wins, outcome.ties
                )?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Writes a deck and player one tallies for each matchup and rule.
pub fn write_deck<W: Write>(out: &mut W, deck: &Deck) -> io::Result<()> {
    writeln!(out, "Deck: {deck}")?;

    for rule in Rule::ALL {
        writeln!(out, "\nPlayer one {rule}:")?;
        write!(out, "{}", ScoreMatrix::eval(deck, rule))?;
    }

    Ok(())
}
