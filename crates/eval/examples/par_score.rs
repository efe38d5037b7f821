// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// ```bash
// $ cargo r --release --features=parallel --example par_score -- --decks 1000000
// ```
use clap::{Parser, value_parser};
use std::time::Instant;

use penney_eval::*;

#[derive(Debug, Parser)]
struct Cli {
    /// The number of decks to score.
    #[clap(long, short, default_value_t = 100_000)]
    decks: usize,
    /// The number of parallel tasks.
    #[clap(long, short, default_value_t = 4, value_parser = value_parser!(u16).range(1..=256))]
    tasks: u16,
    /// The number of decks per chunk.
    #[clap(long, short, default_value_t = 512)]
    chunk_size: usize,
}

fn main() {
    let cli = Cli::parse();

    let now = Instant::now();
    let decks = Shuffler.generate(cli.decks, 2003);
    let gen_elapsed = now.elapsed().as_secs_f64();

    let now = Instant::now();
    let counts = parallel::run(&decks, cli.chunk_size.max(1), cli.tasks as usize);
    let elapsed = now.elapsed().as_secs_f64();

    let total = decks.len() as u64;
    println!("Total decks      {total}");
    println!("Shuffle:         {:.3}s", gen_elapsed);
    println!("Scoring:         {:.3}s", elapsed);
    println!("Decks/sec:       {:.0}\n", total as f64 / elapsed);

    for rule in Rule::ALL {
        println!("Best reply by {rule}:");
        for p1 in Pattern::all() {
            let best = Pattern::all()
                .filter(|&p2| p2 != p1)
                .max_by_key(|p2| counts.p2_wins(rule)[(p1.index(), p2.index())]);

            if let Some(p2) = best {
                let outcome = counts
                    .outcome(rule, p1.index(), p2.index(), total)
                    .unwrap_or_default();
                println!(
                    "  {p1} -> {p2}  wins {:5.1}%  ties {:5.1}%",
                    outcome.p2_wins as f64 * 100.0 / total.max(1) as f64,
                    outcome.ties as f64 * 100.0 / total.max(1) as f64,
                );
            }
        }
    }
}
