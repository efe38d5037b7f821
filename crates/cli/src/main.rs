// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Penney game scoring CLI.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::{Args, Parser, Subcommand, value_parser};
use directories::ProjectDirs;
use log::{error, info};
use std::{io, path::PathBuf, process};

use penney_core::{RunConfig, RunOutcome, SummaryStore, session};
use penney_eval::{Deck, Shuffler};

pub mod report;

#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score decks until the summary has the target number of decks.
    Run {
        /// The number of decks the summary should reach.
        #[clap(long, default_value_t = RunConfig::TARGET_DECKS)]
        target: u64,
        /// The number of decks scored and saved per batch.
        #[clap(long, short, default_value_t = RunConfig::BATCH_SIZE,
               value_parser = value_parser!(u64).range(1..))]
        batch_size: u64,
        /// The seed of the first deck.
        #[clap(long, short, default_value_t = RunConfig::BASE_SEED)]
        seed: u64,
        #[clap(flatten)]
        runner: RunnerArgs,
    },
    /// Score extra decks and add them to the summary.
    Add {
        /// The number of decks to score.
        #[clap(long, short = 'n')]
        count: u64,
        /// The seed of the first deck, random if not set.
        #[clap(long, short)]
        seed: Option<u64>,
        /// The number of decks scored and saved per batch.
        #[clap(long, short, default_value_t = RunConfig::BATCH_SIZE,
               value_parser = value_parser!(u64).range(1..))]
        batch_size: u64,
        #[clap(flatten)]
        runner: RunnerArgs,
    },
    /// Print the summary win and tie percentages.
    Show {
        /// Print the outcome counts for each matchup.
        #[clap(long, short)]
        matchups: bool,
        /// The summary file path.
        #[clap(long)]
        summary: Option<PathBuf>,
    },
    /// Print a deck and its scores.
    Deck {
        /// The deck seed.
        #[clap(long, short)]
        seed: u64,
    },
}

#[derive(Debug, Args)]
struct RunnerArgs {
    /// The number of decks per parallel chunk.
    #[clap(long, short, default_value_t = RunConfig::CHUNK_SIZE)]
    chunk_size: usize,
    /// The number of parallel tasks, defaults to the available parallelism.
    #[clap(long, short, value_parser = value_parser!(u16).range(1..=1024))]
    tasks: Option<u16>,
    /// The summary file path.
    #[clap(long)]
    summary: Option<PathBuf>,
}

impl RunnerArgs {
    fn config(&self, target_decks: u64, batch_size: u64, base_seed: u64) -> RunConfig {
        RunConfig {
            target_decks,
            batch_size,
            base_seed,
            chunk_size: self.chunk_size,
            tasks: self
                .tasks
                .map_or_else(session::default_tasks, |t| t as usize),
        }
    }
}

/// Returns the summary store at `path` or at the default data directory.
fn summary_store(path: Option<PathBuf>) -> SummaryStore {
    let path = path.unwrap_or_else(|| {
        ProjectDirs::from("", "", "penney")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("data"))
            .join("score_summary.bin")
    });

    SummaryStore::new(path)
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::Run {
            target,
            batch_size,
            seed,
            runner,
        } => {
            let config = runner.config(target, batch_size, seed);
            let store = summary_store(runner.summary);

            match session::run(&store, &Shuffler, &config)? {
                RunOutcome::TargetSatisfied { total_decks } => {
                    info!("Nothing to do, summary has {total_decks} decks");
                }
                RunOutcome::Extended {
                    new_decks,
                    batches,
                    total_decks,
                } => {
                    info!("Scored {new_decks} decks in {batches} batches, total {total_decks}");
                }
            }
        }
        Command::Add {
            count,
            seed,
            batch_size,
            runner,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            info!("Adding {count} decks with seed {seed}");

            let config = runner.config(0, batch_size, seed);
            let store = summary_store(runner.summary);
            session::add(&store, &Shuffler, count, seed, &config)?;
        }
        Command::Show { matchups, summary } => {
            let store = summary_store(summary);
            let summary = store.load()?;

            let mut out = io::stdout().lock();
            if matchups {
                report::write_matchups(&mut out, &summary)?;
            } else {
                report::write_summary(&mut out, &summary)?;
            }
        }
        Command::Deck { seed } => {
            let deck = Deck::from_seed(seed);
            report::write_deck(&mut io::stdout().lock(), &deck)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli.command) {
        error!("{e:#}");
        process::exit(1);
    }
}
