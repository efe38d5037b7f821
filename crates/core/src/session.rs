// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Batch scoring sessions.
//!
//! A session scores decks in batches until the summary reaches a target number
//! of decks, each batch is merged and saved before the next one starts so an
//! interrupted session loses at most the batch in flight. Sessions hold the
//! summary lock from load to the last save and fail if another session
//! holds it.
use anyhow::{Result, bail};
use log::{debug, info};
use std::{thread, time::Instant};

use penney_cards::DeckSource;
use penney_eval::parallel;

use crate::summary::{Summary, SummaryStore};

/// Session config.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The number of decks the summary should reach.
    pub target_decks: u64,
    /// The number of decks scored and saved per batch.
    pub batch_size: u64,
    /// The seed for the first deck, later batches use `base_seed` plus the
    /// number of decks already scored.
    pub base_seed: u64,
    /// The number of decks per parallel chunk.
    pub chunk_size: usize,
    /// The number of parallel scoring tasks.
    pub tasks: usize,
}

impl RunConfig {
    /// Default target number of decks.
    pub const TARGET_DECKS: u64 = 5_000_000;
    /// Default batch size.
    pub const BATCH_SIZE: u64 = 100_000;
    /// Default base seed.
    pub const BASE_SEED: u64 = 2003;
    /// Default chunk size.
    pub const CHUNK_SIZE: usize = 512;

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("Batch size must be positive");
        }

        if self.chunk_size == 0 {
            bail!("Chunk size must be positive");
        }

        if self.tasks == 0 {
            bail!("Number of tasks must be positive");
        }

        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_decks: Self::TARGET_DECKS,
            batch_size: Self::BATCH_SIZE,
            base_seed: Self::BASE_SEED,
            chunk_size: Self::CHUNK_SIZE,
            tasks: default_tasks(),
        }
    }
}

/// The number of tasks to use when not configured.
pub fn default_tasks() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// The result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The summary already had the target number of decks.
    TargetSatisfied {
        /// The summary number of decks.
        total_decks: u64,
    },
    /// New decks have been scored.
    Extended {
        /// The number of decks scored by this session.
        new_decks: u64,
        /// The number of batches scored by this session.
        batches: u64,
        /// The summary number of decks.
        total_decks: u64,
    },
}

impl RunOutcome {
    /// The number of decks scored by the session.
    pub fn new_decks(&self) -> u64 {
        match self {
            RunOutcome::TargetSatisfied { .. } => 0,
            RunOutcome::Extended { new_decks, .. } => *new_decks,
        }
    }
}

/// Scores decks from `source` until the summary in `store` has
/// `config.target_decks` decks.
pub fn run<S: DeckSource>(
    store: &SummaryStore,
    source: &S,
    config: &RunConfig,
) -> Result<RunOutcome> {
    config.validate()?;
    store.exclusive(|| run_locked(store, source, config))?
}

fn run_locked<S: DeckSource>(
    store: &SummaryStore,
    source: &S,
    config: &RunConfig,
) -> Result<RunOutcome> {
    let mut summary = store.load()?;
    info!(
        "Loaded summary with {} decks from {}",
        summary.total_decks(),
        store.path().display()
    );

    if summary.total_decks() >= config.target_decks {
        info!(
            "Target deck count {} already satisfied (total={})",
            config.target_decks,
            summary.total_decks()
        );
        return Ok(RunOutcome::TargetSatisfied {
            total_decks: summary.total_decks(),
        });
    }

    let needed = config.target_decks - summary.total_decks();
    info!(
        "Scoring {needed} additional decks to reach {}",
        config.target_decks
    );

    let mut produced = 0;
    let mut batches = 0;

    while produced < needed {
        let size = config.batch_size.min(needed - produced);
        let seed = config.base_seed.wrapping_add(summary.total_decks());
        batches += 1;
        score_batch(store, source, &mut summary, batches, size, seed, config)?;
        produced += size;
    }

    Ok(RunOutcome::Extended {
        new_decks: produced,
        batches,
        total_decks: summary.total_decks(),
    })
}

/// Scores `count` extra decks from `seed` and merges them into the summary,
/// regardless of any target.
///
/// The decks are scored and saved in batches of `config.batch_size` decks
/// with seeds following `seed`.
pub fn add<S: DeckSource>(
    store: &SummaryStore,
    source: &S,
    count: u64,
    seed: u64,
    config: &RunConfig,
) -> Result<Summary> {
    config.validate()?;
    store.exclusive(|| add_locked(store, source, count, seed, config))?
}

fn add_locked<S: DeckSource>(
    store: &SummaryStore,
    source: &S,
    count: u64,
    seed: u64,
    config: &RunConfig,
) -> Result<Summary> {
    let mut summary = store.load()?;
    let mut produced = 0;
    let mut batches = 0;

    while produced < count {
        let size = config.batch_size.min(count - produced);
        let batch_seed = seed.wrapping_add(produced);
        batches += 1;
        score_batch(store, source, &mut summary, batches, size, batch_seed, config)?;
        produced += size;
    }

    info!(
        "Added {count} decks from seed {seed}, total {}",
        summary.total_decks()
    );

    Ok(summary)
}

/// Generates, scores, merges and saves one batch.
fn score_batch<S: DeckSource>(
    store: &SummaryStore,
    source: &S,
    summary: &mut Summary,
    batch: u64,
    size: u64,
    seed: u64,
    config: &RunConfig,
) -> Result<()> {
    let now = Instant::now();

    let decks = source.generate(usize::try_from(size)?, seed);
    if decks.len() as u64 != size {
        bail!(
            "Deck source returned {} decks, expected {size}",
            decks.len()
        );
    }

    let delta = parallel::run(&decks, config.chunk_size, config.tasks);

    // Merge into a copy so a failed save doesn't leave unsaved counts behind.
    let mut merged = *summary;
    merged.merge(&delta, size)?;
    store.save(&merged)?;
    debug!("Saved summary to {}", store.path().display());
    *summary = merged;

    info!(
        "Batch {batch}: scored {size} decks (seed {seed}) in {:.3}s, total {}",
        now.elapsed().as_secs_f64(),
        summary.total_decks()
    );

    Ok(())
}
