// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Resumable Penney game scoring.
//!
//! A [SummaryStore] keeps the counts for all the decks scored so far, a
//! session [run](session::run) scores new batches in parallel until the
//! summary reaches a target number of decks:
//!
//! ```no_run
//! # use penney_core::*;
//! # fn main() -> anyhow::Result<()> {
//! let store = SummaryStore::new("data/score_summary.bin");
//! let config = RunConfig {
//!     target_decks: 1_000_000,
//!     ..Default::default()
//! };
//! let outcome = session::run(&store, &penney_eval::Shuffler, &config)?;
//! println!("Scored {} new decks", outcome.new_decks());
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod session;
pub use session::{RunConfig, RunOutcome};

pub mod summary;
pub use summary::{SUMMARY_VERSION, Summary, SummaryError, SummaryStore};
