// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Parallel batch scoring.
use log::debug;
use std::{ops::AddAssign, panic, thread};

use penney_cards::Deck;

use crate::counts::{RunningCounts, aggregate};

/// Splits `items` in chunks of at most `chunk_size` items, maps each chunk
/// with `f` and adds up the results.
///
/// Chunks are assigned round robin to `num_tasks` scoped threads, each task
/// adds up its own chunks results and the tasks results are added at the end.
/// The result doesn't depend on the chunk size or the number of tasks as long
/// as adding results is associative and commutative.
///
/// Panics if `chunk_size` or `num_tasks` is zero.
pub fn map_reduce<T, R, F>(items: &[T], chunk_size: usize, num_tasks: usize, f: F) -> R
where
    T: Sync,
    R: Default + AddAssign + Send,
    F: Fn(&[T]) -> R + Sync,
{
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(num_tasks > 0, "num_tasks must be positive");

    if items.is_empty() {
        return R::default();
    }

    let chunk_size = chunk_size.min(items.len());
    let chunks = items.chunks(chunk_size).collect::<Vec<_>>();
    let num_tasks = num_tasks.min(chunks.len());

    debug!(
        "Scoring {} items in {} chunks of {chunk_size} with {num_tasks} tasks",
        items.len(),
        chunks.len()
    );

    thread::scope(|s| {
        let handles = (0..num_tasks)
            .map(|task_id| {
                let chunks = &chunks;
                let f = &f;
                s.spawn(move || {
                    let mut acc = R::default();
                    for chunk in chunks.iter().skip(task_id).step_by(num_tasks) {
                        acc += f(chunk);
                    }

                    acc
                })
            })
            .collect::<Vec<_>>();

        let mut total = R::default();
        for handle in handles {
            // A panicking task is a bug, forward the panic to the caller.
            total += handle.join().unwrap_or_else(|e| panic::resume_unwind(e));
        }

        total
    })
}

/// Scores a batch of decks with `num_tasks` parallel tasks.
///
/// Returns the same counts as [aggregate] for any chunk size and number of
/// tasks.
pub fn run(decks: &[Deck], chunk_size: usize, num_tasks: usize) -> RunningCounts {
    map_reduce(decks, chunk_size, num_tasks, aggregate)
}
