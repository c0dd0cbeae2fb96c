// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Knapsack BnB
//! This crate solves the 0/1 knapsack problem exactly, by branch-and-bound.
//! Given a catalogue of `Item`s (each with an id, a value and a weight) and
//! the capacity of the knapsack, it finds a selection of items whose total
//! weight fits in the knapsack and whose total value is maximal.
//!
//! The search develops a binary decision tree where each level decides
//! whether or not one item is included. Items are considered by decreasing
//! value/weight ratio, and every node carries an upper bound computed with
//! the fractional relaxation of its residual problem (see `bound`). Any node
//! whose bound does not exceed the best value found so far (the incumbent)
//! is pruned.
//!
//! ## Explorers
//! The same tree can be explored in three ways:
//! * `SequentialExplorer`: a plain depth first search.
//! * `ParallelExplorer`: a fork-join search on a pool of worker threads that
//!   share one incumbent.
//! * `DistributedExplorer`: a search whose decision space is partitioned among
//!   ranks that share no memory and cooperate through a `Communicator`. The
//!   `LocalCluster` runs such ranks on the threads of the current process.
//!
//! All three agree on the optimal value. The simplest way to pick one of them
//! is to call `run` with a `SearchConfig`.
//!
//! ## Quick Example
//! ```
//! use knapsack_bnb::*;
//!
//! let items = vec![
//!     Item::new(1, 10.0, 5.0),
//!     Item::new(2, 40.0, 4.0),
//!     Item::new(3, 30.0, 6.0),
//!     Item::new(4, 50.0, 3.0),
//! ];
//! let config = SearchConfigBuilder::default()
//!     .concurrency(Concurrency::Distributed { ranks: 3 })
//!     .build()
//!     .unwrap();
//!
//! let outcome = run(&items, 10.0, &config).unwrap();
//! assert_eq!(90.0, outcome.optimal_value);
//! assert_eq!(7.0,  outcome.total_weight());
//! ```

mod common;
mod error;
mod config;
mod abstraction;
mod implementation;

pub use common::*;
pub use error::*;
pub use config::*;
pub use abstraction::*;
pub use implementation::*;
pub use implementation::comm::wire;

/// Solves the knapsack instance (`items`, `capacity`) with the explorer
/// selected by `config`.
///
/// The `items` need not be sorted. Their weights and the capacity must not be
/// negative. With a distributed configuration, this returns the outcome of
/// rank 0 (all ranks agree on the optimum and the selected items).
pub fn run(items: &[Item], capacity: f32, config: &SearchConfig) -> Result<SearchOutcome, Error> {
    match config.concurrency() {
        Concurrency::Sequential =>
            SequentialExplorer::new(items, capacity)
                .with_pruning(config.pruning())
                .explore(),
        Concurrency::Parallel =>
            ParallelExplorer::new(items, capacity)
                .with_pruning(config.pruning())
                .with_nb_threads(config.nb_threads())
                .with_spawn_cutoff(config.spawn_cutoff())
                .explore(),
        Concurrency::Distributed { ranks } => {
            let outcomes = LocalCluster::run(ranks, |endpoint| {
                DistributedExplorer::new(endpoint, items, capacity)
                    .with_pruning(config.pruning())
                    .with_prefix_levels(config.prefix_levels())
                    .explore()
            });
            // any failing rank fails the whole search
            let mut outcomes = outcomes.into_iter().collect::<Result<Vec<_>, Error>>()?;
            if outcomes.is_empty() {
                Err(Error::NoRank)
            } else {
                Ok(outcomes.swap_remove(0))
            }
        }
    }
}
