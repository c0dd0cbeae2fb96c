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

//! This module defines the configuration of a search: which concurrency
//! regime to use and how to tune it.

use derive_builder::Builder;

/// The number of tree levels below which the parallel explorer forks the
/// exploration of both children of a node.
pub const DEFAULT_SPAWN_CUTOFF: usize = 8;
/// The number of leading decisions fixed by each prefix pattern of the
/// distributed explorer.
pub const DEFAULT_PREFIX_LEVELS: usize = 2;
/// The deepest prefix the distributed explorer accepts: `2^16` patterns,
/// each of which costs one collective reduction.
pub const MAX_PREFIX_LEVELS: usize = 16;
/// The parallel explorer never forks below this depth (it already yields up
/// to `2^32` tasks).
pub const MAX_SPAWN_CUTOFF: usize = 32;

/// The concurrency regime of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// A single thread explores the tree depth first
    #[default]
    Sequential,
    /// A fixed-size pool of workers explores one shared tree (fork-join)
    Parallel,
    /// Cooperating ranks that share no memory each explore a static
    /// partition of the decision space and synchronize through collectives
    Distributed { ranks: usize },
}

/// This is how you configure a search.
///
/// # Example
/// ```
/// # use knapsack_bnb::*;
/// let config = SearchConfigBuilder::default()
///     .concurrency(Concurrency::Parallel)
///     .nb_threads(4_usize)
///     .build()
///     .unwrap();
///
/// assert_eq!(Concurrency::Parallel, config.concurrency());
/// assert_eq!(4, config.nb_threads());
/// assert!(config.pruning());
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SearchConfig {
    /// The concurrency regime (sequential by default)
    #[builder(default)]
    concurrency: Concurrency,
    /// When false, the pruning threshold is forced to -inf and the search
    /// enumerates every feasible node. The answer is unaffected.
    #[builder(default = "true")]
    pruning: bool,
    /// The number of workers of the parallel explorer. By default, this
    /// amounts to the number of hardware threads available on the machine.
    #[builder(default = "num_cpus::get()")]
    nb_threads: usize,
    /// Children of nodes shallower than this are explored as concurrent tasks
    /// (capped to `MAX_SPAWN_CUTOFF`)
    #[builder(default = "DEFAULT_SPAWN_CUTOFF")]
    spawn_cutoff: usize,
    /// The number of decisions fixed by the distributed prefix patterns. It
    /// may not exceed `MAX_PREFIX_LEVELS`.
    #[builder(default = "DEFAULT_PREFIX_LEVELS")]
    prefix_levels: usize,
}

impl SearchConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.nb_threads {
            return Err("the parallel explorer needs at least one thread".to_string());
        }
        if let Some(Concurrency::Distributed { ranks: 0 }) = self.concurrency {
            return Err("the distributed explorer needs at least one rank".to_string());
        }
        if let Some(levels) = self.prefix_levels {
            if levels > MAX_PREFIX_LEVELS {
                return Err(format!("at most {} prefix levels are supported (got {})", MAX_PREFIX_LEVELS, levels));
            }
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency  : Concurrency::default(),
            pruning      : true,
            nb_threads   : num_cpus::get(),
            spawn_cutoff : DEFAULT_SPAWN_CUTOFF,
            prefix_levels: DEFAULT_PREFIX_LEVELS,
        }
    }
}

impl SearchConfig {
    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }
    pub fn pruning(&self) -> bool {
        self.pruning
    }
    pub fn nb_threads(&self) -> usize {
        self.nb_threads
    }
    pub fn spawn_cutoff(&self) -> usize {
        self.spawn_cutoff
    }
    pub fn prefix_levels(&self) -> usize {
        self.prefix_levels
    }
}

#[cfg(test)]
mod test_config {
    use crate::*;

    #[test]
    fn the_builder_defaults_to_a_pruned_sequential_search() {
        let config = SearchConfigBuilder::default().build().unwrap();
        assert_eq!(Concurrency::Sequential, config.concurrency());
        assert!(config.pruning());
        assert_eq!(DEFAULT_SPAWN_CUTOFF, config.spawn_cutoff());
        assert_eq!(DEFAULT_PREFIX_LEVELS, config.prefix_levels());
        assert!(config.nb_threads() > 0);
    }
    #[test]
    fn zero_threads_is_rejected() {
        let config = SearchConfigBuilder::default().nb_threads(0_usize).build();
        assert!(config.is_err());
    }
    #[test]
    fn zero_ranks_is_rejected() {
        let config = SearchConfigBuilder::default()
            .concurrency(Concurrency::Distributed { ranks: 0 })
            .build();
        assert!(config.is_err());
    }
    #[test]
    fn pruning_can_be_disabled() {
        let config = SearchConfigBuilder::default().pruning(false).build().unwrap();
        assert!(!config.pruning());
    }
    #[test]
    fn too_many_prefix_levels_are_rejected() {
        assert!(SearchConfigBuilder::default().prefix_levels(MAX_PREFIX_LEVELS + 1).build().is_err());
        assert!(SearchConfigBuilder::default().prefix_levels(64_usize).build().is_err());
        let config = SearchConfigBuilder::default().prefix_levels(MAX_PREFIX_LEVELS).build().unwrap();
        assert_eq!(MAX_PREFIX_LEVELS, config.prefix_levels());
        let config = SearchConfigBuilder::default().prefix_levels(0_usize).build().unwrap();
        assert_eq!(0, config.prefix_levels());
    }
}
