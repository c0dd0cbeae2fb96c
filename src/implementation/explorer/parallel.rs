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

//! This module provides the implementation of the parallel explorer. It
//! develops the very same tree as the sequential explorer, except that the
//! two subtrees of a shallow node are explored concurrently (fork-join) on a
//! fixed size pool of worker threads.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;
use tracing::info;

use super::Pending;
use crate::{bound, reconstruct, sorted_catalogue, DecisionNode, DecisionTree, Error, Explorer, Incumbent, Item, NodeId, SearchOutcome, Statistics, DEFAULT_SPAWN_CUTOFF, MAX_SPAWN_CUTOFF};

/// The state which is shared among all the tasks of one search.
struct Shared<'a> {
    items: &'a [Item],
    capacity: f32,
    pruning: bool,
    /// Nodes shallower than this have their subtrees explored concurrently
    spawn_cutoff: usize,

    /// The incumbent. Updates are only ever performed while holding the lock.
    incumbent: Mutex<Incumbent>,
    /// A copy of the incumbent value (f32 bits) that can be read without
    /// taking the lock.
    ///
    /// # Note
    /// A reader may observe a stale value. This only means that some node
    /// gets explored when it could have been pruned: the bound of each node
    /// is computed independently of the incumbent, so the optimum stays the
    /// same.
    best: AtomicU32,

    explored: AtomicU64,
    pruned: AtomicU64,
}

impl Shared<'_> {
    fn threshold(&self) -> f32 {
        if self.pruning {
            f32::from_bits(self.best.load(Ordering::Relaxed))
        } else {
            f32::NEG_INFINITY
        }
    }
    fn offer(&self, node: &DecisionNode) {
        if node.t_value <= self.threshold() {
            return;
        }
        let mut incumbent = self.incumbent.lock();
        if incumbent.offer(node) {
            self.best.store(incumbent.best_value.to_bits(), Ordering::Relaxed);
        }
    }
    /// Explores a detached subtree rooted in `node` and returns it
    fn fragment(&self, node: DecisionNode) -> DecisionTree {
        let mut tree = DecisionTree::new(node);
        let root = tree.root();
        self.descend(&mut tree, root);
        tree
    }
    /// Develops the subtree rooted in `start`. Below the spawn cutoff, this
    /// runs inline with an explicit stack; above it, the two children of a
    /// node are forked (so the recursion is never deeper than the cutoff).
    fn descend(&self, tree: &mut DecisionTree, start: NodeId) {
        let mut stack = vec![Pending::Branch(start)];
        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Branch(id) => {
                    self.explored.fetch_add(1, Ordering::Relaxed);
                    if tree[id].bound > self.threshold() {
                        self.visit(tree, id, &mut stack);
                    } else {
                        self.pruned.fetch_add(1, Ordering::Relaxed);
                    }
                },
                Pending::Exclude(id) => {
                    let exclude = self.exclude(&tree[id]);
                    let child = tree.add_child(id, exclude);
                    stack.push(Pending::Branch(child));
                }
            }
        }
    }
    fn exclude(&self, node: &DecisionNode) -> DecisionNode {
        let mut exclude = node.child(&self.items[node.depth], false);
        exclude.bound = bound(&exclude, self.items, self.capacity);
        exclude
    }
    fn visit(&self, tree: &mut DecisionTree, id: NodeId, stack: &mut Vec<Pending>) {
        let node = tree[id];
        if node.is_terminal(self.items.len()) {
            return;
        }

        let mut include = node.child(&self.items[node.depth], true);
        let feasible = include.is_feasible(self.capacity);
        if feasible {
            include.bound = bound(&include, self.items, self.capacity);
            self.offer(&include);
        }

        if feasible && node.depth < self.spawn_cutoff {
            let exclude = self.exclude(&node);
            let (inc, exc) = rayon::join(
                || self.fragment(include),
                || self.fragment(exclude));
            tree.graft(id, inc);
            tree.graft(id, exc);
        } else {
            stack.push(Pending::Exclude(id));
            if feasible {
                let child = tree.add_child(id, include);
                stack.push(Pending::Branch(child));
            }
        }
    }
}

/// The parallel explorer. Its optimal value is always the one found by the
/// `SequentialExplorer`; the number of explored (and pruned) nodes may vary
/// from one run to the other though, since it depends on the moment at which
/// each task observes the incumbent.
///
/// # Example
/// ```
/// # use knapsack_bnb::*;
/// let items = vec![
///     Item::new(1, 10.0, 5.0),
///     Item::new(2, 40.0, 4.0),
///     Item::new(3, 30.0, 6.0),
///     Item::new(4, 50.0, 3.0),
/// ];
/// let mut explorer = ParallelExplorer::new(&items, 10.0).with_nb_threads(4);
/// let outcome = explorer.explore().unwrap();
/// assert_eq!(90.0, outcome.optimal_value);
/// ```
pub struct ParallelExplorer {
    items: Vec<Item>,
    capacity: f32,
    pruning: bool,
    /// The number of worker threads. By default, this amounts to the number
    /// of hardware threads available on the machine.
    nb_threads: usize,
    spawn_cutoff: usize,
}

impl ParallelExplorer {
    pub fn new(items: &[Item], capacity: f32) -> Self {
        Self {
            items: sorted_catalogue(items),
            capacity,
            pruning: true,
            nb_threads: num_cpus::get(),
            spawn_cutoff: DEFAULT_SPAWN_CUTOFF,
        }
    }
    pub fn with_nb_threads(mut self, nb_threads: usize) -> Self {
        self.nb_threads = nb_threads;
        self
    }
    /// Sets the depth above which subtrees are forked. Values larger than
    /// `MAX_SPAWN_CUTOFF` are capped.
    pub fn with_spawn_cutoff(mut self, spawn_cutoff: usize) -> Self {
        self.spawn_cutoff = spawn_cutoff.min(MAX_SPAWN_CUTOFF);
        self
    }
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl Explorer for ParallelExplorer {
    fn explore(&mut self) -> Result<SearchOutcome, Error> {
        if self.items.is_empty() {
            return Ok(SearchOutcome::empty());
        }
        let pool = ThreadPoolBuilder::new().num_threads(self.nb_threads).build()?;

        let shared = Shared {
            items: &self.items,
            capacity: self.capacity,
            pruning: self.pruning,
            spawn_cutoff: self.spawn_cutoff,
            incumbent: Mutex::new(Incumbent::default()),
            best: AtomicU32::new(0.0_f32.to_bits()),
            explored: AtomicU64::new(0),
            pruned: AtomicU64::new(0),
        };

        let mut root = DecisionNode::root();
        root.bound = bound(&root, &self.items, self.capacity);
        // returns once all tasks have joined
        let tree = pool.install(|| shared.fragment(root));

        let incumbent  = shared.incumbent.into_inner();
        let statistics = Statistics {
            explored: shared.explored.into_inner(),
            pruned  : shared.pruned.into_inner(),
        };
        let selected = reconstruct(&tree, &self.items, &incumbent.witness).unwrap_or_default();
        info!(
            optimal  = incumbent.best_value,
            explored = statistics.explored,
            pruned   = statistics.pruned,
            threads  = self.nb_threads,
            "parallel search complete");

        Ok(SearchOutcome {
            optimal_value: incumbent.best_value,
            selected,
            statistics,
            tree,
        })
    }
}
