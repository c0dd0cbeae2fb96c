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

//! This module provides the implementation of the sequential explorer: a
//! plain recursive depth first branch-and-bound.

use tracing::info;

use super::Pending;
use crate::{bound, reconstruct, sorted_catalogue, DecisionNode, DecisionTree, Error, Explorer, Incumbent, Item, NodeId, SearchOutcome, Statistics};

/// The sequential explorer develops the decision tree depth first, include
/// branch first. It uses an explicit stack, so the depth of the tree (the
/// number of items) is not limited by the size of the call stack. The incumbent is updated as soon as an include node improves
/// on it (not only at the leaves), and a node is only developed when its bound
/// exceeds the incumbent.
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
/// let mut explorer = SequentialExplorer::new(&items, 10.0);
/// let outcome = explorer.explore().unwrap();
///
/// assert_eq!(90.0, outcome.optimal_value);
/// assert_eq!(vec![4, 2], outcome.selected.iter().map(|i| i.id).collect::<Vec<_>>());
/// assert_eq!(7.0, outcome.total_weight());
/// ```
pub struct SequentialExplorer {
    /// The catalogue, sorted with `compare_items`
    items: Vec<Item>,
    capacity: f32,
    /// When false, no node is ever pruned
    pruning: bool,

    tree: DecisionTree,
    incumbent: Incumbent,
    statistics: Statistics,
}

impl SequentialExplorer {
    pub fn new(items: &[Item], capacity: f32) -> Self {
        Self {
            items: sorted_catalogue(items),
            capacity,
            pruning: true,
            tree: DecisionTree::default(),
            incumbent: Incumbent::default(),
            statistics: Statistics::default(),
        }
    }
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }
    /// The sorted catalogue (the order of the decision levels)
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn threshold(&self) -> f32 {
        if self.pruning {
            self.incumbent.best_value
        } else {
            f32::NEG_INFINITY
        }
    }
    /// Develops the subtree rooted in `start`, depth first and include
    /// branch first.
    fn descend(&mut self, start: NodeId) {
        let mut stack = vec![Pending::Branch(start)];
        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Branch(id) => {
                    self.statistics.explored += 1;
                    if self.tree[id].bound > self.threshold() {
                        self.visit(id, &mut stack);
                    } else {
                        self.statistics.pruned += 1;
                    }
                },
                Pending::Exclude(id) => {
                    let node = self.tree[id];
                    let mut exclude = node.child(&self.items[node.depth], false);
                    exclude.bound = bound(&exclude, &self.items, self.capacity);
                    let child = self.tree.add_child(id, exclude);
                    stack.push(Pending::Branch(child));
                }
            }
        }
    }
    fn visit(&mut self, id: NodeId, stack: &mut Vec<Pending>) {
        let node = self.tree[id];
        if node.is_terminal(self.items.len()) {
            return;
        }
        stack.push(Pending::Exclude(id));

        let mut include = node.child(&self.items[node.depth], true);
        if include.is_feasible(self.capacity) {
            include.bound = bound(&include, &self.items, self.capacity);
            let child = self.tree.add_child(id, include);
            self.incumbent.offer(&include);
            stack.push(Pending::Branch(child));
        }
    }
}

impl Explorer for SequentialExplorer {
    fn explore(&mut self) -> Result<SearchOutcome, Error> {
        if self.items.is_empty() {
            return Ok(SearchOutcome::empty());
        }
        let mut root = DecisionNode::root();
        root.bound = bound(&root, &self.items, self.capacity);

        self.tree       = DecisionTree::new(root);
        self.incumbent  = Incumbent::default();
        self.statistics = Statistics::default();
        self.descend(self.tree.root());

        let selected = reconstruct(&self.tree, &self.items, &self.incumbent.witness).unwrap_or_default();
        info!(
            optimal  = self.incumbent.best_value,
            explored = self.statistics.explored,
            pruned   = self.statistics.pruned,
            nodes    = self.tree.nb_nodes(),
            "sequential search complete");

        Ok(SearchOutcome {
            optimal_value: self.incumbent.best_value,
            selected,
            statistics: self.statistics,
            tree: std::mem::take(&mut self.tree),
        })
    }
}
