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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

use std::cmp::Ordering;

use tracing::trace;

use crate::{DecisionNode, DecisionTree, NodeId};

// ----------------------------------------------------------------------------
// --- ITEM -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// One entry of the item catalogue. Items are immutable once they have been
/// loaded: the explorers only ever reorder them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Item {
    pub id    : i32,
    pub value : f32,
    pub weight: f32,
}
impl Item {
    pub fn new(id: i32, value: f32, weight: f32) -> Self {
        Self { id, value, weight }
    }
    /// The value brought by one unit of weight of this item.
    ///
    /// # Note
    /// An item that weighs nothing has an infinite ratio (even when it is
    /// worth nothing). This way, it is always sorted before any other item
    /// and the comparator never needs to divide by zero.
    ///
    /// # Examples:
    /// ```
    /// # use knapsack_bnb::Item;
    /// assert_eq!(2.0, Item::new(1, 10.0, 5.0).ratio());
    /// assert_eq!(f32::INFINITY, Item::new(2, 10.0, 0.0).ratio());
    /// assert_eq!(f32::INFINITY, Item::new(3,  0.0, 0.0).ratio());
    /// ```
    #[inline]
    pub fn ratio(&self) -> f32 {
        if self.weight == 0.0 {
            f32::INFINITY
        } else {
            self.value / self.weight
        }
    }
}

/// The deterministic comparator used by every explorer to order the catalogue.
/// Items are sorted by decreasing value/weight ratio; ties are broken by
/// decreasing value.
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.ratio().total_cmp(&a.ratio())
        .then_with(|| b.value.total_cmp(&a.value))
}

/// Sorts the given catalogue in place. The sort is stable, so that items which
/// are indistinguishable for `compare_items` keep their relative order (and
/// all processes sorting the same input obtain the very same order).
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_items)
}

/// Returns a sorted copy of the given catalogue.
pub(crate) fn sorted_catalogue(items: &[Item]) -> Vec<Item> {
    let mut sorted = items.to_vec();
    sort_items(&mut sorted);
    for (pos, item) in sorted.iter().enumerate() {
        trace!(pos, id = item.id, value = item.value, weight = item.weight, ratio = item.ratio(), "sorted item");
    }
    sorted
}

// ----------------------------------------------------------------------------
// --- INCUMBENT --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Identifies the node witnessing the incumbent value. Nodes are matched by
/// their accumulated value and weight rather than by identity, which is what
/// lets a witness outlive the grafting of tree fragments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Witness {
    pub t_value : f32,
    pub t_weight: f32,
    pub depth   : usize,
}
impl From<&DecisionNode> for Witness {
    fn from(node: &DecisionNode) -> Self {
        Self { t_value: node.t_value, t_weight: node.t_weight, depth: node.depth }
    }
}

/// The best feasible value discovered so far and the node witnessing it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Incumbent {
    pub best_value: f32,
    pub witness   : Witness,
}
impl Default for Incumbent {
    /// The empty knapsack (the tree root) is always feasible.
    fn default() -> Self {
        Self {
            best_value: 0.0,
            witness   : Witness::from(&DecisionNode::root()),
        }
    }
}
impl Incumbent {
    /// Adopts `node` as the new incumbent iff it strictly improves the best
    /// known value. Returns true when that happened.
    pub fn offer(&mut self, node: &DecisionNode) -> bool {
        if node.t_value > self.best_value {
            self.best_value = node.t_value;
            self.witness    = Witness::from(node);
            true
        } else {
            false
        }
    }
}

// ----------------------------------------------------------------------------
// --- OPEN NODE --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A node of the decision tree which is waiting on a fringe to be expanded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenNode {
    /// The position of the node in its tree
    pub id: NodeId,
    /// The upper bound on the value reachable from this node
    pub bound: f32,
    /// The value accumulated along the path leading to the node
    pub value: f32,
}
impl OpenNode {
    pub fn new(id: NodeId, node: &DecisionNode) -> Self {
        Self { id, bound: node.bound, value: node.t_value }
    }
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Exploration counters
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// The number of nodes whose bound has been checked against the incumbent
    pub explored: u64,
    /// The number of those nodes which were discarded by that check
    pub pruned: u64,
}

/// The outcome of one search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The optimal value of the instance (0 when nothing fits)
    pub optimal_value: f32,
    /// The items of an optimal selection, by increasing decision level
    pub selected: Vec<Item>,
    /// How much work was needed to prove optimality
    pub statistics: Statistics,
    /// The tree built by the explorer. It is released along with the outcome.
    pub tree: DecisionTree,
}
impl SearchOutcome {
    /// The degraded (but valid) outcome of a search over an empty catalogue.
    pub(crate) fn empty() -> Self {
        Self {
            optimal_value: 0.0,
            selected: vec![],
            statistics: Statistics::default(),
            tree: DecisionTree::default(),
        }
    }
    /// The total weight of the selected items
    pub fn total_weight(&self) -> f32 {
        self.selected.iter().map(|i| i.weight).sum()
    }
    /// The total value of the selected items
    pub fn total_value(&self) -> f32 {
        self.selected.iter().map(|i| i.value).sum()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
