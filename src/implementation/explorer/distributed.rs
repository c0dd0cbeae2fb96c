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

//! This module provides the implementation of the distributed explorer. The
//! decision space is statically partitioned among the ranks of a cluster
//! according to the decisions taken on the first few items. Each rank then
//! explores its own partitions best first, in isolation, and the ranks only
//! reconcile their incumbents once per partition.

use tracing::{debug, info, info_span};

use crate::{bound, reconstruct, sorted_catalogue, wire, Communicator, DecisionNode, DecisionTree, Error, Explorer, Fringe, Incumbent, Item, MaxBound, NodeId, OpenNode, SearchOutcome, SimpleFringe, Statistics, SearchConfigBuilderError, DEFAULT_PREFIX_LEVELS, MAX_PREFIX_LEVELS};

/// The private state of one rank
struct RankState {
    /// The best solution this rank has found by itself. Its witness always
    /// lives in `tree`.
    found: Incumbent,
    /// The best value known to any rank, as of the latest reconciliation
    adopted: f32,
    /// The tree of the only partition this rank retains: the one holding
    /// the witness of `found`
    tree: Option<DecisionTree>,
    statistics: Statistics,
}

/// The distributed explorer. One instance runs on each rank of the cluster,
/// all of them with the same catalogue and capacity. Every rank returns the
/// same optimal value and the same selected items; the statistics are the
/// sums over all ranks. The tree returned by a rank is the one it retained
/// (or a lone root when it never improved on the empty knapsack).
///
/// # Partitioning
/// The decisions on the first `K = min(prefix_levels, n)` items define
/// `2^K` prefix patterns. Pattern `p` includes item `i` iff bit `K-1-i` of
/// `p` is set, and it is owned by rank `p % size`. An include decision that
/// would overflow the knapsack is turned into an exclude one.
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
/// let outcomes = LocalCluster::run(3, |endpoint| {
///     DistributedExplorer::new(endpoint, &items, 10.0).explore().unwrap()
/// });
/// for outcome in outcomes {
///     assert_eq!(90.0, outcome.optimal_value);
/// }
/// ```
pub struct DistributedExplorer<C: Communicator> {
    comm: C,
    items: Vec<Item>,
    capacity: f32,
    pruning: bool,
    prefix_levels: usize,
}

impl <C: Communicator> DistributedExplorer<C> {
    pub fn new(comm: C, items: &[Item], capacity: f32) -> Self {
        Self {
            comm,
            items: sorted_catalogue(items),
            capacity,
            pruning: true,
            prefix_levels: DEFAULT_PREFIX_LEVELS,
        }
    }
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }
    /// Sets the number of leading decisions fixed by the prefix patterns.
    /// Exploring with more than `MAX_PREFIX_LEVELS` fails with `Error::Config`.
    pub fn with_prefix_levels(mut self, prefix_levels: usize) -> Self {
        self.prefix_levels = prefix_levels;
        self
    }
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn threshold(&self, state: &RankState) -> f32 {
        if self.pruning {
            state.adopted.max(state.found.best_value)
        } else {
            f32::NEG_INFINITY
        }
    }
    /// Tells whether or not item `level` is included by `pattern`
    fn prefix_includes(pattern: usize, level: usize, nb_levels: usize) -> bool {
        (pattern >> (nb_levels - 1 - level)) & 1 == 1
    }

    /// Creates the child of `tree[id]` and checks its bound. Returns the id of
    /// the child iff it must be developed further.
    fn branch(&self, state: &mut RankState, tree: &mut DecisionTree, id: NodeId, include: bool) -> Option<NodeId> {
        let node = tree[id];
        let item = &self.items[node.depth];

        let mut child = node.child(item, include);
        child.bound = bound(&child, &self.items, self.capacity);
        let child_id = tree.add_child(id, child);
        if include {
            state.found.offer(&child);
        }

        state.statistics.explored += 1;
        if child.bound > self.threshold(state) {
            Some(child_id)
        } else {
            state.statistics.pruned += 1;
            None
        }
    }

    /// Applies the decisions of one prefix pattern to a fresh tree. Returns
    /// that tree along with the node from which the search must go on, or
    /// None when the pattern was abandoned.
    fn explore_pattern(&self, state: &mut RankState, pattern: usize, nb_levels: usize) -> (DecisionTree, Option<NodeId>) {
        let mut root = DecisionNode::root();
        root.bound = bound(&root, &self.items, self.capacity);
        let mut tree = DecisionTree::new(root);

        state.statistics.explored += 1;
        if root.bound <= self.threshold(state) {
            state.statistics.pruned += 1;
            debug!(pattern, "pattern abandoned at the root");
            return (tree, None);
        }

        let mut id = tree.root();
        for level in 0..nb_levels {
            let include = Self::prefix_includes(pattern, level, nb_levels)
                && tree[id].child(&self.items[level], true).is_feasible(self.capacity);

            match self.branch(state, &mut tree, id, include) {
                Some(child) => id = child,
                None => {
                    debug!(pattern, level, "pattern abandoned");
                    return (tree, None);
                }
            }
        }
        (tree, Some(id))
    }

    /// Best first search of the subtree rooted in `start`
    fn best_first(&self, state: &mut RankState, tree: &mut DecisionTree, start: NodeId) {
        let mut fringe = SimpleFringe::new(MaxBound);
        fringe.push(OpenNode::new(start, &tree[start]));

        while let Some(open) = fringe.pop() {
            if open.bound <= self.threshold(state) {
                state.statistics.pruned += 1;
                continue;
            }
            let node = tree[open.id];
            if node.is_terminal(self.items.len()) {
                continue;
            }

            if node.child(&self.items[node.depth], true).is_feasible(self.capacity) {
                if let Some(child) = self.branch(state, tree, open.id, true) {
                    fringe.push(OpenNode::new(child, &tree[child]));
                }
            }
            if let Some(child) = self.branch(state, tree, open.id, false) {
                fringe.push(OpenNode::new(child, &tree[child]));
            }
        }
    }

    fn search(&self) -> Result<SearchOutcome, Error> {
        let rank = self.comm.rank();
        let size = self.comm.size();
        let nb_levels = self.prefix_levels.min(self.items.len());

        let mut state = RankState {
            found: Incumbent::default(),
            adopted: 0.0,
            tree: None,
            statistics: Statistics::default(),
        };

        for pattern in 0..(1_usize << nb_levels) {
            if pattern % size == rank {
                let before = state.found.best_value;
                let (mut tree, start) = self.explore_pattern(&mut state, pattern, nb_levels);
                if let Some(start) = start {
                    self.best_first(&mut state, &mut tree, start);
                }
                if state.found.best_value > before {
                    debug!(pattern, value = state.found.best_value, "pattern retained");
                    state.tree = Some(tree);
                }
            }
            let local = state.adopted.max(state.found.best_value);
            state.adopted = self.comm.all_reduce_max(local)?;
        }

        let optimal = self.comm.all_reduce_max(state.found.best_value)?;
        let (_, owner) = self.comm.all_reduce_max_loc(state.found.best_value)?;

        let tree = state.tree.take().unwrap_or_default();
        let selected = if rank == owner {
            let selected = reconstruct(&tree, &self.items, &state.found.witness).unwrap_or_default();
            self.comm.broadcast(owner, wire::encode_count(selected.len())?)?;
            if !selected.is_empty() {
                self.comm.broadcast(owner, wire::encode_records(&selected))?;
            }
            debug!(count = selected.len(), "selection broadcast");
            selected
        } else {
            let count = wire::decode_count(&self.comm.broadcast(owner, Default::default())?)?;
            if count > 0 {
                wire::decode_records(count, &self.comm.broadcast(owner, Default::default())?)?
            } else {
                vec![]
            }
        };

        let statistics = Statistics {
            explored: self.comm.all_reduce_sum(state.statistics.explored)?,
            pruned  : self.comm.all_reduce_sum(state.statistics.pruned)?,
        };
        info!(
            optimal  = optimal,
            owner    = owner,
            explored = statistics.explored,
            pruned   = statistics.pruned,
            "distributed search complete");

        Ok(SearchOutcome {
            optimal_value: optimal,
            selected,
            statistics,
            tree,
        })
    }
}

impl <C: Communicator> Explorer for DistributedExplorer<C> {
    fn explore(&mut self) -> Result<SearchOutcome, Error> {
        if self.prefix_levels > MAX_PREFIX_LEVELS {
            let msg = format!("at most {} prefix levels are supported (got {})", MAX_PREFIX_LEVELS, self.prefix_levels);
            return Err(Error::Config(SearchConfigBuilderError::ValidationError(msg)));
        }
        if self.items.is_empty() {
            return Ok(SearchOutcome::empty());
        }
        let span = info_span!("rank", rank = self.comm.rank());
        let _enter = span.enter();
        self.search()
    }
}

#[cfg(test)]
mod test_distributed {
    use crate::*;

    fn scenario() -> Vec<Item> {
        vec![
            Item::new(1, 10.0, 5.0),
            Item::new(2, 40.0, 4.0),
            Item::new(3, 30.0, 6.0),
            Item::new(4, 50.0, 3.0),
        ]
    }
    fn instance(n: i32) -> Vec<Item> {
        (0..n).map(|i| Item::new(i, ((i * 37) % 23 + 1) as f32, ((i * 17) % 13 + 1) as f32)).collect()
    }
    fn ids(items: &[Item]) -> Vec<i32> {
        items.iter().map(|i| i.id).collect()
    }
    fn solve(ranks: usize, items: &[Item], capacity: f32, levels: usize, pruning: bool) -> Vec<SearchOutcome> {
        LocalCluster::run(ranks, |ep| {
            DistributedExplorer::new(ep, items, capacity)
                .with_prefix_levels(levels)
                .with_pruning(pruning)
                .explore()
                .unwrap()
        })
    }

    #[test]
    fn pattern_bits_are_read_from_the_most_significant_one() {
        type D = DistributedExplorer<LocalEndpoint>;
        assert!( D::prefix_includes(0b10, 0, 2));
        assert!(!D::prefix_includes(0b10, 1, 2));
        assert!(!D::prefix_includes(0b01, 0, 2));
        assert!( D::prefix_includes(0b01, 1, 2));
        assert!( D::prefix_includes(0b1, 0, 1));
    }
    #[test]
    fn it_solves_the_reference_scenario_whatever_the_number_of_ranks() {
        for ranks in [1, 2, 3, 4, 5] {
            for outcome in solve(ranks, &scenario(), 10.0, 2, true) {
                assert_eq!(90.0, outcome.optimal_value);
                assert_eq!(vec![4, 2], ids(&outcome.selected));
            }
        }
    }
    #[test]
    fn empty_input_yields_a_degraded_outcome_on_every_rank() {
        for outcome in solve(3, &[], 100.0, 2, true) {
            assert_eq!(0.0, outcome.optimal_value);
            assert!(outcome.selected.is_empty());
        }
    }
    #[test]
    fn an_item_heavier_than_the_capacity_is_never_selected() {
        for outcome in solve(2, &[Item::new(1, 50.0, 20.0)], 10.0, 2, true) {
            assert_eq!(0.0, outcome.optimal_value);
            assert!(outcome.selected.is_empty());
        }
    }
    #[test]
    fn a_single_item_is_decided_by_the_prefix() {
        for outcome in solve(4, &[Item::new(7, 50.0, 5.0)], 10.0, 2, true) {
            assert_eq!(50.0, outcome.optimal_value);
            assert_eq!(vec![7], ids(&outcome.selected));
        }
    }
    #[test]
    fn all_ranks_agree_with_the_sequential_explorer() {
        let items = instance(20);
        let capacity = 50.0;
        let expected = SequentialExplorer::new(&items, capacity).explore().unwrap();
        for ranks in [1, 3, 4] {
            for levels in [0, 2, 3, 5] {
                let outcomes = solve(ranks, &items, capacity, levels, true);
                for outcome in outcomes.iter() {
                    assert!((expected.optimal_value - outcome.optimal_value).abs() < 1e-3);
                    assert!((expected.optimal_value - outcome.total_value()).abs() < 1e-3);
                    assert!(outcome.total_weight() <= capacity);
                    assert_eq!(outcomes[0].selected, outcome.selected);
                    assert_eq!(outcomes[0].statistics, outcome.statistics);
                }
            }
        }
    }
    #[test]
    fn without_pruning_nothing_is_pruned() {
        let items = instance(8);
        for outcome in solve(3, &items, 20.0, 2, false) {
            let expected = SequentialExplorer::new(&items, 20.0).explore().unwrap();
            assert_eq!(expected.optimal_value, outcome.optimal_value);
            assert_eq!(0, outcome.statistics.pruned);
        }
    }
    #[test]
    fn a_forced_exclusion_still_covers_the_space() {
        // the first item never fits: the patterns including it are excluding it
        let items = vec![Item::new(1, 1000.0, 11.0), Item::new(2, 3.0, 2.0), Item::new(3, 4.0, 4.0)];
        for outcome in solve(4, &items, 10.0, 2, true) {
            assert_eq!(7.0, outcome.optimal_value);
            assert_eq!(vec![2, 3], ids(&outcome.selected));
        }
    }
    #[test]
    fn too_many_prefix_levels_are_reported_on_every_rank() {
        let items = instance(70);
        let results = LocalCluster::run(2, |ep| {
            DistributedExplorer::new(ep, &items, 100.0).with_prefix_levels(64).explore()
        });
        for result in results {
            assert!(matches!(result, Err(Error::Config(_))));
        }
    }
    #[test]
    fn the_deepest_accepted_prefix_still_covers_the_space() {
        let items = instance(10);
        let expected = SequentialExplorer::new(&items, 30.0).explore().unwrap();
        for outcome in solve(3, &items, 30.0, MAX_PREFIX_LEVELS, true) {
            assert_eq!(expected.optimal_value, outcome.optimal_value);
        }
    }
}
