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

//! This module provides the bound evaluator: the fractional relaxation of the
//! residual problem of a node.

use crate::{DecisionNode, Item};

/// Computes an optimistic estimate of the best value reachable from `node`.
///
/// The `items` must be sorted with `compare_items`. Starting from the value
/// of the node, the evaluator greedily adds the undecided items (in order)
/// while they fit. The first item that does not fit contributes the fraction
/// of its value that fills the remaining capacity, and the evaluation stops.
///
/// An infeasible node (heavier than the capacity) has a bound of zero. For
/// any other node, the bound is never less than `node.t_value`. In particular,
/// a node filled exactly to capacity is bounded by its own value (rather
/// than zero).
///
/// # Note
/// The greedy suffix is recomputed on every call: this costs O(n) per node.
///
/// # Example
/// ```
/// # use knapsack_bnb::*;
/// let mut items = vec![
///     Item::new(1, 10.0, 5.0),
///     Item::new(2, 40.0, 4.0),
///     Item::new(3, 30.0, 6.0),
///     Item::new(4, 50.0, 3.0),
/// ];
/// sort_items(&mut items);
/// // items 4 and 2 fit (value 90, weight 7), then half of item 3 fills the
/// // remaining 3 units of capacity.
/// assert_eq!(105.0, bound(&DecisionNode::root(), &items, 10.0));
/// ```
pub fn bound(node: &DecisionNode, items: &[Item], capacity: f32) -> f32 {
    if node.t_weight > capacity {
        return 0.0;
    }

    let mut bound  = node.t_value;
    let mut weight = node.t_weight;
    let mut next   = node.depth;

    while next < items.len() && weight + items[next].weight <= capacity {
        weight += items[next].weight;
        bound  += items[next].value;
        next   += 1;
    }

    if next < items.len() {
        bound += (capacity - weight) * items[next].ratio();
    }

    bound
}

#[cfg(test)]
mod test_bound {
    use crate::*;

    fn catalogue() -> Vec<Item> {
        let mut items = vec![
            Item::new(1, 10.0, 5.0),
            Item::new(2, 40.0, 4.0),
            Item::new(3, 30.0, 6.0),
            Item::new(4, 50.0, 3.0),
        ];
        sort_items(&mut items);
        items
    }

    #[test]
    fn root_bound_is_the_fractional_relaxation() {
        let items = catalogue();
        assert_eq!(105.0, bound(&DecisionNode::root(), &items, 10.0));
    }
    #[test]
    fn infeasible_node_has_a_zero_bound() {
        let items = catalogue();
        let heavy = Item::new(9, 100.0, 11.0);
        let node  = DecisionNode::root().child(&heavy, true);
        assert_eq!(0.0, bound(&node, &items, 10.0));
    }
    #[test]
    fn full_node_is_bounded_by_its_own_value() {
        // items 4 (w 3) and 3 (w 6) fill a capacity of 9 exactly
        let items = catalogue();
        let root  = DecisionNode::root();
        let n4    = root.child(&items[0], true);
        let n2    = n4.child(&items[1], false);
        let n3    = n2.child(&items[2], true);
        assert_eq!(9.0, n3.t_weight);
        assert_eq!(80.0, bound(&n3, &items, 9.0));
    }
    #[test]
    fn bound_never_includes_decided_items_twice() {
        let items = catalogue();
        let root  = DecisionNode::root();
        let n4    = root.child(&items[0], false);
        // 2 (w 4) + 3 (w 6) fit in 10, then item 1 no longer fits at all
        assert_eq!(70.0, bound(&n4, &items, 10.0));
    }
    #[test]
    fn zero_weight_items_are_always_added_whole() {
        let mut items = vec![Item::new(1, 7.0, 0.0), Item::new(2, 10.0, 10.0)];
        sort_items(&mut items);
        assert_eq!(12.0, bound(&DecisionNode::root(), &items, 5.0));
    }
    #[test]
    fn terminal_node_is_bounded_by_its_own_value() {
        let items = catalogue();
        let mut node = DecisionNode::root();
        for item in items.iter() {
            node = node.child(item, false);
        }
        assert_eq!(0.0, bound(&node, &items, 10.0));
        let node = DecisionNode::root().child(&items[0], true).child(&items[1], true).child(&items[2], false).child(&items[3], false);
        assert_eq!(90.0, bound(&node, &items, 10.0));
    }
}
