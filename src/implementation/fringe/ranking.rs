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

//! This module provides the ordering of the open nodes of a fringe.

use std::cmp::Ordering;

use compare::Compare;

use crate::OpenNode;

/// The MaxBound strategy is one that always selects the node having the
/// highest upper bound in the fringe. In case of equalities, the ties are
/// broken using the value accumulated so far and eventually the node id (the
/// oldest node first), so that the exploration order is fully deterministic.
///
/// # Example
/// ```
/// # use knapsack_bnb::*;
/// let a = OpenNode { id: NodeId(0), bound: 300.0, value: 42.0 };
/// let b = OpenNode { id: NodeId(1), bound: 100.0, value:  2.0 };
/// let c = OpenNode { id: NodeId(2), bound: 100.0, value: 19.0 };
/// let d = OpenNode { id: NodeId(3), bound: 700.0, value: 65.0 };
///
/// let mut fringe = SimpleFringe::new(MaxBound);
/// fringe.push(a);
/// fringe.push(b);
/// fringe.push(c);
/// fringe.push(d);
///
/// assert_eq!(NodeId(3), fringe.pop().unwrap().id); // because 700 is the highest bound
/// assert_eq!(NodeId(0), fringe.pop().unwrap().id); // because 300 is the next highest
/// assert_eq!(NodeId(2), fringe.pop().unwrap().id); // because bound = 100 but value = 19
/// assert_eq!(NodeId(1), fringe.pop().unwrap().id); // because bound = 100 but value = 2
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxBound;
impl Compare<OpenNode> for MaxBound {
    fn compare(&self, l: &OpenNode, r: &OpenNode) -> Ordering {
        l.bound.total_cmp(&r.bound)
            .then_with(|| l.value.total_cmp(&r.value))
            .then_with(|| r.id.cmp(&l.id))
    }
}

#[cfg(test)]
mod test_maxbound {
    use std::cmp::Ordering;
    use compare::Compare;
    use crate::*;

    fn open(id: usize, bound: f32, value: f32) -> OpenNode {
        OpenNode { id: NodeId(id), bound, value }
    }

    #[test]
    fn gt_because_bound() {
        assert_eq!(Ordering::Greater, MaxBound.compare(&open(0, 300.0, 42.0), &open(1, 100.0, 42.0)));
    }
    #[test]
    fn gt_because_value() {
        assert_eq!(Ordering::Greater, MaxBound.compare(&open(0, 300.0, 42.0), &open(1, 300.0, 2.0)));
    }
    #[test]
    fn lt_because_bound() {
        assert_eq!(Ordering::Less, MaxBound.compare(&open(1, 100.0, 42.0), &open(0, 300.0, 42.0)));
    }
    #[test]
    fn older_node_wins_the_ties() {
        assert_eq!(Ordering::Greater, MaxBound.compare(&open(0, 300.0, 42.0), &open(1, 300.0, 42.0)));
        assert_eq!(Ordering::Less,    MaxBound.compare(&open(1, 300.0, 42.0), &open(0, 300.0, 42.0)));
    }
    #[test]
    fn eq_self() {
        let a = open(0, 300.0, 42.0);
        assert_eq!(Ordering::Equal, MaxBound.compare(&a, &a));
    }
}
