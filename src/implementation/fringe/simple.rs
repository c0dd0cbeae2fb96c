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

//! This module provides the implementation of a simple fringe (priority queue)

use binary_heap_plus::BinaryHeap;
use compare::Compare;

use crate::{Fringe, OpenNode};

/// The simplest fringe implementation you can think of: is basically consists
/// of a binary heap that pushes and pops the open nodes.
///
/// # Note
/// This is the fringe of the best-first searches run by the distributed
/// explorer, ordered with `MaxBound`.
pub struct SimpleFringe<O: Compare<OpenNode>> {
    heap: BinaryHeap<OpenNode, O>,
}
impl <O> SimpleFringe<O> where O: Compare<OpenNode> {
    /// This creates a new simple fringe which uses a custom node order.
    pub fn new(o: O) -> Self {
        Self { heap: BinaryHeap::from_vec_cmp(vec![], o) }
    }
}
impl <O> Fringe for SimpleFringe<O> where O: Compare<OpenNode> {
    fn push(&mut self, node: OpenNode) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod test_simple_fringe {
    use crate::*;

    fn open(id: usize, bound: f32, value: f32) -> OpenNode {
        OpenNode { id: NodeId(id), bound, value }
    }

    // by default, it is empty
    #[test]
    fn by_default_it_is_empty() {
        let fringe = SimpleFringe::new(MaxBound);
        assert!(fringe.is_empty());
        assert_eq!(0, fringe.len());
    }

    // when I push a node onto the fringe then the length increases
    #[test]
    fn when_i_push_a_node_onto_the_fringe_then_the_length_increases() {
        let mut fringe = SimpleFringe::new(MaxBound);
        fringe.push(open(0, 10.0, 10.0));
        fringe.push(open(1, 20.0, 20.0));
        assert_eq!(2, fringe.len());
        assert!(!fringe.is_empty());
    }
    // when I pop a node off the fringe then the length decreases
    #[test]
    fn when_i_pop_a_node_off_the_fringe_then_the_length_decreases() {
        let mut fringe = SimpleFringe::new(MaxBound);
        fringe.push(open(0, 10.0, 10.0));
        fringe.push(open(1, 20.0, 20.0));
        fringe.pop();
        assert_eq!(1, fringe.len());
        fringe.pop();
        assert_eq!(0, fringe.len());
    }
    // when I try to pop a node off an empty fringe, I get none
    #[test]
    fn when_i_try_to_pop_a_node_off_an_empty_fringe_i_get_none() {
        let mut fringe = SimpleFringe::new(MaxBound);
        assert!(fringe.pop().is_none());
    }
    // when I pop a node, it is always the one with the largest bound (then value)
    #[test]
    fn when_i_pop_a_node_it_is_always_the_one_with_the_largest_bound_then_value() {
        let mut fringe = SimpleFringe::new(MaxBound);
        fringe.push(open(0, 1.0, 1.0));
        fringe.push(open(1, 2.0, 2.0));
        fringe.push(open(2, 3.0, 3.0));
        fringe.push(open(3, 4.0, 4.0));
        fringe.push(open(4, 5.0, 4.0));
        fringe.push(open(5, 5.0, 5.0));

        let order: Vec<usize> = std::iter::from_fn(|| fringe.pop()).map(|n| n.id.id()).collect();
        assert_eq!(vec![5, 4, 3, 2, 1, 0], order);
    }
    // when I pop the last node, the fringe becomes empty
    #[test]
    fn when_i_pop_the_last_node_the_fringe_becomes_empty() {
        let mut fringe = SimpleFringe::new(MaxBound);
        fringe.push(open(0, 5.0, 5.0));
        assert!(!fringe.is_empty());
        fringe.pop();
        assert!(fringe.is_empty());
    }
}
