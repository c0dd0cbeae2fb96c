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

//! This module provides the decision tree explored by the branch-and-bound.
//!
//! Each node of the tree stands for a partial assignment of the (sorted)
//! items: the first `depth` items have been decided, either included in or
//! excluded from the knapsack. The nodes are stored in an arena and refer to
//! their children by `NodeId`. A node owns its children: no node ever points
//! back to its parent, and the whole tree is released at once when it is
//! dropped.

use std::ops::Index;

use crate::Item;

/// The position of a node in its `DecisionTree`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub usize);
impl NodeId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

/// One step of the search
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecisionNode {
    /// Total weight of the items included so far
    pub t_weight: f32,
    /// Total value of the items included so far
    pub t_value: f32,
    /// Upper bound on the value achievable from this node
    pub bound: f32,
    /// The number of items decided so far (0 at the root)
    pub depth: usize,
    /// Whether this node is reached through an include-edge
    pub included: bool,
    /// The child standing for the inclusion of the next item
    pub include: Option<NodeId>,
    /// The child standing for the exclusion of the next item
    pub exclude: Option<NodeId>,
}

impl DecisionNode {
    /// The pre-decision state: nothing has been decided, the knapsack is empty
    pub fn root() -> Self {
        Self {
            t_weight: 0.0,
            t_value : 0.0,
            bound   : 0.0,
            depth   : 0,
            included: false,
            include : None,
            exclude : None,
        }
    }
    /// The index of the last decided item (None at the root)
    pub fn level(&self) -> Option<usize> {
        self.depth.checked_sub(1)
    }
    /// Creates the child reached when deciding `item` (the item at position
    /// `self.depth` in the sorted catalogue). Its bound is left to zero: it is
    /// up to the caller to evaluate it.
    pub fn child(&self, item: &Item, include: bool) -> Self {
        let (t_weight, t_value) = if include {
            (self.t_weight + item.weight, self.t_value + item.value)
        } else {
            (self.t_weight, self.t_value)
        };
        Self {
            t_weight,
            t_value,
            bound   : 0.0,
            depth   : self.depth + 1,
            included: include,
            include : None,
            exclude : None,
        }
    }
    /// A node whose weight exceeds the capacity must never be expanded
    pub fn is_feasible(&self, capacity: f32) -> bool {
        self.t_weight <= capacity
    }
    /// True iff all the `nb_items` items have been decided
    pub fn is_terminal(&self, nb_items: usize) -> bool {
        self.depth >= nb_items
    }
}

/// The arena owning all the nodes of one decision tree. The root always
/// lives at `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<DecisionNode>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(DecisionNode::root())
    }
}

impl Index<NodeId> for DecisionTree {
    type Output = DecisionNode;

    fn index(&self, id: NodeId) -> &DecisionNode {
        &self.nodes[id.0]
    }
}

impl DecisionTree {
    /// Creates a tree comprising one single node: `root`. Any child links of
    /// `root` are dropped.
    pub fn new(mut root: DecisionNode) -> Self {
        root.include = None;
        root.exclude = None;
        Self { nodes: vec![root] }
    }
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }
    /// The number of nodes in the tree
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }
    /// Iterates over all nodes of the tree (in creation order)
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DecisionNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
    /// Attaches `child` under `parent`, on the side given by `child.included`.
    pub fn add_child(&mut self, parent: NodeId, mut child: DecisionNode) -> NodeId {
        child.include = None;
        child.exclude = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.link(parent, id);
        id
    }
    /// Moves all the nodes of `fragment` into this tree and attaches its root
    /// under `parent` (on the side given by the fragment root's `included`
    /// flag). Returns the new id of the fragment root.
    pub fn graft(&mut self, parent: NodeId, fragment: DecisionTree) -> NodeId {
        let offset = self.nodes.len();
        let rebase = |id: Option<NodeId>| id.map(|NodeId(i)| NodeId(i + offset));

        self.nodes.extend(fragment.nodes.into_iter().map(|mut node| {
            node.include = rebase(node.include);
            node.exclude = rebase(node.exclude);
            node
        }));

        let id = NodeId(offset);
        self.link(parent, id);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        let included = self.nodes[child.0].included;
        let parent = &mut self.nodes[parent.0];
        if included {
            parent.include = Some(child);
        } else {
            parent.exclude = Some(child);
        }
    }
}

#[cfg(test)]
mod test_tree {
    use crate::*;

    #[test]
    fn root_has_no_level() {
        let root = DecisionNode::root();
        assert_eq!(None, root.level());
        assert_eq!(0, root.depth);
        assert!(!root.included);
    }
    #[test]
    fn include_child_accumulates_weight_and_value() {
        let item  = Item::new(1, 10.0, 5.0);
        let child = DecisionNode::root().child(&item, true);
        assert_eq!(5.0, child.t_weight);
        assert_eq!(10.0, child.t_value);
        assert_eq!(Some(0), child.level());
        assert!(child.included);
    }
    #[test]
    fn exclude_child_keeps_weight_and_value() {
        let item  = Item::new(1, 10.0, 5.0);
        let child = DecisionNode::root().child(&item, true).child(&item, false);
        assert_eq!(5.0, child.t_weight);
        assert_eq!(10.0, child.t_value);
        assert_eq!(Some(1), child.level());
        assert!(!child.included);
    }
    #[test]
    fn overweight_nodes_are_infeasible() {
        let item  = Item::new(1, 10.0, 5.0);
        let child = DecisionNode::root().child(&item, true);
        assert!(child.is_feasible(5.0));
        assert!(!child.is_feasible(4.5));
    }
    #[test]
    fn add_child_links_the_parent_on_the_right_side() {
        let item = Item::new(1, 10.0, 5.0);
        let mut tree = DecisionTree::default();
        let root = tree.root();
        let inc = tree.add_child(root, tree[root].child(&item, true));
        let exc = tree.add_child(root, tree[root].child(&item, false));

        assert_eq!(3, tree.nb_nodes());
        assert_eq!(Some(inc), tree[root].include);
        assert_eq!(Some(exc), tree[root].exclude);
        assert_eq!(10.0, tree[inc].t_value);
        assert_eq!(0.0, tree[exc].t_value);
    }
    #[test]
    fn graft_rebases_the_fragment() {
        let a = Item::new(1, 10.0, 5.0);
        let b = Item::new(2,  4.0, 2.0);
        let mut tree = DecisionTree::default();
        let root = tree.root();
        let exc = tree.add_child(root, tree[root].child(&a, false));

        let mut fragment = DecisionTree::new(tree[root].child(&a, true));
        let froot = fragment.root();
        let deep  = fragment.add_child(froot, fragment[froot].child(&b, true));
        assert_eq!(NodeId(1), deep);

        let grafted = tree.graft(root, fragment);
        assert_eq!(NodeId(2), grafted);
        assert_eq!(Some(grafted), tree[root].include);
        assert_eq!(Some(exc), tree[root].exclude);
        assert_eq!(Some(NodeId(3)), tree[grafted].include);
        assert_eq!(14.0, tree[NodeId(3)].t_value);
        assert_eq!(4, tree.nb_nodes());
    }
}
