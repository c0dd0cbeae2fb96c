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

//! This module provides the reconstruction of the selected items from a
//! decision tree.

use crate::{DecisionTree, Item, Witness};

/// Retraces the path from the root of `tree` to the first node (in depth
/// first, include-first order) whose accumulated value and weight match the
/// `target`, and returns the items included along that path, by increasing
/// decision level. Returns None when no node of the tree matches.
///
/// The `items` must be the sorted catalogue the tree was built from.
///
/// # Note
/// Nodes are matched by value and weight, not by identity. When two distinct
/// paths reach the very same pair (e.g. with duplicate items), the first one
/// is returned. Both selections have the same value and weight, though.
pub fn reconstruct(tree: &DecisionTree, items: &[Item], target: &Witness) -> Option<Vec<Item>> {
    let mut path  = vec![];
    // each frame holds a node and the length of the path leading to its parent
    let mut stack = vec![(tree.root(), 0_usize)];

    while let Some((id, len)) = stack.pop() {
        let node = &tree[id];
        path.truncate(len);
        if node.included {
            if let Some(level) = node.level() {
                path.push(items[level]);
            }
        }

        if node.t_value == target.t_value && node.t_weight == target.t_weight {
            return Some(path);
        }

        let len = path.len();
        if let Some(exclude) = node.exclude {
            stack.push((exclude, len));
        }
        if let Some(include) = node.include {
            stack.push((include, len));
        }
    }
    None
}

#[cfg(test)]
mod test_reconstruct {
    use crate::*;

    /// Builds the complete tree of the feasible assignments
    fn complete_tree(items: &[Item], capacity: f32) -> DecisionTree {
        let mut tree  = DecisionTree::default();
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            let node = tree[id];
            if node.is_terminal(items.len()) {
                continue;
            }
            let item = &items[node.depth];
            let inc  = node.child(item, true);
            if inc.is_feasible(capacity) {
                stack.push(tree.add_child(id, inc));
            }
            stack.push(tree.add_child(id, node.child(item, false)));
        }
        tree
    }

    #[test]
    fn root_target_yields_an_empty_selection() {
        let tree = DecisionTree::default();
        let sel  = reconstruct(&tree, &[], &Incumbent::default().witness);
        assert_eq!(Some(vec![]), sel);
    }
    #[test]
    fn path_lists_included_items_by_level() {
        let mut items = vec![
            Item::new(1, 10.0, 5.0),
            Item::new(2, 40.0, 4.0),
            Item::new(3, 30.0, 6.0),
            Item::new(4, 50.0, 3.0),
        ];
        sort_items(&mut items);
        let tree   = complete_tree(&items, 10.0);
        let target = Witness { t_value: 90.0, t_weight: 7.0, depth: 2 };
        let sel    = reconstruct(&tree, &items, &target).unwrap();
        let ids: Vec<i32> = sel.iter().map(|i| i.id).collect();
        assert_eq!(vec![4, 2], ids);
    }
    #[test]
    fn unknown_target_yields_none() {
        let items  = vec![Item::new(1, 10.0, 5.0)];
        let tree   = complete_tree(&items, 10.0);
        let target = Witness { t_value: 11.0, t_weight: 5.0, depth: 1 };
        assert_eq!(None, reconstruct(&tree, &items, &target));
    }
    #[test]
    fn ambiguous_target_resolves_to_the_first_depth_first_match() {
        // Items 1 and 2 are interchangeable: both single-item paths reach
        // (10, 5). Whichever of them actually witnessed the incumbent, the
        // reconstruction returns the first one met depth first. This is a
        // known ambiguity of matching by value and weight; the selection is
        // nevertheless equivalent.
        let items  = vec![Item::new(1, 10.0, 5.0), Item::new(2, 10.0, 5.0)];
        let tree   = complete_tree(&items, 5.0);
        let target = Witness { t_value: 10.0, t_weight: 5.0, depth: 2 };
        let sel    = reconstruct(&tree, &items, &target).unwrap();
        assert_eq!(vec![Item::new(1, 10.0, 5.0)], sel);
    }
    #[test]
    fn reconstruction_does_not_depend_on_node_ids() {
        let items = vec![Item::new(1, 10.0, 5.0), Item::new(2, 4.0, 4.0)];
        let a = complete_tree(&items, 10.0);

        // same tree, built in a different order through grafts
        let root = DecisionNode::root();
        let mut b = DecisionTree::new(root);
        let mut inc = DecisionTree::new(root.child(&items[0], true));
        let iroot = inc.root();
        inc.add_child(iroot, inc[iroot].child(&items[1], false));
        inc.add_child(iroot, inc[iroot].child(&items[1], true));
        let broot = b.root();
        b.add_child(broot, root.child(&items[0], false));
        b.graft(broot, inc);

        let target = Witness { t_value: 14.0, t_weight: 9.0, depth: 2 };
        assert_eq!(reconstruct(&a, &items, &target), reconstruct(&b, &items, &target));
        assert_eq!(2, reconstruct(&b, &items, &target).unwrap().len());
    }
}
