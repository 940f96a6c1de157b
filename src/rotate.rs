//! Rotations and transplant: the link surgery used to restructure a tree without breaking its
//! order.

use core::ptr::NonNull;

use crate::{Dir, Node, RawTree};

impl<T, C> RawTree<T, C> {
    /// Puts `replacement` where `node` hangs, under `node`'s parent or as the root.
    ///
    /// Only links change; `node` keeps its own links and values are not touched.
    ///
    /// # Safety
    ///
    /// Both nodes must belong to `self`.
    pub(crate) unsafe fn transplant(
        &mut self,
        node: NonNull<Node<T>>,
        replacement: NonNull<Node<T>>,
    ) {
        unsafe {
            let parent = self.links(node).parent();
            self.replace_child_or_set_root(parent, node, Some(replacement));
            self.links_mut(replacement).set_parent(parent);
        }
    }

    // Performs a rotation, moving `node` down in direction `dir` and its `!dir` child up into its
    // place.
    //
    // ```text
    //     node                up
    //    /    \             /    \
    //   a      up    =>   node    c
    //         /  \       /    \
    //     across  c     a   across
    // ```
    //
    // (drawn for `dir == Left`.) `across` changes parent from `up` to `node`.
    //
    // # Safety
    //
    // `node` must belong to `self` and have a `!dir` child.
    pub(crate) unsafe fn rotate(&mut self, node: NonNull<Node<T>>, dir: Dir) {
        unsafe {
            let up = self
                .links(node)
                .child(!dir)
                .expect("rotation requires a child on the rising side");

            let across = self.links(up).child(dir);
            self.links_mut(node).set_child(!dir, across);
            self.maybe_set_parent(across, Some(node));

            self.transplant(node, up);

            self.links_mut(up).set_child(dir, Some(node));
            self.links_mut(node).set_parent(Some(up));
        }
    }

    /// Promotes `node`'s right child into `node`'s place.
    ///
    /// # Safety
    ///
    /// `node` must belong to `self` and have a right child.
    #[inline]
    pub(crate) unsafe fn rotate_left(&mut self, node: NonNull<Node<T>>) {
        unsafe { self.rotate(node, Dir::Left) }
    }

    /// Promotes `node`'s left child into `node`'s place.
    ///
    /// # Safety
    ///
    /// `node` must belong to `self` and have a left child.
    #[inline]
    pub(crate) unsafe fn rotate_right(&mut self, node: NonNull<Node<T>>) {
        unsafe { self.rotate(node, Dir::Right) }
    }

    /// Promotes `node`'s `dir` child into `node`'s place.
    ///
    /// # Safety
    ///
    /// `node` must belong to `self` and have a `dir` child.
    #[inline]
    pub(crate) unsafe fn promote(&mut self, node: NonNull<Node<T>>, dir: Dir) {
        unsafe {
            match dir {
                Dir::Left => self.rotate_right(node),
                Dir::Right => self.rotate_left(node),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::prelude::v1::*;

    use crate::{iter::Order, Link, NaturalOrder, RawTree, Traverse};

    type Tree = RawTree<u32, NaturalOrder<u32>>;

    fn tree_of(values: &[u32]) -> Tree {
        let mut tree: Tree = RawTree::new(u32::cmp as NaturalOrder<u32>);
        for &value in values {
            tree.insert(value);
        }
        tree.assert_invariants();
        tree
    }

    fn preorder(tree: &Tree) -> Vec<u32> {
        Traverse::new(tree, Order::Pre).copied().collect()
    }

    fn find(tree: &Tree, value: u32) -> Link<u32> {
        tree.locate(&value)
    }

    #[test]
    fn rotate_left_at_root() {
        //   2              4
        //  / \            / \
        // 1   4    =>    2   5
        //    / \        / \
        //   3   5      1   3
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);
        let root = find(&tree, 2).unwrap();

        unsafe { tree.rotate_left(root) };
        tree.assert_invariants();

        assert_eq!(tree.root_value(), Some(&4));
        assert_eq!(preorder(&tree), [4, 2, 1, 3, 5]);
    }

    #[test]
    fn rotate_right_at_root() {
        let mut tree = tree_of(&[4, 2, 5, 1, 3]);
        let root = find(&tree, 4).unwrap();

        unsafe { tree.rotate_right(root) };
        tree.assert_invariants();

        assert_eq!(tree.root_value(), Some(&2));
        assert_eq!(preorder(&tree), [2, 1, 4, 3, 5]);
    }

    #[test]
    fn rotate_below_root_relinks_parent() {
        let mut tree = tree_of(&[8, 4, 2, 6, 10]);
        let four = find(&tree, 4).unwrap();

        unsafe { tree.rotate_right(four) };
        tree.assert_invariants();
        assert_eq!(preorder(&tree), [8, 2, 4, 6, 10]);

        let two = find(&tree, 2).unwrap();
        unsafe { tree.rotate_left(two) };
        tree.assert_invariants();
        assert_eq!(preorder(&tree), [8, 4, 2, 6, 10]);
    }

    #[test]
    fn transplant_replaces_subtree() {
        let mut tree = tree_of(&[5, 3, 8, 7]);
        let eight = find(&tree, 8).unwrap();
        let seven = find(&tree, 7).unwrap();

        unsafe {
            // Detach `seven` from `eight` first so the graph stays a tree.
            tree.links_mut(eight).set_left(None);
            tree.transplant(eight, seven);

            let parent = tree.links(seven).parent();
            assert_eq!(parent, find(&tree, 5));
            assert_eq!(tree.links(parent.unwrap()).right(), Some(seven));

            // `eight` is no longer reachable; hand it back to the tree's ownership rules.
            tree.links_mut(eight).set_parent(None);
            drop(<crate::Node<u32> as cordyceps::Linked<crate::Links<u32>>>::from_ptr(eight));
            tree.len -= 1;
        }

        tree.assert_invariants();
        assert_eq!(preorder(&tree), [5, 3, 7]);
    }

    #[test]
    #[should_panic(expected = "values out of order")]
    fn invariants_catch_misordered_values() {
        let tree = tree_of(&[2, 1, 3]);
        let one = find(&tree, 1).unwrap();
        let three = find(&tree, 3).unwrap();

        unsafe { core::ptr::swap(&mut (*one.as_ptr()).value, &mut (*three.as_ptr()).value) };
        tree.assert_invariants();
    }

    #[test]
    #[should_panic(expected = "only the root may lack a parent")]
    fn invariants_catch_stale_parent_link() {
        let mut tree = tree_of(&[2, 1, 3]);
        let one = find(&tree, 1).unwrap();

        unsafe { tree.links_mut(one).set_parent(None) };
        tree.assert_invariants();
    }
}
