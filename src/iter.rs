use core::{iter::FusedIterator, marker::PhantomData};

use cordyceps::Linked;

use crate::{Link, Node, RawTree};

/// The order in which [`Traverse`] visits a node relative to its subtrees.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    Pre,
    /// Left subtree, then node, then right subtree. Yields values in ascending order.
    In,
    /// Left subtree, then right subtree, then node.
    Post,
}

enum CameFrom {
    Parent,
    LeftChild,
    RightChild,
}

/// A lazy depth-first traversal over the values of a tree.
///
/// The traversal follows parent links instead of keeping a stack, so it uses constant memory
/// regardless of the shape of the tree. The tree stays borrowed for as long as the iterator
/// lives; a fresh call on the tree starts a fresh traversal.
pub struct Traverse<'tree, T> {
    order: Order,

    cur: Link<T>,
    from: CameFrom,

    len: usize,
    _tree: PhantomData<&'tree T>,
}

// SAFETY: `Traverse` behaves as a shared reference to the tree.
unsafe impl<T: Sync> Send for Traverse<'_, T> {}
unsafe impl<T: Sync> Sync for Traverse<'_, T> {}

impl<'tree, T> Traverse<'tree, T> {
    pub(crate) fn new<C>(tree: &'tree RawTree<T, C>, order: Order) -> Self {
        Traverse {
            order,

            cur: tree.root(),
            from: CameFrom::Parent,

            len: tree.len(),
            _tree: PhantomData,
        }
    }

    /// Returns the order of this traversal.
    pub fn order(&self) -> Order {
        self.order
    }
}

impl<'tree, T> Iterator for Traverse<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cur = self.cur?;
            let links = unsafe { Node::links(cur).as_ref() };

            // Each arm moves the cursor one step, then yields `cur` if this is the visit point
            // for the traversal's order.
            let visit = match self.from {
                CameFrom::Parent => {
                    // Entering a subtree: its left subtree comes next.
                    match links.left() {
                        Some(left) => self.cur = Some(left),
                        None => self.from = CameFrom::LeftChild,
                    }

                    Order::Pre
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted; the right subtree comes next.
                    match links.right() {
                        Some(right) => {
                            self.cur = Some(right);
                            self.from = CameFrom::Parent;
                        }
                        None => self.from = CameFrom::RightChild,
                    }

                    Order::In
                }

                CameFrom::RightChild => {
                    // Both subtrees have been exhausted. Ascend one level; if there is no parent,
                    // the traversal is complete.
                    match links.parent() {
                        Some(parent) => {
                            let parent_links = unsafe { Node::links(parent).as_ref() };
                            self.from = if parent_links.left() == Some(cur) {
                                CameFrom::LeftChild
                            } else {
                                CameFrom::RightChild
                            };
                            self.cur = Some(parent);
                        }
                        None => self.cur = None,
                    }

                    Order::Post
                }
            };

            if visit == self.order {
                self.len -= 1;

                // SAFETY: the tree is borrowed for `'tree`, so `cur` stays alive and unchanged.
                return Some(unsafe { &(*cur.as_ptr()).value });
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for Traverse<'_, T> {}

impl<T> FusedIterator for Traverse<'_, T> {}
