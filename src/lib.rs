//! Ordered multiset trees: a plain binary search tree and a splay tree.
//!
//! Both trees store bare values ordered by a comparator and keep duplicates.
//! [`BinarySearchTree`] only changes shape when values are added or deleted.
//! [`SplayTree`] performs the same descents and then splays the node it touched to the root,
//! which gives amortized _O(log(n))_ operations without any balance bookkeeping.
#![no_std]

// Conventions used in comments:
// - The parent of a node `x` is denoted `p(x)`, its grandparent `g(x)`.
// - The `dir` child of a node is its left child for `Dir::Left` and its right child for
//   `Dir::Right`.
//
// The structural invariants shared by both trees are:
// 1. Every value in the left subtree of `x` compares `<=` to `x`, and every value in the right
//    subtree of `x` compares `>=` to `x`.
// 2. Every non-root node `x` is a child of `p(x)`. The root has no parent.
// 3. `len` is the number of nodes reachable from the root.
//
// Freshly added values descend left on `>=` and right on `<`, so an equal value always lands
// left of the existing copies it passes. Rotations may later move equal values to either side,
// which (1) permits.

extern crate alloc;
#[cfg(any(test, feature = "model"))]
extern crate std;

use alloc::boxed::Box;
use core::{cell::UnsafeCell, cmp::Ordering, marker::PhantomData, mem, ops::Not, ptr::NonNull};

use cordyceps::Linked;

mod bst;
mod debug;
mod iter;
#[cfg(any(test, feature = "model"))]
pub mod model;
mod rotate;
mod splay;

pub use bst::BinarySearchTree;
pub use iter::{Order, Traverse};
pub use splay::SplayTree;

/// The comparator type of trees built with `new()`: ascending [`Ord`] order.
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// A heap-allocated tree cell.
///
/// The tree owns every node through the `Box` handle it gave up in [`Linked::into_ptr`]. Child
/// links and the parent link are plain pointers; only the tree frees nodes.
#[repr(C)]
pub(crate) struct Node<T> {
    links: Links<T>,
    value: T,
}

pub(crate) struct Links<T> {
    inner: UnsafeCell<LinksInner<T>>,
}

#[repr(C)]
struct LinksInner<T> {
    parent: Link<T>,
    children: [Link<T>; 2],
}

unsafe impl<T> Linked<Links<T>> for Node<T> {
    type Handle = Box<Node<T>>;

    fn into_ptr(node: Self::Handle) -> NonNull<Self> {
        Box::leak(node).into()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<T>> {
        // SAFETY: Self is #[repr(C)] and `links` is first field
        ptr.cast()
    }
}

impl<T> Node<T> {
    fn new(value: T) -> Box<Node<T>> {
        Box::new(Node {
            links: Links::new(),
            value,
        })
    }
}

/// Where a new leaf goes.
pub(crate) enum InsertAs<T> {
    Root,
    Child { parent: NonNull<Node<T>>, dir: Dir },
}

/// The node graph and comparator shared by [`BinarySearchTree`] and [`SplayTree`].
///
/// This type implements every operation once: locating a value, linking a new leaf, splicing a
/// node out, bound searches and the rotation engine. It never splays on its own.
pub(crate) struct RawTree<T, C> {
    root: Link<T>,
    len: usize,
    cmp: C,
    _owns: PhantomData<Box<Node<T>>>,
}

// SAFETY: the tree exclusively owns its nodes, exactly like a `Box<Node<T>>` graph would.
unsafe impl<T: Send, C: Send> Send for RawTree<T, C> {}
unsafe impl<T: Sync, C: Sync> Sync for RawTree<T, C> {}

impl<T, C> RawTree<T, C> {
    pub(crate) const fn new(cmp: C) -> RawTree<T, C> {
        RawTree {
            root: None,
            len: 0,
            cmp,
            _owns: PhantomData,
        }
    }

    pub(crate) const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn root(&self) -> Link<T> {
        self.root
    }

    pub(crate) fn root_value(&self) -> Option<&T> {
        self.root.map(|root| unsafe { self.value(root) })
    }

    // # Safety
    //
    // `node` must be a node of `self`.
    #[inline]
    pub(crate) unsafe fn value(&self, node: NonNull<Node<T>>) -> &T {
        unsafe { &(*node.as_ptr()).value }
    }

    #[inline]
    unsafe fn value_mut(&mut self, node: NonNull<Node<T>>) -> &mut T {
        unsafe { &mut (*node.as_ptr()).value }
    }

    #[inline]
    pub(crate) unsafe fn links(&self, node: NonNull<Node<T>>) -> &Links<T> {
        unsafe { Node::links(node).as_ref() }
    }

    #[inline]
    pub(crate) unsafe fn links_mut(&mut self, node: NonNull<Node<T>>) -> &mut Links<T> {
        unsafe { Node::links(node).as_mut() }
    }

    #[inline]
    pub(crate) unsafe fn maybe_set_parent(&mut self, opt_node: Link<T>, parent: Link<T>) {
        let Some(node) = opt_node else {
            return;
        };

        unsafe { self.links_mut(node).set_parent(parent) };
    }

    /// Returns which child of `parent` the node `child` is.
    #[inline]
    pub(crate) unsafe fn which_child(
        &self,
        parent: NonNull<Node<T>>,
        child: NonNull<Node<T>>,
    ) -> Dir {
        if unsafe { self.links(parent).left() } == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`, or the
    // root pointer when `parent` is `None`.
    //
    // `new_child`'s parent pointer is not updated.
    //
    // # Safety
    //
    // The caller must ensure that `old_child` is a child node of `parent` (or the root when
    // `parent` is `None`).
    pub(crate) unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link<T>,
        old_child: NonNull<Node<T>>,
        new_child: Link<T>,
    ) {
        let Some(parent) = parent else {
            debug_assert_eq!(self.root, Some(old_child), "`old_child` must be the root");
            self.root = new_child;
            return;
        };

        unsafe {
            let dir = self.which_child(parent, old_child);
            debug_assert_eq!(
                self.links(parent).child(dir),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );

            self.links_mut(parent).set_child(dir, new_child);
        }
    }

    // Returns the minimum node in the subtree.
    //
    // If the subtree root is not the minimum, also returns the minimum node's parent.
    #[inline]
    unsafe fn min_in_subtree(
        &self,
        root: NonNull<Node<T>>,
    ) -> (NonNull<Node<T>>, Option<NonNull<Node<T>>>) {
        let mut parent = None;
        let mut cur = root;

        while let Some(left) = unsafe { self.links(cur).left() } {
            parent = Some(cur);
            cur = left;
        }

        (cur, parent)
    }

    /// Returns the node holding the minimum value.
    pub(crate) fn first(&self) -> Link<T> {
        let root = self.root?;
        Some(unsafe { self.min_in_subtree(root).0 })
    }

    /// Returns the node holding the maximum value.
    pub(crate) fn last(&self) -> Link<T> {
        let mut cur = self.root?;

        while let Some(right) = unsafe { self.links(cur).right() } {
            cur = right;
        }

        Some(cur)
    }

    /// Links a new leaf holding `value` at `slot` and returns it.
    ///
    /// # Safety
    ///
    /// `slot` must describe a vacant position of `self` that keeps the values ordered, such as
    /// one returned by [`RawTree::vacant_slot`] for `value` with no mutation since.
    pub(crate) unsafe fn insert_at(&mut self, slot: InsertAs<T>, value: T) -> NonNull<Node<T>> {
        let ptr = Node::into_ptr(Node::new(value));

        unsafe {
            match slot {
                InsertAs::Root => {
                    debug_assert!(self.root.is_none(), "the tree must be empty");
                    self.root = Some(ptr);
                }

                InsertAs::Child { parent, dir } => {
                    debug_assert!(self.links(parent).child(dir).is_none(), "slot is occupied");
                    self.links_mut(parent).set_child(dir, Some(ptr));
                    self.links_mut(ptr).set_parent(Some(parent));
                }
            }
        }

        self.len += 1;
        ptr
    }

    /// Removes the value held by `node` and returns it.
    ///
    /// Removal copies values rather than relinking arbitrary subtrees:
    ///
    /// 1. `node` has two children. Its in-order successor (the leftmost node of its right
    ///    subtree) trades values with it, and removal continues at the successor, which has no
    ///    left child.
    /// 2. `node` is a leaf. It is unlinked from its parent.
    /// 3. `node` has one child. The child's value and both of its subtrees move up into `node`,
    ///    which stays where it is, and the child cell is freed.
    ///
    /// # Safety
    ///
    /// It is the caller's responsibility to ensure that `node` is an element of `self`.
    pub(crate) unsafe fn splice_out(&mut self, node: NonNull<Node<T>>) -> T {
        let mut node = node;

        unsafe {
            if let (Some(_), Some(right)) = (self.links(node).left(), self.links(node).right()) {
                let (successor, _) = self.min_in_subtree(right);
                mem::swap(&mut (*node.as_ptr()).value, &mut (*successor.as_ptr()).value);
                node = successor;
            }

            let left = self.links(node).left();
            let right = self.links(node).right();

            let removed = match left.or(right) {
                None => {
                    let parent = self.links(node).parent();
                    self.replace_child_or_set_root(parent, node, None);

                    let boxed = Node::from_ptr(node);
                    let Node { value, .. } = *boxed;
                    value
                }

                Some(child) => {
                    let grand_left = self.links(child).left();
                    let grand_right = self.links(child).right();

                    self.links_mut(node).set_left(grand_left);
                    self.links_mut(node).set_right(grand_right);
                    self.maybe_set_parent(grand_left, Some(node));
                    self.maybe_set_parent(grand_right, Some(node));

                    let boxed = Node::from_ptr(child);
                    let Node { value, .. } = *boxed;
                    mem::replace(self.value_mut(node), value)
                }
            };

            self.len -= 1;
            removed
        }
    }

    /// Frees every node. Runs in _O(n)_ without recursion.
    pub(crate) fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                // Descend to the minimum node.
                let (cur, parent) = self.min_in_subtree(cur);
                let parent = parent.or_else(|| self.links(cur).parent());

                let right = self.links(cur).right();

                // Elevate the node's right child (which may be None).
                self.replace_child_or_set_root(parent, cur, right);
                self.maybe_set_parent(right, parent);

                // Drop the node.
                drop(Node::from_ptr(cur));
                self.len -= 1;

                // If the node had no right child, climb to the parent. If the node had no parent,
                // the tree is empty.
                opt_cur = right.or(parent);
            }
        }

        debug_assert!(self.root.is_none());
        debug_assert_eq!(self.len(), 0);
    }
}

impl<T, C> RawTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Returns the first node found on the search path whose value compares equal to `value`.
    ///
    /// With duplicates present, which copy is found is unspecified.
    pub(crate) fn locate(&self, value: &T) -> Link<T> {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            unsafe {
                match (self.cmp)(self.value(cur), value) {
                    Ordering::Greater => opt_cur = self.links(cur).left(),
                    Ordering::Equal => return Some(cur),
                    Ordering::Less => opt_cur = self.links(cur).right(),
                }
            }
        }
    }

    /// Descends to the first vacant slot for `value`.
    pub(crate) fn vacant_slot(&self, value: &T) -> InsertAs<T> {
        let Some(mut parent) = self.root else {
            return InsertAs::Root;
        };

        loop {
            unsafe {
                let dir = match (self.cmp)(self.value(parent), value) {
                    Ordering::Greater | Ordering::Equal => Dir::Left,
                    Ordering::Less => Dir::Right,
                };

                match self.links(parent).child(dir) {
                    // Descend.
                    Some(child) => parent = child,

                    None => return InsertAs::Child { parent, dir },
                }
            }
        }
    }

    /// Inserts `value` as a new leaf and returns its node.
    ///
    /// This operation completes in time proportional to the depth of the new leaf.
    pub(crate) fn insert(&mut self, value: T) -> NonNull<Node<T>> {
        let slot = self.vacant_slot(&value);

        // SAFETY: `slot` was just computed for `value`.
        unsafe { self.insert_at(slot, value) }
    }

    /// Returns the node holding the least value strictly greater than `value`.
    pub(crate) fn successor_of(&self, value: &T) -> Link<T> {
        let mut opt_cur = self.root;
        let mut successor = None;

        while let Some(cur) = opt_cur {
            unsafe {
                if (self.cmp)(self.value(cur), value).is_le() {
                    opt_cur = self.links(cur).right();
                } else {
                    successor = Some(cur);
                    opt_cur = self.links(cur).left();
                }
            }
        }

        successor
    }

    /// Returns the node holding the greatest value strictly less than `value`.
    pub(crate) fn predecessor_of(&self, value: &T) -> Link<T> {
        let mut opt_cur = self.root;
        let mut predecessor = None;

        while let Some(cur) = opt_cur {
            unsafe {
                if (self.cmp)(self.value(cur), value).is_ge() {
                    opt_cur = self.links(cur).left();
                } else {
                    predecessor = Some(cur);
                    opt_cur = self.links(cur).right();
                }
            }
        }

        predecessor
    }

    /// Checks every structural invariant, panicking on the first violation.
    ///
    /// Walks the tree in order along parent links, so it needs no stack and handles trees of any
    /// depth. Ordering holds exactly when each value compares `<=` to the next one in order.
    pub(crate) fn assert_invariants(&self) {
        let mut count = 0;
        let mut prev: Link<T> = None;
        let mut opt_cur = self.first();

        if let Some(root) = self.root {
            assert!(
                unsafe { self.links(root).parent() }.is_none(),
                "root parent pointer must not be set"
            );
        }

        while let Some(cur) = opt_cur {
            count += 1;
            assert!(count <= self.len, "more nodes reachable than `len` counts");

            unsafe {
                for dir in [Dir::Left, Dir::Right] {
                    if let Some(child) = self.links(cur).child(dir) {
                        assert_eq!(
                            self.links(child).parent(),
                            Some(cur),
                            "child parent pointer must point at its parent"
                        );
                    }
                }

                match self.links(cur).parent() {
                    Some(parent) => {
                        let links = self.links(parent);
                        assert!(
                            links.left() == Some(cur) || links.right() == Some(cur),
                            "parent must link back to its child"
                        );
                    }
                    None => assert_eq!(Some(cur), self.root, "only the root may lack a parent"),
                }

                if let Some(prev) = prev {
                    assert!(
                        (self.cmp)(self.value(prev), self.value(cur)).is_le(),
                        "values out of order"
                    );
                }

                prev = Some(cur);
                opt_cur = self.next_in_order(cur);
            }
        }

        assert_eq!(count, self.len, "`len` must match the number of reachable nodes");
    }

    // Returns the node following `node` in order, climbing parent links when `node` has no
    // right subtree.
    unsafe fn next_in_order(&self, node: NonNull<Node<T>>) -> Link<T> {
        unsafe {
            if let Some(right) = self.links(node).right() {
                return Some(self.min_in_subtree(right).0);
            }

            let mut child = node;
            loop {
                let parent = self.links(child).parent()?;
                if self.links(parent).left() == Some(child) {
                    return Some(parent);
                }
                child = parent;
            }
        }
    }
}

impl<T, C> Drop for RawTree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Links<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
            }),
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link<T> {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    pub(crate) fn left(&self) -> Link<T> {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link<T> {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().children[dir as usize], child)
    }

    #[inline]
    pub(crate) fn set_left(&mut self, left: Link<T>) -> Link<T> {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    pub(crate) fn set_right(&mut self, right: Link<T>) -> Link<T> {
        self.set_child(Dir::Right, right)
    }
}
