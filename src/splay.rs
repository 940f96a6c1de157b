use core::{cmp::Ordering, ptr::NonNull};

use crate::{Link, NaturalOrder, Node, Order, RawTree, Traverse};

impl<T, C> RawTree<T, C> {
    // Performs one splay step, moving `node` up by one level (zig) or two levels (zig-zig and
    // zig-zag).
    //
    // Returns `false` if `node` is already the root.
    //
    // # Safety
    //
    // `node` must belong to `self`.
    pub(crate) unsafe fn splay_step(&mut self, node: NonNull<Node<T>>) -> bool {
        unsafe {
            let Some(parent) = self.links(node).parent() else {
                return false;
            };

            let side = self.which_child(parent, node);

            match self.links(parent).parent() {
                // Zig: `p(x)` is the root.
                None => self.promote(parent, side),

                // Zig-zig: `x` and `p(x)` hang on the same side. `p(x)` rises first.
                Some(grandparent) if self.which_child(grandparent, parent) == side => {
                    self.promote(grandparent, side);
                    self.promote(parent, side);
                }

                // Zig-zag: `x` is an inner grandchild. After the first rotation `x` hangs on the
                // other side of `g(x)`.
                Some(grandparent) => {
                    self.promote(parent, side);
                    self.promote(grandparent, !side);
                }
            }

            true
        }
    }

    /// Splays `node` to the root.
    ///
    /// A single splay costs _O(depth)_ rotations; over a sequence of operations the cost is
    /// amortized _O(log(n))_ each.
    ///
    /// # Safety
    ///
    /// `node` must belong to `self`.
    pub(crate) unsafe fn splay(&mut self, node: NonNull<Node<T>>) {
        while unsafe { self.splay_step(node) } {}

        debug_assert_eq!(self.root(), Some(node));
    }
}

/// An ordered multiset that splays every node it touches to the root.
///
/// Lookups take `&mut self` because they restructure the tree. Values compare with the
/// comparator fixed at construction; equal values are kept side by side.
///
/// ```
/// use splay_bst::SplayTree;
///
/// let mut tree = SplayTree::new();
/// tree.extend([5, 6, 4, 3, 8, 2, 1, 7, 0, 9]);
///
/// assert!(tree.has(&2));
/// assert_eq!(tree.root(), Some(&2));
///
/// assert_eq!(tree.successor(&4), Some(&5));
/// assert_eq!(tree.root(), Some(&5));
/// ```
pub struct SplayTree<T, C = NaturalOrder<T>> {
    raw: RawTree<T, C>,
}

impl<T: Ord> SplayTree<T> {
    /// Returns a new empty tree ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T: Ord> Default for SplayTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> SplayTree<T, C> {
    /// Returns a new empty tree ordered by `cmp`.
    ///
    /// `cmp` must be a total order over every value ever added; otherwise the shape of the tree,
    /// and therefore the result of every lookup, is unspecified.
    pub const fn with_comparator(cmp: C) -> Self {
        SplayTree {
            raw: RawTree::new(cmp),
        }
    }

    /// Returns the number of values in the tree, duplicates included.
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the value at the root, which is the most recently accessed one unless it has been
    /// deleted since.
    pub fn root(&self) -> Option<&T> {
        self.raw.root_value()
    }

    /// Iterates over the values in pre-order. Does not splay.
    pub fn preorder(&self) -> Traverse<'_, T> {
        Traverse::new(&self.raw, Order::Pre)
    }

    /// Iterates over the values in ascending order. Does not splay.
    pub fn inorder(&self) -> Traverse<'_, T> {
        Traverse::new(&self.raw, Order::In)
    }

    /// Iterates over the values in post-order. Does not splay.
    pub fn postorder(&self) -> Traverse<'_, T> {
        Traverse::new(&self.raw, Order::Post)
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Traverse<'_, T> {
        self.inorder()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub(crate) fn raw(&self) -> &RawTree<T, C> {
        &self.raw
    }

    // Splays `node`, if any, and returns its value.
    fn access(&mut self, node: Link<T>) -> Option<&T> {
        let node = node?;

        unsafe {
            self.raw.splay(node);
            Some(self.raw.value(node))
        }
    }
}

impl<T, C> SplayTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.raw.assert_invariants();
    }

    /// Adds `value` and splays it to the root.
    ///
    /// Duplicates are always accepted.
    pub fn add(&mut self, value: T) {
        let node = self.raw.insert(value);

        // SAFETY: `node` was just linked into `self.raw`.
        unsafe { self.raw.splay(node) };
    }

    /// Removes one value comparing equal to `value` and returns it.
    ///
    /// When several copies are stored, which one is removed is unspecified. Deletion does not
    /// splay.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let node = self.raw.locate(value)?;

        // SAFETY: `locate` only returns nodes of `self.raw`.
        Some(unsafe { self.raw.splice_out(node) })
    }

    /// Deletes one copy of each of `values`, in order, and returns how many were found.
    ///
    /// Equivalent to calling [`delete`](Self::delete) once per item; the removed values are
    /// dropped. Repeating an item removes another copy.
    pub fn delete_all<'a, I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        values
            .into_iter()
            .filter_map(|value| self.delete(value))
            .count()
    }

    /// Returns `true` if a value comparing equal to `value` is stored, splaying it to the root.
    pub fn has(&mut self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns the stored value comparing equal to `value`, splaying it to the root.
    pub fn get(&mut self, value: &T) -> Option<&T> {
        let node = self.raw.locate(value);
        self.access(node)
    }

    /// Returns the least value strictly greater than `value`, splaying it to the root.
    pub fn successor(&mut self, value: &T) -> Option<&T> {
        let node = self.raw.successor_of(value);
        self.access(node)
    }

    /// Returns the greatest value strictly less than `value`, splaying it to the root.
    pub fn predecessor(&mut self, value: &T) -> Option<&T> {
        let node = self.raw.predecessor_of(value);
        self.access(node)
    }

    /// Returns the minimum value, splaying it to the root.
    pub fn first(&mut self) -> Option<&T> {
        let node = self.raw.first();
        self.access(node)
    }

    /// Returns the maximum value, splaying it to the root.
    pub fn last(&mut self) -> Option<&T> {
        let node = self.raw.last();
        self.access(node)
    }
}

impl<T, C> Extend<T> for SplayTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SplayTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = SplayTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'tree, T, C> IntoIterator for &'tree SplayTree<T, C> {
    type Item = &'tree T;
    type IntoIter = Traverse<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
