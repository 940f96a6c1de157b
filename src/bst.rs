use core::cmp::Ordering;

use crate::{NaturalOrder, Order, RawTree, Traverse};

/// An ordered multiset backed by an unbalanced binary search tree.
///
/// Lookups never restructure the tree; its shape depends only on the order in which values were
/// added and deleted. Equal values are kept side by side.
pub struct BinarySearchTree<T, C = NaturalOrder<T>> {
    raw: RawTree<T, C>,
}

impl<T: Ord> BinarySearchTree<T> {
    /// Returns a new empty tree ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T: Ord> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> BinarySearchTree<T, C> {
    /// Returns a new empty tree ordered by `cmp`.
    ///
    /// `cmp` must be a total order over every value ever added; otherwise the shape of the tree,
    /// and therefore the result of every lookup, is unspecified.
    pub const fn with_comparator(cmp: C) -> Self {
        BinarySearchTree {
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

    /// Returns the value at the root.
    pub fn root(&self) -> Option<&T> {
        self.raw.root_value()
    }

    /// Returns the minimum value.
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|node| unsafe { self.raw.value(node) })
    }

    /// Returns the maximum value.
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|node| unsafe { self.raw.value(node) })
    }

    /// Iterates over the values in pre-order.
    pub fn preorder(&self) -> Traverse<'_, T> {
        Traverse::new(&self.raw, Order::Pre)
    }

    /// Iterates over the values in ascending order.
    pub fn inorder(&self) -> Traverse<'_, T> {
        Traverse::new(&self.raw, Order::In)
    }

    /// Iterates over the values in post-order.
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
}

impl<T, C> BinarySearchTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.raw.assert_invariants();
    }

    /// Adds `value` as a new leaf.
    ///
    /// Duplicates are always accepted. This operation completes in time proportional to the depth
    /// of the new leaf.
    pub fn add(&mut self, value: T) {
        self.raw.insert(value);
    }

    /// Removes one value comparing equal to `value` and returns it.
    ///
    /// When several copies are stored, which one is removed is unspecified.
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

    /// Returns `true` if a value comparing equal to `value` is stored.
    pub fn has(&self, value: &T) -> bool {
        self.raw.locate(value).is_some()
    }

    /// Returns the stored value comparing equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.raw
            .locate(value)
            .map(|node| unsafe { self.raw.value(node) })
    }

    /// Returns the least value strictly greater than `value`.
    pub fn successor(&self, value: &T) -> Option<&T> {
        self.raw
            .successor_of(value)
            .map(|node| unsafe { self.raw.value(node) })
    }

    /// Returns the greatest value strictly less than `value`.
    pub fn predecessor(&self, value: &T) -> Option<&T> {
        self.raw
            .predecessor_of(value)
            .map(|node| unsafe { self.raw.value(node) })
    }
}

impl<T, C> Extend<T> for BinarySearchTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for BinarySearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BinarySearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'tree, T, C> IntoIterator for &'tree BinarySearchTree<T, C> {
    type Item = &'tree T;
    type IntoIter = Traverse<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
