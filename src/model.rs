//! Model-based equivalence checks shared by the proptest suite and the fuzz targets.
//!
//! Both trees are driven with the same operations as a sorted `Vec` holding the same multiset.
//! After every operation the tree must agree with the model, satisfy its structural invariants,
//! and (for [`SplayTree`]) hold the value just touched at its root.

use std::prelude::v1::*;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{BinarySearchTree, Order, SplayTree};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    // A narrow range so that duplicates are common.
    fn random_strategy()(
        random in 0u32..64,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Add(ItemValue),
    Delete(ItemValue),
    Has(ItemValue),
    Get(ItemValue),
    Successor(ItemValue),
    Predecessor(ItemValue),
    First,
    Last,
    Clear,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Add(item) => FinalOp::Add(get_value(sorted, item)),
            Op::Delete(item) => FinalOp::Delete(get_value(sorted, item)),
            Op::Has(item) => FinalOp::Has(get_value(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_value(sorted, item)),
            Op::Successor(item) => FinalOp::Successor(get_value(sorted, item)),
            Op::Predecessor(item) => FinalOp::Predecessor(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
            Op::Clear => FinalOp::Clear,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Add(u32),
    Delete(u32),
    Has(u32),
    Get(u32),
    Successor(u32),
    Predecessor(u32),
    First,
    Last,
    Clear,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        8 => value_strategy().prop_map(Op::Add),
        5 => value_strategy().prop_map(Op::Delete),
        3 => value_strategy().prop_map(Op::Has),
        2 => value_strategy().prop_map(Op::Get),
        3 => value_strategy().prop_map(Op::Successor),
        3 => value_strategy().prop_map(Op::Predecessor),
        1 => Just(Op::First),
        1 => Just(Op::Last),
        1 => Just(Op::Clear),
    ]
}

// The operations both trees answer, normalized to `&mut self` so one runner drives either.
trait Subject {
    const SPLAYS: bool;

    fn add(&mut self, value: u32);
    fn delete(&mut self, value: u32) -> Option<u32>;
    fn has(&mut self, value: u32) -> bool;
    fn get(&mut self, value: u32) -> Option<u32>;
    fn successor(&mut self, value: u32) -> Option<u32>;
    fn predecessor(&mut self, value: u32) -> Option<u32>;
    fn first(&mut self) -> Option<u32>;
    fn last(&mut self) -> Option<u32>;
    fn clear(&mut self);

    fn len(&self) -> usize;
    fn root(&self) -> Option<u32>;
    fn traversal(&self, order: Order) -> Vec<u32>;
    fn assert_invariants(&self);
}

macro_rules! traversal {
    ($tree:expr, $order:expr) => {
        match $order {
            Order::Pre => $tree.preorder().copied().collect(),
            Order::In => $tree.inorder().copied().collect(),
            Order::Post => $tree.postorder().copied().collect(),
        }
    };
}

impl Subject for BinarySearchTree<u32> {
    const SPLAYS: bool = false;

    fn add(&mut self, value: u32) {
        BinarySearchTree::add(self, value)
    }

    fn delete(&mut self, value: u32) -> Option<u32> {
        BinarySearchTree::delete(self, &value)
    }

    fn has(&mut self, value: u32) -> bool {
        BinarySearchTree::has(self, &value)
    }

    fn get(&mut self, value: u32) -> Option<u32> {
        BinarySearchTree::get(self, &value).copied()
    }

    fn successor(&mut self, value: u32) -> Option<u32> {
        BinarySearchTree::successor(self, &value).copied()
    }

    fn predecessor(&mut self, value: u32) -> Option<u32> {
        BinarySearchTree::predecessor(self, &value).copied()
    }

    fn first(&mut self) -> Option<u32> {
        BinarySearchTree::first(self).copied()
    }

    fn last(&mut self) -> Option<u32> {
        BinarySearchTree::last(self).copied()
    }

    fn clear(&mut self) {
        BinarySearchTree::clear(self)
    }

    fn len(&self) -> usize {
        BinarySearchTree::len(self)
    }

    fn root(&self) -> Option<u32> {
        BinarySearchTree::root(self).copied()
    }

    fn traversal(&self, order: Order) -> Vec<u32> {
        traversal!(self, order)
    }

    fn assert_invariants(&self) {
        BinarySearchTree::assert_invariants(self)
    }
}

impl Subject for SplayTree<u32> {
    const SPLAYS: bool = true;

    fn add(&mut self, value: u32) {
        SplayTree::add(self, value)
    }

    fn delete(&mut self, value: u32) -> Option<u32> {
        SplayTree::delete(self, &value)
    }

    fn has(&mut self, value: u32) -> bool {
        SplayTree::has(self, &value)
    }

    fn get(&mut self, value: u32) -> Option<u32> {
        SplayTree::get(self, &value).copied()
    }

    fn successor(&mut self, value: u32) -> Option<u32> {
        SplayTree::successor(self, &value).copied()
    }

    fn predecessor(&mut self, value: u32) -> Option<u32> {
        SplayTree::predecessor(self, &value).copied()
    }

    fn first(&mut self) -> Option<u32> {
        SplayTree::first(self).copied()
    }

    fn last(&mut self) -> Option<u32> {
        SplayTree::last(self).copied()
    }

    fn clear(&mut self) {
        SplayTree::clear(self)
    }

    fn len(&self) -> usize {
        SplayTree::len(self)
    }

    fn root(&self) -> Option<u32> {
        SplayTree::root(self).copied()
    }

    fn traversal(&self, order: Order) -> Vec<u32> {
        traversal!(self, order)
    }

    fn assert_invariants(&self) {
        SplayTree::assert_invariants(self)
    }
}

pub fn run_bst_equivalence(ops: Vec<Op>) {
    run_equivalence(BinarySearchTree::<u32>::new(), ops);
}

pub fn run_splay_equivalence(ops: Vec<Op>) {
    run_equivalence(SplayTree::<u32>::new(), ops);
}

fn run_equivalence<S: Subject>(mut tree: S, ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        let idx = v.partition_point(|&x| x < value);
        v.insert(idx, value);
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) -> Option<u32> {
        let idx = v.binary_search(&value).ok()?;
        Some(v.remove(idx))
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        // The value a lookup answered with, which a splaying tree must now hold at its root.
        let touched = match final_op {
            FinalOp::Add(value) => {
                insert_sorted(&mut sorted_values, value);
                tree.add(value);

                Some(value)
            }

            FinalOp::Delete(value) => {
                let from_model = remove_sorted(&mut sorted_values, value);
                let from_tree = tree.delete(value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                None
            }

            FinalOp::Has(value) => {
                let from_model = sorted_values.binary_search(&value).is_ok();
                let from_tree = tree.has(value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree.then_some(value)
            }

            FinalOp::Get(value) => {
                let from_model = sorted_values.binary_search(&value).ok().map(|_| value);
                let from_tree = tree.get(value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree
            }

            FinalOp::Successor(value) => {
                let idx = sorted_values.partition_point(|&x| x <= value);
                let from_model = sorted_values.get(idx).copied();
                let from_tree = tree.successor(value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree
            }

            FinalOp::Predecessor(value) => {
                let idx = sorted_values.partition_point(|&x| x < value);
                let from_model = idx.checked_sub(1).map(|i| sorted_values[i]);
                let from_tree = tree.predecessor(value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree
            }

            FinalOp::First => {
                let from_model = sorted_values.first().copied();
                let from_tree = tree.first();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree
            }

            FinalOp::Last => {
                let from_model = sorted_values.last().copied();
                let from_tree = tree.last();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                from_tree
            }

            FinalOp::Clear => {
                sorted_values.clear();
                tree.clear();

                None
            }
        };

        if S::SPLAYS {
            if let Some(value) = touched {
                assert_eq!(
                    tree.root(),
                    Some(value),
                    "FinalOp #{op_id}: {final_op:?} did not splay"
                );
            }
        }

        tree.assert_invariants();
        assert_eq!(sorted_values.len(), tree.len());
        assert_eq!(tree.traversal(Order::In), sorted_values);

        for order in [Order::Pre, Order::Post] {
            let mut values = tree.traversal(order);
            values.sort_unstable();
            assert_eq!(values, sorted_values, "{order:?} lost or invented values");
        }
    }
}
