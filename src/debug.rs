use alloc::{collections::VecDeque, string::String};
use core::{
    fmt::{self, Write},
    ptr::NonNull,
};

use crate::{BinarySearchTree, Dir, Node, RawTree, SplayTree};

impl<T, C> RawTree<T, C>
where
    T: fmt::Display,
{
    // Nodes are named by their breadth-first position, since values may repeat.
    pub(crate) fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<T> {
            Present(NonNull<Node<T>>, usize),
            Missing(usize),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Present(root, 0));
        let mut next_id = 1;

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut links = String::new();

        loop {
            let remaining = queue.len();
            if remaining == 0 {
                break;
            }

            write!(w, "{{rank=same; ")?;

            for _rank_node in 0..remaining {
                let Some(item) = queue.pop_front() else {
                    break;
                };

                let (node, id) = match item {
                    Item::Present(node, id) => (node, id),
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let value = unsafe { self.value(node) };
                write!(w, "\"graph{name}-{id}\" [label=\"{value}\"]; ")?;

                for dir in [Dir::Left, Dir::Right] {
                    let child_id = next_id;
                    next_id += 1;

                    match unsafe { self.links(node).child(dir) } {
                        Some(child) => {
                            queue.push_back(Item::Present(child, child_id));
                            writeln!(links, "\"graph{name}-{id}\" -> \"graph{name}-{child_id}\";")?;
                        }
                        None => {
                            queue.push_back(Item::Missing(child_id));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{child_id}\";"
                            )?;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

impl<T: fmt::Display, C> BinarySearchTree<T, C> {
    /// Writes the shape of the tree to `w` as a Graphviz digraph named `name`.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.raw().dotgraph(name, w)
    }
}

impl<T: fmt::Display, C> SplayTree<T, C> {
    /// Writes the shape of the tree to `w` as a Graphviz digraph named `name`.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.raw().dotgraph(name, w)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinarySearchTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SplayTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
