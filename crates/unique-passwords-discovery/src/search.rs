//! Breadth-first nearest-element search.
//!
//! Distance is counted over parent, child and sibling edges, each of weight
//! one. Neighbours are enqueued children first, then the previous sibling,
//! then the next sibling, then the parent, so ties resolve downward before
//! sideways before outward.
//!
//! Every queued element carries the directions it must not expand into
//! (the way the search came from). That keeps each element on at most one
//! path, so the search visits each reachable element at most once and
//! terminates on any finite tree.

use std::collections::VecDeque;

use crate::tree::ElementTree;

/// Knobs for [`find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Whether an unrendered element may itself be returned.
    ///
    /// Unrendered elements are never expanded into their children either
    /// way. With `false` they are skipped entirely: neither tested nor
    /// expanded sideways or outward.
    pub match_hidden_nodes: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            match_hidden_nodes: true,
        }
    }
}

/// Directions a queued element must not expand into.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
struct Skip {
    children: bool,
    previous: bool,
    next: bool,
    parent: bool,
}

impl Skip {
    /// Seed: the start element's own subtree is not searched.
    const START: Self = Self {
        children: true,
        previous: false,
        next: false,
        parent: false,
    };

    /// Reached from the parent: only go further down.
    const CHILD: Self = Self {
        children: false,
        previous: true,
        next: true,
        parent: true,
    };

    /// Reached from the next sibling: keep going backward and down.
    const PREVIOUS: Self = Self {
        children: false,
        previous: false,
        next: true,
        parent: true,
    };

    /// Reached from the previous sibling: keep going forward and down.
    const NEXT: Self = Self {
        children: false,
        previous: true,
        next: false,
        parent: true,
    };

    /// Reached from a child: go sideways and up, never back down.
    const PARENT: Self = Self {
        children: true,
        previous: false,
        next: false,
        parent: false,
    };
}

/// Return the element nearest to `start` (by breadth-first order) that
/// satisfies `predicate`, or `None`.
///
/// `start` itself is tested first; its own children are never searched.
pub fn find_nearest<T, P>(
    tree: &T,
    start: T::Element,
    mut predicate: P,
    options: SearchOptions,
) -> Option<T::Element>
where
    T: ElementTree,
    P: FnMut(&T, T::Element) -> bool,
{
    let mut queue = VecDeque::from([(start, Skip::START)]);
    let mut visited: usize = 0;

    while let Some((element, skip)) = queue.pop_front() {
        visited = visited.saturating_add(1);
        let rendered = tree.is_rendered(element);
        if !rendered && !options.match_hidden_nodes {
            continue;
        }

        if predicate(tree, element) {
            tracing::trace!(visited, "nearest element found");
            return Some(element);
        }

        if !skip.children && rendered {
            let mut child = tree.first_child(element);
            while let Some(c) = child {
                queue.push_back((c, Skip::CHILD));
                child = tree.next_sibling(c);
            }
        }
        if !skip.previous {
            if let Some(previous) = tree.previous_sibling(element) {
                queue.push_back((previous, Skip::PREVIOUS));
            }
        }
        if !skip.next {
            if let Some(next) = tree.next_sibling(element) {
                queue.push_back((next, Skip::NEXT));
            }
        }
        if !skip.parent {
            if let Some(parent) = tree.parent(element) {
                queue.push_back((parent, Skip::PARENT));
            }
        }
    }

    tracing::trace!(visited, "no matching element");
    None
}
