// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Scoped exclusive access to one node.
//!
//! All writes to a node's fields go through a [`NodeGuard`]. The list is
//! single-threaded and `&mut` already makes access exclusive, so acquiring
//! and releasing is free; the guard marks where a per-node lock is taken and
//! dropped. Code never holds two guards at once: values needed from a
//! neighbour are read first, then the guard is taken for the write.

use std::ops::Deref;
use std::ops::DerefMut;

use crate::list::Level;
use crate::node::Idx;
use crate::node::Node;
use crate::trace::trace_log;

pub(crate) struct NodeGuard<'a, K> {
    node: &'a mut Node<K>,
    idx: Idx,
}

impl<'a, K> NodeGuard<'a, K> {
    pub(crate) fn acquire(node: &'a mut Node<K>, idx: Idx) -> NodeGuard<'a, K> {
        trace_log!(idx, "lock");
        return NodeGuard { node, idx };
    }

    /// Fold one level into the node if it lags behind `global_floor`.
    /// Returns whether the tower floor moved.
    pub(crate) fn catch_up(&mut self, global_floor: Level) -> bool {
        let floor = self.node.tower_floor;
        if floor <= global_floor {
            return false;
        }
        self.node.pass_hits[floor - 1] = 0;
        self.node.forward[floor - 1] = self.node.forward[floor];
        self.node.tower_floor = floor - 1;
        trace_log!(idx = self.idx, level = floor - 1, "caught up");
        return true;
    }

    /// Catch up until the tower floor is at or below `level`, or until the
    /// node reaches `global_floor`.
    pub(crate) fn catch_up_to(&mut self, level: Level, global_floor: Level) {
        while self.node.tower_floor > level {
            if !self.catch_up(global_floor) {
                break;
            }
        }
    }

    /// Link `new` after this node at `level` if the slot still holds
    /// `expected`. On failure returns the slot's current occupant.
    pub(crate) fn compare_and_link(&mut self, level: Level, expected: Idx, new: Idx) -> Result<(), Idx> {
        let current = self.node.forward[level];
        if current != expected {
            return Err(current);
        }
        self.node.forward[level] = new;
        return Ok(());
    }
}

impl<K> Deref for NodeGuard<'_, K> {
    type Target = Node<K>;

    fn deref(&self) -> &Node<K> {
        return &*self.node;
    }
}

impl<K> DerefMut for NodeGuard<'_, K> {
    fn deref_mut(&mut self) -> &mut Node<K> {
        return &mut *self.node;
    }
}

impl<K> Drop for NodeGuard<'_, K> {
    fn drop(&mut self) {
        trace_log!(idx = self.idx, "unlock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NULL;
    use crate::node::TAIL;

    #[test]
    fn catch_up_folds_one_level() {
        let mut node = Node::new(1u32, 6, 8);
        node.forward[6] = TAIL;
        node.pass_hits[5] = 99;
        let mut guard = NodeGuard::acquire(&mut node, 2);
        assert!(guard.catch_up(3));
        assert_eq!(guard.tower_floor, 5);
        assert_eq!(guard.forward[5], TAIL);
        assert_eq!(guard.pass_hits[5], 0);
    }

    #[test]
    fn catch_up_is_noop_at_global_floor() {
        let mut node = Node::new(1u32, 3, 8);
        let mut guard = NodeGuard::acquire(&mut node, 2);
        assert!(!guard.catch_up(3));
        assert_eq!(guard.tower_floor, 3);
    }

    #[test]
    fn catch_up_to_stops_at_requested_level() {
        let mut node = Node::new(1u32, 7, 8);
        node.forward[7] = TAIL;
        let mut guard = NodeGuard::acquire(&mut node, 2);
        guard.catch_up_to(4, 0);
        assert_eq!(guard.tower_floor, 4);
        assert!(guard.forward[4..=7].iter().all(|&f| f == TAIL));
        assert_eq!(guard.forward[3], NULL);
    }

    #[test]
    fn catch_up_to_never_passes_global_floor() {
        let mut node = Node::new(1u32, 7, 8);
        let mut guard = NodeGuard::acquire(&mut node, 2);
        guard.catch_up_to(1, 5);
        assert_eq!(guard.tower_floor, 5);
    }

    #[test]
    fn compare_and_link_detects_stale_successor() {
        let mut node = Node::new(1u32, 3, 8);
        node.forward[3] = TAIL;
        let mut guard = NodeGuard::acquire(&mut node, 2);
        assert_eq!(guard.compare_and_link(3, 5, 6), Err(TAIL));
        assert_eq!(guard.compare_and_link(3, TAIL, 6), Ok(()));
        assert_eq!(guard.forward[3], 6);
    }
}
