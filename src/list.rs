// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! The splay list container.
//!
//! Owns the node arena, the two sentinels, the global floor level and the
//! access counter. Every public operation locates the key first and then,
//! always for inserts and with probability `p` for lookups and removals,
//! reshapes the path to that key (see `reshape.rs`).
//!
//! # Levels
//!
//! Levels count downward from `max_level - 1`. A fresh list is a single
//! linked list at level `max_level - 1`; demotions push the global floor
//! down as the list grows, and promotions lift hot keys back up.
//!
//! # Deletion
//!
//! Removal is logical. A removed key stays linked as a tombstone and keeps
//! its tower; re-inserting it revives the node in place.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::guard::NodeGuard;
use crate::node::HEAD;
use crate::node::Idx;
use crate::node::NULL;
use crate::node::Node;
use crate::node::TAIL;
use crate::trace::debug_log;

/// Level number. Level `max_level - 1` is the top of every descent.
pub type Level = usize;

/// An ordered set whose tower heights follow observed access frequency.
pub struct SplayList<K> {
    /// Arena of nodes. Slots `HEAD` and `TAIL` hold the sentinels.
    pub(crate) nodes: Vec<Node<K>>,
    pub(crate) max_level: Level,
    /// Lowest level with distinct per-node structure. Never increases.
    pub(crate) floor: Level,
    /// Number of reshapes performed so far.
    pub(crate) access_counter: u64,
    /// Number of live (non-tombstoned) keys.
    pub(crate) len: usize,
    /// Sum of `self_hits` of tombstoned nodes at removal time.
    pub(crate) deleted_hit_mass: u64,
    update_probability: f64,
    rng: StdRng,
}

/// Result of a descent: the tightest bracketing pair for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    pub(crate) pred: Idx,
    pub(crate) succ: Idx,
    pub(crate) found: bool,
}

impl<K: Ord + Clone> SplayList<K> {
    /// Create an empty list bounded by `min` and `max` with default config.
    /// Every key later inserted must lie strictly between the bounds.
    pub fn new(min: K, max: K) -> Result<SplayList<K>> {
        return SplayList::with_config(min, max, Config::default());
    }

    pub fn with_config(min: K, max: K, config: Config) -> Result<SplayList<K>> {
        config.validate()?;
        if min >= max {
            return Err(Error::InvalidBounds);
        }

        let max_level = config.max_level;
        let floor = max_level - 1;
        let mut head = Node::new(min, floor, max_level);
        let mut tail = Node::new(max, floor, max_level);
        head.tower_top = max_level;
        tail.tower_top = max_level;
        for level in floor..=max_level {
            head.forward[level] = TAIL;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        return Ok(SplayList {
            nodes: vec![head, tail],
            max_level,
            floor,
            access_counter: 0,
            len: 0,
            deleted_hit_mass: 0,
            update_probability: config.update_probability,
            rng,
        });
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Current global floor level.
    pub fn floor_level(&self) -> Level {
        return self.floor;
    }

    pub fn max_level(&self) -> Level {
        return self.max_level;
    }

    /// Number of reshapes performed. The time base for promotion and
    /// demotion thresholds.
    pub fn access_counter(&self) -> u64 {
        return self.access_counter;
    }

    /// Accumulated self-hits of tombstoned keys.
    pub fn deleted_hit_mass(&self) -> u64 {
        return self.deleted_hit_mass;
    }

    // --- Node access helpers ---

    pub(crate) fn node(&self, idx: Idx) -> &Node<K> {
        return &self.nodes[idx as usize];
    }

    /// Take exclusive access to one node for writing.
    pub(crate) fn lock(&mut self, idx: Idx) -> NodeGuard<'_, K> {
        return NodeGuard::acquire(&mut self.nodes[idx as usize], idx);
    }

    fn alloc_node(&mut self, key: K, level: Level) -> Idx {
        let idx = self.nodes.len() as Idx;
        self.nodes.push(Node::new(key, level, self.max_level));
        return idx;
    }

    /// Bring `idx` down to `level` (bounded by the global floor). No-op on
    /// `NULL`.
    pub(crate) fn catch_up_to(&mut self, idx: Idx, level: Level) {
        if idx == NULL {
            return;
        }
        let floor = self.floor;
        self.lock(idx).catch_up_to(level, floor);
    }

    /// Traffic attributable to a node at or below `level`.
    pub(crate) fn traffic(&self, idx: Idx, level: Level) -> i64 {
        let node = self.node(idx);
        let self_hits = node.self_hits as i64;
        if node.tower_floor > level {
            return self_hits;
        }
        return self_hits + node.pass_hits[level];
    }

    fn in_bounds(&self, key: &K) -> bool {
        return *key > self.node(HEAD).key && *key < self.node(TAIL).key;
    }

    fn flip_update_coin(&mut self) -> bool {
        return self.rng.gen_bool(self.update_probability);
    }

    // --- Core operations ---

    /// Descend from the top level to the floor, catching up every node
    /// before reading its forward pointer. Stops at the first level where
    /// the key is seen.
    pub(crate) fn locate(&mut self, key: &K) -> Located {
        let mut pred = HEAD;
        let mut succ = NULL;

        for level in (self.floor..self.max_level).rev() {
            self.catch_up_to(pred, level);
            succ = self.node(pred).forward[level];
            self.catch_up_to(succ, level);

            while succ != NULL && *key > self.node(succ).key {
                pred = succ;
                succ = self.node(pred).forward[level];
                self.catch_up_to(succ, level);
            }

            if succ != NULL && *key == self.node(succ).key {
                return Located { pred, succ, found: true };
            }
        }

        return Located { pred, succ, found: false };
    }

    /// Insert `key` unless it is already live. A tombstoned key is revived.
    /// Returns whether the key was absent.
    pub fn insert_if_absent(&mut self, key: K) -> Result<bool> {
        if !self.in_bounds(&key) {
            return Err(Error::KeyOutOfBounds);
        }

        loop {
            let located = self.locate(&key);
            if located.found {
                if !self.node(located.succ).deleted {
                    return Ok(false);
                }
                self.revive(located.succ);
                self.reshape(&key);
                return Ok(true);
            }

            let level = self.node(located.pred).tower_floor;
            let idx = self.alloc_node(key.clone(), level);
            self.lock(idx).forward[level] = located.succ;

            let linked = self.lock(located.pred).compare_and_link(level, located.succ, idx);
            match linked {
                Ok(()) => {
                    self.len += 1;
                    self.reshape(&key);
                    return Ok(true);
                }
                Err(_current) => {
                    debug_log!(pred = located.pred, expected = located.succ, current = _current, "insert lost splice, retrying");
                    self.nodes.pop();
                }
            }
        }
    }

    /// Membership test. Tombstoned keys read as absent.
    pub fn contains(&mut self, key: &K) -> bool {
        if !self.in_bounds(key) {
            return false;
        }
        let located = self.locate(key);
        if !located.found {
            return false;
        }
        if self.flip_update_coin() {
            self.reshape(key);
        }
        return !self.node(located.succ).deleted;
    }

    /// Tombstone `key` if it is live. Returns whether anything changed.
    pub fn remove_if_present(&mut self, key: &K) -> bool {
        if !self.in_bounds(key) {
            return false;
        }
        let located = self.locate(key);
        if !located.found || self.node(located.succ).deleted {
            return false;
        }
        if self.flip_update_coin() {
            self.reshape(key);
        }

        let buried = {
            let mut node = self.lock(located.succ);
            node.deleted = true;
            node.buried_hits = node.self_hits;
            node.self_hits
        };
        self.len -= 1;
        self.deleted_hit_mass += buried;
        debug_log!(idx = located.succ, buried, "tombstoned");
        // TODO: rebuild into a fresh list once deleted_hit_mass exceeds half of all hits.
        return true;
    }

    fn revive(&mut self, idx: Idx) {
        let buried = {
            let mut node = self.lock(idx);
            node.deleted = false;
            std::mem::take(&mut node.buried_hits)
        };
        self.len += 1;
        self.deleted_hit_mass -= buried;
        debug_log!(idx, buried, "revived");
    }

    /// Number of node visits a lookup of `key` would make right now.
    /// Read-only: lagging floors are read through, not caught up.
    pub fn search_cost(&self, key: &K) -> usize {
        let mut cost = 0usize;
        let mut pred = HEAD;

        for level in (self.floor..self.max_level).rev() {
            let mut succ = self.node(pred).forward_at(level);
            cost += 1;
            while succ != NULL && *key > self.node(succ).key {
                pred = succ;
                succ = self.node(pred).forward_at(level);
                cost += 1;
            }
            if succ != NULL && *key == self.node(succ).key {
                return cost;
            }
        }

        return cost;
    }

    /// Iterate live keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K> {
        return Keys {
            list: self,
            current: self.node(HEAD).forward_at(self.floor),
        };
    }

    // --- Invariant checking ---

    /// Panic if the structure is inconsistent: chains out of order, a node
    /// missing from (or present in) a level outside its tower, counters out
    /// of sync with the tombstones.
    pub fn check_invariants(&self) {
        let bound = self.nodes.len() + 1;

        for (i, node) in self.nodes.iter().enumerate() {
            assert!(
                node.tower_floor >= self.floor,
                "INVARIANT VIOLATED: node {} floor {} below global floor {}",
                i, node.tower_floor, self.floor
            );
            assert!(
                node.tower_top >= node.tower_floor,
                "INVARIANT VIOLATED: node {} top {} below its floor {}",
                i, node.tower_top, node.tower_floor
            );
        }
        assert_eq!(self.node(HEAD).tower_top, self.max_level, "INVARIANT VIOLATED: head tower shrank");
        assert_eq!(self.node(TAIL).tower_top, self.max_level, "INVARIANT VIOLATED: tail tower shrank");

        for level in self.floor..=self.max_level {
            let mut chain = Vec::new();
            let mut idx = HEAD;
            while idx != NULL {
                assert!(chain.len() <= bound, "INVARIANT VIOLATED: cycle at level {}", level);
                chain.push(idx);
                idx = self.node(idx).forward_at(level);
            }
            assert_eq!(chain.last(), Some(&TAIL), "INVARIANT VIOLATED: level {} does not end at tail", level);
            for &idx in &chain {
                assert!(
                    self.node(idx).tower_top >= level,
                    "INVARIANT VIOLATED: node {} linked at level {} above its top {}",
                    idx, level, self.node(idx).tower_top
                );
            }
            for pair in chain.windows(2) {
                assert!(
                    self.node(pair[0]).key < self.node(pair[1]).key,
                    "INVARIANT VIOLATED: level {} out of order at nodes {} -> {}",
                    level, pair[0], pair[1]
                );
            }

            let expected = self.bottom_chain().into_iter().filter(|&i| self.node(i).tower_top >= level).count();
            assert_eq!(
                chain.len(),
                expected,
                "INVARIANT VIOLATED: level {} links {} nodes, {} towers reach it",
                level,
                chain.len(),
                expected
            );
        }

        let bottom = self.bottom_chain();
        assert_eq!(bottom.len(), self.nodes.len(), "INVARIANT VIOLATED: unreachable nodes in arena");
        let live = bottom.iter().filter(|&&i| i != HEAD && i != TAIL && !self.node(i).deleted).count();
        assert_eq!(live, self.len, "INVARIANT VIOLATED: {} live nodes but len()={}", live, self.len);
        let buried: u64 = bottom.iter().map(|&i| self.node(i)).filter(|n| n.deleted).map(|n| n.buried_hits).sum();
        assert_eq!(
            buried, self.deleted_hit_mass,
            "INVARIANT VIOLATED: tombstones hold {} hits but deleted_hit_mass={}",
            buried, self.deleted_hit_mass
        );
    }

    /// Every node reachable at the global floor, sentinels included.
    fn bottom_chain(&self) -> Vec<Idx> {
        let mut chain = Vec::with_capacity(self.nodes.len());
        let mut idx = HEAD;
        while idx != NULL && chain.len() <= self.nodes.len() {
            chain.push(idx);
            idx = self.node(idx).forward_at(self.floor);
        }
        return chain;
    }
}

/// Ascending iterator over live keys. See [`SplayList::keys`].
pub struct Keys<'a, K> {
    list: &'a SplayList<K>,
    current: Idx,
}

impl<'a, K: Ord + Clone> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current != TAIL && self.current != NULL {
            let node = self.list.node(self.current);
            self.current = node.forward_at(self.list.floor);
            if !node.deleted {
                return Some(&node.key);
            }
        }
        return None;
    }
}
