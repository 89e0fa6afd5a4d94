// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Arena-resident tower nodes.
//!
//! Every key owns one node. A node participates in the levels
//! `tower_floor..=tower_top`; slots below `tower_floor` are stale until the
//! node catches up with the global floor.
//!
//! ```text
//! level 31: HEAD -------------------------------> TAIL
//! level 30: HEAD ----------> 20 ----------------> TAIL
//! level 29: HEAD -> 10 ----> 20 -> 30 ----------> TAIL
//! ```

use crate::list::Level;

/// Node index into the arena. u32 saves space vs usize on 64-bit.
pub type Idx = u32;

/// Null index marker.
pub const NULL: Idx = Idx::MAX;

/// Reserved slot of the minimum sentinel.
pub const HEAD: Idx = 0;

/// Reserved slot of the maximum sentinel.
pub const TAIL: Idx = 1;

pub(crate) struct Node<K> {
    pub(crate) key: K,
    /// Lowest level whose `forward` and `pass_hits` slots are valid.
    pub(crate) tower_floor: Level,
    /// Highest level this node is linked at.
    pub(crate) tower_top: Level,
    /// Accesses whose target was this node's key.
    pub(crate) self_hits: u64,
    /// Accesses that passed through this node at a level. May go negative
    /// after promotion moves mass into a taller neighbour.
    pub(crate) pass_hits: Box<[i64]>,
    pub(crate) forward: Box<[Idx]>,
    pub(crate) deleted: bool,
    /// `self_hits` credited to the list's deleted mass when tombstoned.
    pub(crate) buried_hits: u64,
}

impl<K> Node<K> {
    /// Allocate a node whose tower is exactly `level`, with slots for
    /// levels `0..=max_level`.
    pub(crate) fn new(key: K, level: Level, max_level: Level) -> Node<K> {
        return Node {
            key,
            tower_floor: level,
            tower_top: level,
            self_hits: 0,
            pass_hits: vec![0; max_level + 1].into_boxed_slice(),
            forward: vec![NULL; max_level + 1].into_boxed_slice(),
            deleted: false,
            buried_hits: 0,
        };
    }

    /// Forward pointer as seen from `level`, reading through levels the
    /// node has not caught up to yet.
    pub(crate) fn forward_at(&self, level: Level) -> Idx {
        return self.forward[level.max(self.tower_floor)];
    }

    /// Pass-through hits at `level`, zero where the slot is not yet valid.
    pub(crate) fn pass_hits_at(&self, level: Level) -> i64 {
        if level < self.tower_floor {
            return 0;
        }
        return self.pass_hits[level];
    }
}
