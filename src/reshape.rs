// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Frequency-driven rebalancing.
//!
//! After an access to `key`, walk the same path a lookup takes, top level
//! first, counting traffic as we go:
//!
//! - a node whose successor lies past `key` gets a pass-through hit at the
//!   current level, or a self-hit if it *is* `key`;
//! - a node is **promoted** when its direct predecessor's traffic between
//!   `level` and `level + 1` exceeds `access_counter >> (max_level - 2 - level)`,
//!   taking over the predecessor's forward pointers (and traffic) above;
//! - a node is **demoted** out of its top level when it and its predecessor
//!   together carry at most `access_counter >> (max_level - 1 - level)`. A
//!   demotion at the global floor retracts the floor by one level.
//!
//! The walk stops after the level at which the self-hit lands; lower
//! levels are left alone for this access.
//!
//! ```text
//! before (20 is hot):            after promoting 20 at level 29:
//! 30: HEAD -----------> TAIL     30: HEAD -> 20 ----> TAIL
//! 29: HEAD -> 10 -> 20 -> TAIL   29: HEAD -> 10 -> 20 -> TAIL
//! ```

use crate::list::Level;
use crate::list::SplayList;
use crate::node::HEAD;
use crate::node::Idx;
use crate::node::NULL;
use crate::trace::debug_log;

impl<K: Ord + Clone> SplayList<K> {
    /// Record one access to `key` and reshape the towers along its path.
    pub(crate) fn reshape(&mut self, key: &K) {
        self.access_counter += 1;
        let top = self.max_level;
        self.lock(HEAD).pass_hits[top] += 1;

        let mut pred = HEAD;
        let mut level = top - 1;
        while level >= self.floor {
            if self.reshape_level(key, level, &mut pred) {
                return;
            }
            if level == 0 {
                break;
            }
            level -= 1;
        }
    }

    /// Walk one level. Leaves `pred` at the last node at or before `key`.
    /// Returns whether the self-hit for `key` landed on this level.
    fn reshape_level(&mut self, key: &K, level: Level, pred: &mut Idx) -> bool {
        self.catch_up_to(*pred, level);
        let mut predpred = *pred;
        let mut curr = self.node(*pred).forward[level];
        self.catch_up_to(curr, level);

        if self.node(curr).key > *key {
            self.lock(*pred).pass_hits[level] += 1;
            return false;
        }

        let mut landed = false;
        while self.node(curr).key <= *key {
            self.catch_up_to(curr, level);

            let next = self.node(curr).forward[level];
            if self.node(next).key > *key {
                let mut node = self.lock(curr);
                if node.key == *key {
                    node.self_hits += 1;
                    landed = true;
                } else {
                    node.pass_hits[level] += 1;
                }
            }

            if self.promotion_due(predpred, curr, level, level) {
                self.promote(predpred, curr, level);
                predpred = curr;
                *pred = curr;
                curr = self.node(curr).forward[level];
                continue;
            }

            if self.demotion_due(*pred, curr, level, key) {
                self.demote(*pred, curr, level);
                curr = self.node(*pred).forward[level];
                continue;
            }

            *pred = curr;
            curr = self.node(curr).forward[level];
        }

        return landed;
    }

    /// Share of all accesses a position at `shift` levels below the top is
    /// expected to carry.
    fn level_share(&self, shift: Level) -> i64 {
        return (self.access_counter >> shift) as i64;
    }

    /// Whether `curr`, reached directly from `predpred` at `level`, should
    /// grow from `height` to `height + 1`.
    fn promotion_due(&self, predpred: Idx, curr: Idx, height: Level, level: Level) -> bool {
        let pp = self.node(predpred);
        return height + 1 < self.max_level
            && height < pp.tower_top
            && pp.forward[level] == curr
            && pp.pass_hits[height + 1] - pp.pass_hits[height] > self.level_share(self.max_level - 2 - height);
    }

    /// Raise `curr` while it keeps qualifying, stealing `predpred`'s forward
    /// pointer and the traffic beyond `curr` at each new level.
    fn promote(&mut self, predpred: Idx, curr: Idx, level: Level) {
        assert_eq!(
            self.node(predpred).forward[level],
            curr,
            "INVARIANT VIOLATED: promotion without direct predecessor"
        );

        let mut height = self.node(curr).tower_top;
        while self.promotion_due(predpred, curr, height, level) {
            height += 1;

            let (hits_at, hits_below, next) = {
                let pp = self.node(predpred);
                (pp.pass_hits[height], pp.pass_hits[height - 1], pp.forward[height])
            };
            {
                let mut node = self.lock(curr);
                let self_hits = node.self_hits as i64;
                node.tower_top = height;
                node.pass_hits[height] = hits_at - hits_below - self_hits;
                node.forward[height] = next;
            }
            {
                let mut pp = self.lock(predpred);
                pp.forward[height] = curr;
                pp.pass_hits[height] = hits_below;
            }
            debug_log!(idx = curr, height, "promoted");
        }
    }

    /// Whether `curr` should leave `level`: it tops out here, the walk
    /// continues past it, and it and `pred` together are cold.
    fn demotion_due(&self, pred: Idx, curr: Idx, level: Level, key: &K) -> bool {
        let node = self.node(curr);
        return level > 0
            && node.tower_top == level
            && self.node(node.forward[level]).key <= *key
            && self.traffic(curr, level) + self.traffic(pred, level) <= self.level_share(self.max_level - 1 - level);
    }

    /// Unlink `curr` from `level`, folding its traffic into `pred`.
    fn demote(&mut self, pred: Idx, curr: Idx, level: Level) {
        assert_eq!(
            self.node(curr).tower_top,
            level,
            "INVARIANT VIOLATED: demotion below a node's top level"
        );
        assert_eq!(
            self.node(pred).forward[level],
            curr,
            "INVARIANT VIOLATED: demotion without direct predecessor"
        );

        if level == self.floor {
            self.retract_floor();
        }
        self.catch_up_to(curr, level - 1);
        self.catch_up_to(pred, level - 1);

        let moved = self.traffic(curr, level);
        let next = self.node(curr).forward[level];
        {
            let mut node = self.lock(pred);
            node.pass_hits[level] += moved;
            node.forward[level] = next;
        }
        {
            let mut node = self.lock(curr);
            node.pass_hits[level] = 0;
            node.forward[level] = NULL;
            node.tower_top -= 1;
        }
        debug_log!(idx = curr, level, "demoted");
    }

    /// Lower the global floor by one. The only writer of `floor`.
    fn retract_floor(&mut self) {
        self.floor -= 1;
        debug_log!(floor = self.floor, "floor retracted");
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::list::SplayList;

    fn seeded(max_level: usize) -> SplayList<u32> {
        let config = Config::new().max_level(max_level).update_probability(1.0).seed(11);
        return SplayList::with_config(0, 10_000, config).unwrap();
    }

    #[test]
    fn counts_one_access_per_reshape() {
        let mut list = seeded(16);
        list.insert_if_absent(3).unwrap();
        list.insert_if_absent(4).unwrap();
        assert_eq!(list.access_counter(), 2);
        list.contains(&3);
        assert_eq!(list.access_counter(), 3);
        assert_eq!(list.node(crate::node::HEAD).pass_hits[16], 3);
    }

    #[test]
    fn second_insert_retracts_floor() {
        let mut list = seeded(16);
        list.insert_if_absent(1).unwrap();
        assert_eq!(list.floor_level(), 15);
        list.insert_if_absent(2).unwrap();
        // 1 carried one hit against an access count of two: demoted.
        assert_eq!(list.floor_level(), 14);
        list.check_invariants();
    }

    #[test]
    fn self_hit_lands_only_on_target() {
        let mut list = seeded(16);
        for key in 1..=50 {
            list.insert_if_absent(key).unwrap();
        }
        let before: Vec<_> = list.dump().entries.iter().map(|e| e.self_hits).collect();
        list.contains(&25);
        let after: Vec<_> = list.dump().entries.iter().map(|e| e.self_hits).collect();
        for (i, (b, a)) in before.iter().zip(&after).enumerate() {
            let expected = if i == 24 { b + 1 } else { *b };
            assert_eq!(*a, expected, "key {}", i + 1);
        }
    }

    #[test]
    fn hot_key_grows_a_tower() {
        let mut list = seeded(32);
        for key in 1..=200 {
            list.insert_if_absent((key * 7919) % 10_000).unwrap();
        }
        let hot = (100 * 7919) % 10_000;
        let top_before = list.dump().entries.iter().find(|e| e.key == hot).unwrap().tower_top;
        for _ in 0..2000 {
            list.contains(&hot);
        }
        let top_after = list.dump().entries.iter().find(|e| e.key == hot).unwrap().tower_top;
        assert!(top_after > top_before, "{} -> {}", top_before, top_after);
        list.check_invariants();
    }

    #[test]
    fn floor_stops_at_level_zero() {
        let mut list = seeded(2);
        for key in 1..=300 {
            list.insert_if_absent(key).unwrap();
        }
        for key in 1..=300 {
            list.contains(&key);
        }
        assert_eq!(list.floor_level(), 0);
        list.check_invariants();
    }
}
