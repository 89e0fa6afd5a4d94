// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Read-only diagnostic snapshot of a list.

use std::fmt;

use smallvec::SmallVec;

use crate::list::Level;
use crate::list::SplayList;
use crate::node::HEAD;
use crate::node::NULL;
use crate::node::TAIL;

/// One node of a [`Dump`], tombstones included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry<K> {
    pub key: K,
    pub self_hits: u64,
    pub tower_top: Level,
    pub deleted: bool,
    /// Pass-through hits for each level from the global floor up to
    /// `tower_top`, as `(level, hits)`.
    pub traffic: SmallVec<[(Level, i64); 8]>,
}

/// Snapshot of every non-sentinel node in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump<K> {
    pub floor_level: Level,
    pub max_level: Level,
    pub entries: Vec<DumpEntry<K>>,
}

impl<K: Ord + Clone> SplayList<K> {
    /// Snapshot keys, hit counters and tower heights without touching
    /// the structure.
    pub fn dump(&self) -> Dump<K> {
        let mut entries = Vec::with_capacity(self.nodes.len().saturating_sub(2));
        let mut idx = self.node(HEAD).forward_at(self.floor);

        while idx != TAIL && idx != NULL {
            let node = self.node(idx);
            let traffic = (self.floor..=node.tower_top)
                .map(|level| (level, node.pass_hits_at(level)))
                .collect();
            entries.push(DumpEntry {
                key: node.key.clone(),
                self_hits: node.self_hits,
                tower_top: node.tower_top,
                deleted: node.deleted,
                traffic,
            });
            idx = node.forward_at(self.floor);
        }

        return Dump {
            floor_level: self.floor,
            max_level: self.max_level,
            entries,
        };
    }
}

impl<K> Dump<K> {
    pub fn get(&self, key: &K) -> Option<&DumpEntry<K>>
    where
        K: Ord,
    {
        return self
            .entries
            .binary_search_by(|entry| entry.key.cmp(key))
            .ok()
            .map(|i| &self.entries[i]);
    }
}

/// One line per node: `key : self_hits : hits[floor] , ... , hits[top]`.
impl<K: fmt::Display> fmt::Display for Dump<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "floor level {} of {}", self.floor_level, self.max_level)?;
        for entry in &self.entries {
            write!(f, "{} : {} :", entry.key, entry.self_hits)?;
            for (i, (_, hits)) in entry.traffic.iter().enumerate() {
                if i > 0 {
                    write!(f, " ,")?;
                }
                write!(f, " {}", hits)?;
            }
            if entry.deleted {
                write!(f, " (deleted)")?;
            }
            writeln!(f)?;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::list::SplayList;

    fn list_with(keys: &[u32]) -> SplayList<u32> {
        let config = Config::new().max_level(8).update_probability(1.0).seed(3);
        let mut list = SplayList::with_config(0, 100, config).unwrap();
        for &key in keys {
            list.insert_if_absent(key).unwrap();
        }
        return list;
    }

    #[test]
    fn empty_dump() {
        let list = list_with(&[]);
        let dump = list.dump();
        assert!(dump.entries.is_empty());
        assert_eq!(dump.floor_level, 7);
        assert_eq!(dump.to_string(), "floor level 7 of 8\n");
    }

    #[test]
    fn dump_is_sorted_and_includes_tombstones() {
        let mut list = list_with(&[30, 10, 20]);
        list.remove_if_present(&20);
        let dump = list.dump();
        let keys: Vec<_> = dump.entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![10, 20, 30]);
        assert!(dump.get(&20).unwrap().deleted);
        assert!(!dump.get(&10).unwrap().deleted);
        assert_eq!(dump.get(&25), None);
    }

    #[test]
    fn traffic_spans_floor_to_top() {
        let list = list_with(&[10, 20, 30, 40, 50]);
        let dump = list.dump();
        for entry in &dump.entries {
            assert_eq!(entry.traffic.len(), entry.tower_top - dump.floor_level + 1);
            assert_eq!(entry.traffic[0].0, dump.floor_level);
        }
    }

    #[test]
    fn dump_does_not_mutate() {
        let list = list_with(&[10, 20, 30]);
        let counter = list.access_counter();
        let first = list.dump();
        let second = list.dump();
        assert_eq!(first, second);
        assert_eq!(list.access_counter(), counter);
    }

    #[test]
    fn display_renders_one_line_per_node() {
        let list = list_with(&[10]);
        let rendered = list.dump().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("10 : 1 :"), "{}", lines[1]);
    }
}
