//! LRU Recency List Module
//!
//! Index-stable arena holding cache entries in recency order.

use crate::cache::CacheEntry;

// == Slot ==
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly linked list of entries stored in a `Vec` of slots.
///
/// Links are slot indices rather than pointers, so moving an entry to the
/// front or popping the tail is O(1) without shared ownership.
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Freed slots are recycled; an index stays valid until its entry is removed.
#[derive(Debug, Default)]
pub struct RecencyList {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Inserts an entry as most recently used and returns its slot index.
    pub fn push_front(&mut self, entry: CacheEntry) -> usize {
        let slot = Slot {
            entry,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the entry at `idx` as most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Removes the entry at `idx`, freeing its slot.
    pub fn remove(&mut self, idx: usize) -> Option<CacheEntry> {
        self.slots.get(idx)?.as_ref()?;
        self.unlink(idx);
        let slot = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(slot.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Access ==
    pub fn get(&self, idx: usize) -> Option<&CacheEntry> {
        self.slots.get(idx)?.as_ref().map(|slot| &slot.entry)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry> {
        self.slots.get_mut(idx)?.as_mut().map(|slot| &mut slot.entry)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Link Helpers ==
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(slot) = self.slots[h].as_mut() {
                    slot.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(slot) => (slot.prev, slot.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(slot) = self.slots[p].as_mut() {
                    slot.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(slot) = self.slots[n].as_mut() {
                    slot.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = None;
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a `RecencyList`.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CacheEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = self.list.slots[idx].as_ref()?;
        self.cursor = slot.next;
        Some(&slot.entry)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry::new(key.to_string(), format!("v-{key}"))
    }

    fn keys(list: &RecencyList) -> Vec<String> {
        list.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn test_list_new() {
        let list = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.iter().next().is_none());
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert_eq!(keys(&list), vec!["c", "b", "a"]);
        assert_eq!(list.iter().last().map(|e| e.key.as_str()), Some("a"));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        // Already at head: no change
        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_pop_back_evicts_in_recency_order() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));
        list.move_to_front(a);

        assert_eq!(list.pop_back().unwrap().key, "b");
        assert_eq!(list.pop_back().unwrap().key, "c");
        assert_eq!(list.pop_back().unwrap().key, "a");
        assert!(list.pop_back().is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_middle_relinks_neighbours() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert_eq!(list.remove(b).unwrap().key, "b");
        assert_eq!(keys(&list), vec!["c", "a"]);
        assert_eq!(list.len(), 2);

        // Removing twice is a no-op
        assert!(list.remove(b).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.remove(a);
        let b = list.push_front(entry("b"));

        assert_eq!(a, b);
        assert_eq!(list.get(b).unwrap().key, "b");
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        list.push_front(entry("c"));
        assert_eq!(keys(&list), vec!["c"]);
    }
}
