use std::{fmt, ops::Range};

use serde::Serialize;

/// Page identifiers as they appear in a trace. 0 is never a real page.
pub type Page = u64;

/// One storage slot. `col` is always 0 unless the owner is tabular.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    pub row: usize,
    pub col: usize,
}

impl Address {
    pub fn new(row: usize, col: usize) -> Self {
        Address { row, col }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessResult {
    Hit,
    Miss,
}

/// Shape of a slot grid, shared by the store and the replacement metadata.
///
/// A linear layout has one way per row. A tabular layout has two ways per
/// row and half as many rows, so the slot count is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub rows: usize,
    pub ways: usize,
}

impl Layout {
    pub fn linear(capacity: usize) -> Self {
        assert!(capacity > 0);
        Layout {
            rows: capacity,
            ways: 1,
        }
    }

    pub fn tabular(capacity: usize) -> Self {
        assert!(capacity >= 2 && capacity % 2 == 0);
        Layout {
            rows: capacity / 2,
            ways: 2,
        }
    }

    /// The same slot count reshaped into linear or tabular form.
    pub fn with_tabular(self, tabular: bool) -> Self {
        if tabular {
            Layout::tabular(self.slots())
        } else {
            Layout::linear(self.slots())
        }
    }

    pub fn slots(&self) -> usize {
        self.rows * self.ways
    }

    pub fn is_tabular(&self) -> bool {
        self.ways == 2
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.row < self.rows && addr.col < self.ways
    }

    pub fn index(&self, addr: Address) -> usize {
        debug_assert!(self.contains(addr), "{addr} outside {self:?}");
        addr.row * self.ways + addr.col
    }

    pub fn address(&self, index: usize) -> Address {
        Address::new(index / self.ways, index % self.ways)
    }

    pub fn row_range(&self, row: usize) -> Range<usize> {
        row * self.ways..(row + 1) * self.ways
    }
}

/// The cache's slot storage.
#[derive(Debug, Clone)]
pub struct CacheStore {
    layout: Layout,
    slots: Vec<Option<Page>>,
    occupied: usize,
}

impl CacheStore {
    pub fn new(layout: Layout) -> Self {
        CacheStore {
            layout,
            slots: vec![None; layout.slots()],
            occupied: 0,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn lookup(&self, page: Page) -> AccessResult {
        if self.slots.contains(&Some(page)) {
            AccessResult::Hit
        } else {
            AccessResult::Miss
        }
    }

    /// Slot holding `page`, if resident.
    pub fn locate(&self, page: Page) -> Option<Address> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(page))
            .map(|idx| self.layout.address(idx))
    }

    pub fn is_full(&self) -> bool {
        self.occupied >= self.layout.slots()
    }

    pub fn get(&self, addr: Address) -> Option<Page> {
        self.slots[self.layout.index(addr)]
    }

    /// Stores `page` at `addr`, returning whatever it displaced.
    pub fn write(&mut self, addr: Address, page: Page) -> Option<Page> {
        let slot = &mut self.slots[self.layout.index(addr)];
        let evicted = slot.replace(page);
        if evicted.is_none() {
            self.occupied += 1;
        }
        evicted
    }

    /// Switches between linear and tabular storage. Contents are lost.
    pub fn set_tabular(&mut self, tabular: bool) {
        self.layout = self.layout.with_tabular(tabular);
        self.slots = vec![None; self.layout.slots()];
        self.clear();
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.occupied = 0;
    }

    /// Slots grouped by row.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Page>]> + '_ {
        self.slots.chunks(self.layout.ways)
    }
}

impl fmt::Display for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for way in 0..self.layout.ways {
            if way > 0 {
                writeln!(f)?;
            }
            write!(f, "[ ")?;
            for (row, slots) in self.rows().enumerate() {
                if row > 0 {
                    write!(f, " | ")?;
                }
                match slots[way] {
                    Some(page) => write!(f, "{page:>2}")?,
                    None => write!(f, "  ")?,
                }
            }
            write!(f, " ]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_locate_find_written_pages() {
        let mut store = CacheStore::new(Layout::linear(4));
        assert_eq!(store.lookup(7), AccessResult::Miss);
        store.write(Address::new(2, 0), 7);
        assert_eq!(store.lookup(7), AccessResult::Hit);
        assert_eq!(store.locate(7), Some(Address::new(2, 0)));
        assert_eq!(store.locate(8), None);
    }

    #[test]
    fn overwrite_does_not_double_count() {
        let mut store = CacheStore::new(Layout::linear(2));
        assert_eq!(store.write(Address::new(0, 0), 5), None);
        assert_eq!(store.write(Address::new(0, 0), 6), Some(5));
        assert_eq!(store.occupied(), 1);
        assert!(!store.is_full());
        store.write(Address::new(1, 0), 9);
        assert!(store.is_full());
    }

    #[test]
    fn tabular_store_fills_both_ways() {
        let mut store = CacheStore::new(Layout::tabular(4));
        assert_eq!(store.layout(), Layout { rows: 2, ways: 2 });
        for (i, addr) in [(0, 0), (0, 1), (1, 0)].into_iter().enumerate() {
            store.write(Address::new(addr.0, addr.1), i as Page + 1);
        }
        assert!(!store.is_full());
        store.write(Address::new(1, 1), 4);
        assert!(store.is_full());
        assert_eq!(store.locate(2), Some(Address::new(0, 1)));
    }

    #[test]
    fn mode_switch_round_trips_capacity() {
        let mut store = CacheStore::new(Layout::linear(8));
        store.write(Address::new(3, 0), 11);
        store.set_tabular(true);
        assert_eq!(store.layout(), Layout { rows: 4, ways: 2 });
        assert_eq!(store.occupied(), 0);
        store.set_tabular(true);
        assert_eq!(store.layout(), Layout { rows: 4, ways: 2 });
        store.set_tabular(false);
        assert_eq!(store.layout(), Layout::linear(8));
        assert!(store.rows().all(|row| row == [None]));
    }

    #[test]
    fn clear_resets_occupancy() {
        let mut store = CacheStore::new(Layout::linear(2));
        store.write(Address::new(0, 0), 1);
        store.write(Address::new(1, 0), 2);
        store.clear();
        assert_eq!(store.occupied(), 0);
        assert_eq!(store.lookup(1), AccessResult::Miss);
    }

    #[test]
    fn display_renders_one_line_per_way() {
        let mut store = CacheStore::new(Layout::tabular(4));
        store.write(Address::new(0, 0), 3);
        store.write(Address::new(1, 1), 12);
        assert_eq!(store.to_string(), "[  3 |    ]\n[    | 12 ]");
    }
}
