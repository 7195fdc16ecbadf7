use crate::cache::{Address, Layout};

use super::SlotTable;

/// Least recently used: evicts the slot touched longest ago.
#[derive(Debug, Clone)]
pub struct Lru {
    touched: SlotTable,
    clock: u64,
}

impl Lru {
    pub fn new(layout: Layout) -> Self {
        Lru {
            touched: SlotTable::new(layout),
            clock: 0,
        }
    }

    pub fn layout(&self) -> Layout {
        self.touched.layout()
    }

    pub fn select_victim(&mut self) -> Address {
        let victim = self.touched.scan(|a, b| a < b);
        self.touched.set(victim, 0);
        victim
    }

    pub fn on_access(&mut self, addr: Address) {
        self.touched.set(addr, self.clock);
        self.clock += 1;
    }

    pub fn set_tabular(&mut self, tabular: bool) {
        self.touched.set_tabular(tabular);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_protects_slot_from_eviction() {
        let mut lru = Lru::new(Layout::linear(3));
        for row in 0..3 {
            lru.on_access(Address::new(row, 0));
        }
        lru.on_access(Address::new(0, 0));
        assert_eq!(lru.select_victim(), Address::new(1, 0));
    }

    #[test]
    fn victim_metadata_is_reset() {
        let mut lru = Lru::new(Layout::linear(2));
        lru.on_access(Address::new(0, 0));
        lru.on_access(Address::new(1, 0));
        lru.on_access(Address::new(0, 0));
        let victim = lru.select_victim();
        assert_eq!(victim, Address::new(1, 0));
        assert_eq!(lru.touched.get(victim), 0);
    }
}
