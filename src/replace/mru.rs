use crate::cache::{Address, Layout};

use super::SlotTable;

/// Most recently used: evicts the slot touched last.
#[derive(Debug, Clone)]
pub struct Mru {
    touched: SlotTable,
    clock: u64,
}

impl Mru {
    pub fn new(layout: Layout) -> Self {
        Mru {
            touched: SlotTable::new(layout),
            clock: 0,
        }
    }

    pub fn layout(&self) -> Layout {
        self.touched.layout()
    }

    pub fn select_victim(&mut self) -> Address {
        let victim = self.touched.scan(|a, b| a > b);
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
