use crate::cache::{Address, Layout};

use super::SlotTable;

/// Least frequently used: evicts the slot with the fewest touches.
#[derive(Debug, Clone)]
pub struct Lfu {
    uses: SlotTable,
}

impl Lfu {
    pub fn new(layout: Layout) -> Self {
        Lfu {
            uses: SlotTable::new(layout),
        }
    }

    pub fn layout(&self) -> Layout {
        self.uses.layout()
    }

    pub fn select_victim(&mut self) -> Address {
        let victim = self.uses.scan(|a, b| a < b);
        self.uses.set(victim, 0);
        victim
    }

    pub fn on_access(&mut self, addr: Address) {
        self.uses.bump(addr);
    }

    pub fn set_tabular(&mut self, tabular: bool) {
        self.uses.set_tabular(tabular);
    }
}
