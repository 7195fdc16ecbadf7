use crate::cache::{Address, Layout};

use super::SlotTable;

/// First in, first out: evicts the slot written longest ago.
#[derive(Debug, Clone)]
pub struct Fifo {
    inserted: SlotTable,
    age: u64,
}

impl Fifo {
    pub fn new(layout: Layout) -> Self {
        Fifo {
            inserted: SlotTable::new(layout),
            age: 0,
        }
    }

    pub fn layout(&self) -> Layout {
        self.inserted.layout()
    }

    pub fn select_victim(&mut self) -> Address {
        self.inserted.scan(|a, b| a < b)
    }

    pub fn on_access(&mut self, addr: Address) {
        self.inserted.set(addr, self.age);
        self.age += 1;
    }

    pub fn set_tabular(&mut self, tabular: bool) {
        self.inserted.set_tabular(tabular);
    }
}
