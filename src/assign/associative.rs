use crate::cache::{Address, Page};

/// Fully associative mapping: rows are handed out in order of arrival.
#[derive(Debug, Clone)]
pub struct Associative {
    capacity: usize,
    rows: usize,
    fill: usize,
}

impl Associative {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Associative {
            capacity,
            rows: capacity,
            fill: 0,
        }
    }

    pub fn assign(&mut self, _page: Page) -> Address {
        let row = self.fill % self.rows;
        self.fill += 1;
        Address::new(row, 0)
    }

    // Only the row modulus changes; column 1 is never handed out.
    pub fn set_tabular(&mut self, tabular: bool) {
        self.rows = if tabular {
            (self.capacity / 2).max(1)
        } else {
            self.capacity
        };
    }
}
