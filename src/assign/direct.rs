use crate::cache::{Address, Page};

/// Direct mapping: a page always lands in row `page mod rows`.
#[derive(Debug, Clone)]
pub struct Direct {
    rows: usize,
}

impl Direct {
    pub fn new(rows: usize) -> Self {
        assert!(rows > 0);
        Direct { rows }
    }

    pub fn assign(&self, page: Page) -> Address {
        Address::new((page % self.rows as Page) as usize, 0)
    }
}
