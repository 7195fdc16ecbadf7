use crate::cache::{Address, Page};

use super::direct::Direct;

/// Two-way set associative mapping.
///
/// The row comes from direct mapping over half the capacity. Within a row the
/// way alternates 0, 1, 0, ... on every assignment to that row, whether or
/// not the way it lands on is occupied.
#[derive(Debug, Clone)]
pub struct SetAssociative {
    direct: Direct,
    next_way: Vec<usize>,
}

impl SetAssociative {
    pub const WAYS: usize = 2;

    pub fn new(capacity: usize) -> Self {
        let rows = capacity / Self::WAYS;
        SetAssociative {
            direct: Direct::new(rows),
            next_way: vec![0; rows],
        }
    }

    pub fn assign(&mut self, page: Page) -> Address {
        let row = self.direct.assign(page).row;
        let col = self.next_way[row];
        self.next_way[row] = (col + 1) % Self::WAYS;
        Address::new(row, col)
    }
}
