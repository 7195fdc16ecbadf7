use crate::cache::{Address, Layout};

/// Picks a uniformly random slot. Keeps no usage history.
#[derive(Debug, Clone)]
pub struct Random {
    layout: Layout,
    rng: fastrand::Rng,
}

impl Random {
    pub fn new(layout: Layout, seed: Option<u64>) -> Self {
        Random {
            layout,
            rng: seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn select_victim(&mut self) -> Address {
        let row = self.rng.usize(0..self.layout.rows);
        let col = if self.layout.is_tabular() {
            self.rng.usize(0..self.layout.ways)
        } else {
            0
        };
        Address::new(row, col)
    }

    pub fn set_tabular(&mut self, tabular: bool) {
        self.layout = self.layout.with_tabular(tabular);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn victims_stay_in_bounds() {
        let mut random = Random::new(Layout::tabular(8), Some(42));
        let mut seen_way_one = false;
        for _ in 0..200 {
            let victim = random.select_victim();
            assert!(random.layout().contains(victim), "{victim}");
            seen_way_one |= victim.col == 1;
        }
        assert!(seen_way_one);
    }

    #[test]
    fn same_seed_same_victims() {
        let mut a = Random::new(Layout::linear(16), Some(7));
        let mut b = Random::new(Layout::linear(16), Some(7));
        for _ in 0..20 {
            assert_eq!(a.select_victim(), b.select_victim());
        }
    }
}
