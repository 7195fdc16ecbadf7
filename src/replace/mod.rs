pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod mru;
pub mod random;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    cache::{Address, Layout},
    error::SimError,
};

use self::{fifo::Fifo, lfu::Lfu, lru::Lru, mru::Mru, random::Random};

/// Which replacement algorithm a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceKind {
    #[default]
    Fifo,
    Lru,
    Lfu,
    Mru,
    Random,
}

impl ReplaceKind {
    pub const ALL: [ReplaceKind; 5] = [
        ReplaceKind::Fifo,
        ReplaceKind::Lru,
        ReplaceKind::Lfu,
        ReplaceKind::Mru,
        ReplaceKind::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReplaceKind::Fifo => "FIFO",
            ReplaceKind::Lru => "LRU",
            ReplaceKind::Lfu => "LFU",
            ReplaceKind::Mru => "MRU",
            ReplaceKind::Random => "RANDOM",
        }
    }

    /// Whether a slot written on a miss is reported back.
    pub fn takes_write_feedback(self) -> bool {
        !matches!(self, ReplaceKind::Random)
    }

    /// Whether a read hit is reported back. FIFO order only tracks insertion.
    pub fn takes_hit_feedback(self) -> bool {
        !matches!(self, ReplaceKind::Random | ReplaceKind::Fifo)
    }
}

impl fmt::Display for ReplaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-slot usage metadata, shaped like the cache store.
#[derive(Debug, Clone)]
pub struct SlotTable {
    layout: Layout,
    values: Vec<u64>,
}

impl SlotTable {
    pub fn new(layout: Layout) -> Self {
        SlotTable {
            layout,
            values: vec![0; layout.slots()],
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn get(&self, addr: Address) -> u64 {
        self.values[self.layout.index(addr)]
    }

    pub fn set(&mut self, addr: Address, value: u64) {
        let idx = self.layout.index(addr);
        self.values[idx] = value;
    }

    pub fn bump(&mut self, addr: Address) {
        let idx = self.layout.index(addr);
        self.values[idx] += 1;
    }

    /// Reshapes to linear or tabular form with every entry zeroed.
    pub fn set_tabular(&mut self, tabular: bool) {
        *self = SlotTable::new(self.layout.with_tabular(tabular));
    }

    /// Finds the slot whose value `wins` against the best seen so far.
    ///
    /// Rows are scanned from 1 with slot (0, 0) as the starting best, so
    /// slot (0, 1) is never nominated. A win in way 1 moves only the
    /// column; the row stays at the last way-0 winner.
    pub fn scan(&self, wins: impl Fn(u64, u64) -> bool) -> Address {
        let tabular = self.layout.is_tabular();
        let mut best = self.get(Address::new(0, 0));
        let (mut row, mut col) = (0, 0);
        for r in 1..self.layout.rows {
            let first = self.get(Address::new(r, 0));
            if wins(first, best) {
                best = first;
                row = r;
            }
            if tabular {
                let second = self.get(Address::new(r, 1));
                if wins(second, best) {
                    best = second;
                    col = 1;
                }
            }
        }
        Address::new(row, col)
    }
}

/// Chooses victims once the store is full.
#[derive(Debug, Clone)]
pub enum ReplacementAlgorithm {
    Fifo(Fifo),
    Lru(Lru),
    Lfu(Lfu),
    Mru(Mru),
    Random(Random),
}

impl ReplacementAlgorithm {
    /// `seed` only matters for [`ReplaceKind::Random`].
    pub fn new(kind: ReplaceKind, layout: Layout, seed: Option<u64>) -> Self {
        match kind {
            ReplaceKind::Fifo => ReplacementAlgorithm::Fifo(Fifo::new(layout)),
            ReplaceKind::Lru => ReplacementAlgorithm::Lru(Lru::new(layout)),
            ReplaceKind::Lfu => ReplacementAlgorithm::Lfu(Lfu::new(layout)),
            ReplaceKind::Mru => ReplacementAlgorithm::Mru(Mru::new(layout)),
            ReplaceKind::Random => ReplacementAlgorithm::Random(Random::new(layout, seed)),
        }
    }

    pub fn kind(&self) -> ReplaceKind {
        match self {
            ReplacementAlgorithm::Fifo(_) => ReplaceKind::Fifo,
            ReplacementAlgorithm::Lru(_) => ReplaceKind::Lru,
            ReplacementAlgorithm::Lfu(_) => ReplaceKind::Lfu,
            ReplacementAlgorithm::Mru(_) => ReplaceKind::Mru,
            ReplacementAlgorithm::Random(_) => ReplaceKind::Random,
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            ReplacementAlgorithm::Fifo(fifo) => fifo.layout(),
            ReplacementAlgorithm::Lru(lru) => lru.layout(),
            ReplacementAlgorithm::Lfu(lfu) => lfu.layout(),
            ReplacementAlgorithm::Mru(mru) => mru.layout(),
            ReplacementAlgorithm::Random(random) => random.layout(),
        }
    }

    /// Slot to evict. Only meaningful when the store is full.
    pub fn select_victim(&mut self) -> Address {
        match self {
            ReplacementAlgorithm::Fifo(fifo) => fifo.select_victim(),
            ReplacementAlgorithm::Lru(lru) => lru.select_victim(),
            ReplacementAlgorithm::Lfu(lfu) => lfu.select_victim(),
            ReplacementAlgorithm::Mru(mru) => mru.select_victim(),
            ReplacementAlgorithm::Random(random) => random.select_victim(),
        }
    }

    /// Feedback after `addr` was written or hit.
    pub fn on_access(&mut self, addr: Address) -> Result<(), SimError> {
        match self {
            ReplacementAlgorithm::Fifo(fifo) => fifo.on_access(addr),
            ReplacementAlgorithm::Lru(lru) => lru.on_access(addr),
            ReplacementAlgorithm::Lfu(lfu) => lfu.on_access(addr),
            ReplacementAlgorithm::Mru(mru) => mru.on_access(addr),
            ReplacementAlgorithm::Random(_) => {
                return Err(SimError::Unsupported {
                    algorithm: ReplaceKind::Random.name(),
                })
            }
        }
        Ok(())
    }

    /// Reshapes the metadata to match a store switched the same way.
    pub fn set_tabular(&mut self, tabular: bool) {
        match self {
            ReplacementAlgorithm::Fifo(fifo) => fifo.set_tabular(tabular),
            ReplacementAlgorithm::Lru(lru) => lru.set_tabular(tabular),
            ReplacementAlgorithm::Lfu(lfu) => lfu.set_tabular(tabular),
            ReplacementAlgorithm::Mru(mru) => mru.set_tabular(tabular),
            ReplacementAlgorithm::Random(random) => random.set_tabular(tabular),
        }
    }
}
