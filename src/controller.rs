use log::trace;
use serde::Serialize;

use crate::{
    assign::{AssignmentPolicy, MappingKind},
    cache::{AccessResult, Address, CacheStore, Layout, Page},
    error::SimError,
    replace::{ReplaceKind, ReplacementAlgorithm},
};

/// Running totals. `hits + misses == total` after every reference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub total: u64,
    pub hits: u64,
    pub misses: u64,
}

impl Counters {
    fn record(&mut self, status: AccessResult) {
        self.total += 1;
        match status {
            AccessResult::Hit => self.hits += 1,
            AccessResult::Miss => self.misses += 1,
        }
    }

    /// Ratios are NaN when nothing was processed.
    pub fn summary(&self) -> Summary {
        let total = self.total as f64;
        Summary {
            hit_ratio: self.hits as f64 / total,
            miss_ratio: self.misses as f64 / total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub hit_ratio: f64,
    pub miss_ratio: f64,
}

/// Outcome of one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    pub page: Page,
    pub status: AccessResult,
    pub address: Address,
    /// Page overwritten by this reference, if any.
    pub evicted: Option<Page>,
    pub counters: Counters,
}

/// Drives references through a store, a placement policy and, for the
/// associative mappings, a replacement algorithm.
#[derive(Debug, Clone)]
pub struct Controller {
    store: CacheStore,
    policy: AssignmentPolicy,
    repl: Option<ReplacementAlgorithm>,
    counters: Counters,
}

impl Controller {
    /// Builds a fresh controller. Set associative mapping gets a tabular
    /// layout for both the store and the replacement metadata.
    pub fn new(
        capacity: usize,
        mapping: MappingKind,
        replace: Option<ReplaceKind>,
        seed: Option<u64>,
    ) -> Result<Self, SimError> {
        if !capacity.is_power_of_two() || (mapping.is_tabular() && capacity < 2) {
            return Err(SimError::Capacity(capacity));
        }
        let layout = if mapping.is_tabular() {
            Layout::tabular(capacity)
        } else {
            Layout::linear(capacity)
        };
        let repl = match (mapping.needs_replacement(), replace) {
            (true, Some(kind)) => Some(ReplacementAlgorithm::new(kind, layout, seed)),
            (true, None) => {
                return Err(SimError::MissingReplacement {
                    mapping: mapping.name(),
                })
            }
            (false, Some(_)) => return Err(SimError::UnexpectedReplacement),
            (false, None) => None,
        };

        Ok(Controller {
            store: CacheStore::new(layout),
            policy: AssignmentPolicy::new(mapping, capacity),
            repl,
            counters: Counters::default(),
        })
    }

    pub fn process(&mut self, page: Page) -> Result<Event, SimError> {
        if page == 0 {
            return Err(SimError::ReservedPage);
        }

        let status = self.store.lookup(page);
        self.counters.record(status);

        let (address, evicted) = match (status, self.store.locate(page)) {
            (AccessResult::Hit, Some(address)) => {
                if let Some(repl) = self.repl.as_mut().filter(|r| r.kind().takes_hit_feedback()) {
                    repl.on_access(address)?;
                }
                (address, None)
            }
            _ => {
                let address = self.place(page);
                let evicted = self.store.write(address, page);
                if let Some(evicted) = evicted {
                    trace!("page {page} evicts {evicted} at {address}");
                }
                if let Some(repl) = self.repl.as_mut().filter(|r| r.kind().takes_write_feedback()) {
                    repl.on_access(address)?;
                }
                (address, evicted)
            }
        };

        Ok(Event {
            page,
            status,
            address,
            evicted,
            counters: self.counters,
        })
    }

    fn place(&mut self, page: Page) -> Address {
        if let AssignmentPolicy::Direct(direct) = &self.policy {
            return direct.assign(page);
        }
        match self.repl.as_mut() {
            Some(repl) if self.store.is_full() => repl.select_victim(),
            _ => self.policy.assign(page),
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn summary(&self) -> Summary {
        self.counters.summary()
    }

    pub fn mapping(&self) -> MappingKind {
        self.policy.kind()
    }

    pub fn replacement(&self) -> Option<ReplaceKind> {
        self.repl.as_ref().map(ReplacementAlgorithm::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ctrl: &mut Controller, pages: &[Page]) -> Vec<Event> {
        pages.iter().map(|&p| ctrl.process(p).unwrap()).collect()
    }

    #[test]
    fn direct_overwrites_its_row() {
        let mut ctrl = Controller::new(4, MappingKind::Direct, None, None).unwrap();
        let events = run(&mut ctrl, &[1, 2, 3, 4, 5]);
        let last = events.last().unwrap();
        assert_eq!(last.address, Address::new(1, 0));
        assert_eq!(last.evicted, Some(1));
        assert_eq!(ctrl.counters(), Counters { total: 5, hits: 0, misses: 5 });
    }

    #[test]
    fn associative_fifo_evicts_oldest() {
        let mut ctrl =
            Controller::new(4, MappingKind::Associative, Some(ReplaceKind::Fifo), None).unwrap();
        let events = run(&mut ctrl, &[10, 20, 30, 40, 50]);
        let rows: Vec<_> = events.iter().map(|e| e.address.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3, 0]);
        assert_eq!(events[4].evicted, Some(10));
        let contents: Vec<_> = ctrl.store().rows().map(|r| r[0]).collect();
        assert_eq!(contents, vec![Some(50), Some(20), Some(30), Some(40)]);
    }

    #[test]
    fn hits_resolve_to_resident_slot() {
        let mut ctrl =
            Controller::new(4, MappingKind::SetAssociative, Some(ReplaceKind::Lru), None).unwrap();
        let events = run(&mut ctrl, &[3, 5, 3]);
        assert_eq!(events[1].address, Address::new(1, 1));
        assert_eq!(events[2].status, AccessResult::Hit);
        assert_eq!(events[2].address, Address::new(1, 0));
        assert_eq!(ctrl.counters(), Counters { total: 3, hits: 1, misses: 2 });
    }

    #[test]
    fn random_is_never_sent_feedback() {
        let mut ctrl =
            Controller::new(2, MappingKind::Associative, Some(ReplaceKind::Random), Some(9))
                .unwrap();
        run(&mut ctrl, &[1, 2, 1, 3, 4, 3]);
        assert_eq!(ctrl.counters().total, 6);
    }

    #[test]
    fn page_zero_is_rejected_without_counting() {
        let mut ctrl = Controller::new(4, MappingKind::Direct, None, None).unwrap();
        assert_eq!(ctrl.process(0), Err(SimError::ReservedPage));
        assert_eq!(ctrl.counters(), Counters::default());
    }

    #[test]
    fn construction_checks_pairing_and_capacity() {
        assert_eq!(
            Controller::new(6, MappingKind::Direct, None, None).unwrap_err(),
            SimError::Capacity(6)
        );
        assert_eq!(
            Controller::new(1, MappingKind::SetAssociative, Some(ReplaceKind::Lru), None)
                .unwrap_err(),
            SimError::Capacity(1)
        );
        assert_eq!(
            Controller::new(4, MappingKind::Associative, None, None).unwrap_err(),
            SimError::MissingReplacement { mapping: "associative" }
        );
        assert_eq!(
            Controller::new(4, MappingKind::Direct, Some(ReplaceKind::Fifo), None).unwrap_err(),
            SimError::UnexpectedReplacement
        );
    }

    #[test]
    fn set_associative_uses_tabular_layout() {
        let ctrl =
            Controller::new(8, MappingKind::SetAssociative, Some(ReplaceKind::Mru), None).unwrap();
        assert_eq!(ctrl.store().layout(), Layout { rows: 4, ways: 2 });
        assert_eq!(ctrl.replacement(), Some(ReplaceKind::Mru));
    }

    #[test]
    fn empty_run_has_undefined_ratios() {
        let ctrl = Controller::new(4, MappingKind::Direct, None, None).unwrap();
        assert!(ctrl.summary().hit_ratio.is_nan());
        assert!(ctrl.summary().miss_ratio.is_nan());
    }
}
