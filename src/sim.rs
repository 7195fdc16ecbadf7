use std::str::FromStr;

use log::{debug, info};
use serde::Serialize;

use crate::{
    assign::MappingKind,
    cache::Page,
    config::Config,
    controller::Controller,
    error::SimError,
    replace::ReplaceKind,
};

/// Which combinations of mapping and replacement to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The configured mapping with the configured algorithm.
    #[default]
    Single,
    /// The configured mapping with every algorithm.
    Group,
    /// Every mapping with every algorithm.
    All,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "single" => Ok(Mode::Single),
            "group" => Ok(Mode::Group),
            "all" => Ok(Mode::All),
            _ => Err(format!(
                "unsupported mode '{value}', expected one of: single, group, all"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub mapping: MappingKind,
    pub replace: Option<ReplaceKind>,
}

impl Run {
    pub fn label(&self) -> String {
        match self.replace {
            Some(replace) => format!("{} & {}", self.mapping, replace),
            None => self.mapping.to_string(),
        }
    }
}

fn runs_for(mapping: MappingKind) -> Vec<Run> {
    if mapping.needs_replacement() {
        ReplaceKind::ALL
            .iter()
            .map(|&replace| Run {
                mapping,
                replace: Some(replace),
            })
            .collect()
    } else {
        vec![Run {
            mapping,
            replace: None,
        }]
    }
}

pub fn plan(mode: Mode, config: &Config) -> Vec<Run> {
    match mode {
        Mode::Single => vec![Run {
            mapping: config.mapping,
            replace: config.replace_for(config.mapping),
        }],
        Mode::Group => runs_for(config.mapping),
        Mode::All => MappingKind::ALL.into_iter().flat_map(runs_for).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub mapping: MappingKind,
    pub replace: Option<ReplaceKind>,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub total: u64,
    pub hit_ratio: f64,
    pub miss_ratio: f64,
}

/// Feeds `pages` through a freshly built controller.
pub fn simulate(
    run: Run,
    capacity: usize,
    seed: Option<u64>,
    pages: impl IntoIterator<Item = Page>,
) -> Result<RunStats, SimError> {
    let mut ctrl = Controller::new(capacity, run.mapping, run.replace, seed)?;
    info!("simulating {} with capacity {capacity}", run.label());

    for page in pages {
        let event = ctrl.process(page)?;
        debug!(
            "page {} {:?} at {} (hits {}, misses {})\n{}",
            event.page,
            event.status,
            event.address,
            event.counters.hits,
            event.counters.misses,
            ctrl.store()
        );
    }

    let counters = ctrl.counters();
    let summary = ctrl.summary();
    info!(
        "{}: hit ratio {:.2}%, miss ratio {:.2}%",
        run.label(),
        summary.hit_ratio * 100.0,
        summary.miss_ratio * 100.0
    );
    Ok(RunStats {
        mapping: run.mapping,
        replace: run.replace,
        capacity,
        hits: counters.hits,
        misses: counters.misses,
        total: counters.total,
        hit_ratio: summary.hit_ratio,
        miss_ratio: summary.miss_ratio,
    })
}
