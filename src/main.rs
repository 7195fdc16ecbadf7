use std::fs;

use anyhow::{bail, Context};
use log::warn;

use page_cache_sim::{
    config::Config,
    error::LoadError,
    sim::{self, Mode, RunStats},
    trace::Trace,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    let config_str: String = if let Some(config_str) = args.opt_value_from_str("--config")? {
        config_str
    } else {
        let config_path: String = match args.opt_value_from_str("-p")? {
            Some(path) => path,
            None => bail!("Must provide a config with --config <json> or -p <path>"),
        };
        fs::read_to_string(&config_path)
            .with_context(|| format!("Could not read config file {config_path}"))?
    };
    let mut config = Config::from_json(&config_str)?;

    if let Some(capacity) = args.opt_value_from_str("-c")? {
        config.capacity = capacity;
    }
    if let Some(seed) = args.opt_value_from_str("--seed")? {
        config.seed = Some(seed);
    }
    let mode: Mode = args.opt_value_from_str("--mode")?.unwrap_or_default();
    let stats_path: Option<String> = args.opt_value_from_str("--json")?;
    let trace_path: String = match args.opt_value_from_str("-t")? {
        Some(path) => path,
        None => match config.trace.clone() {
            Some(path) => path,
            None => bail!("Must provide a trace with -t or in the config"),
        },
    };
    let pages_per_block: usize = args
        .opt_value_from_str("--buffer-size")?
        .unwrap_or(1024 * 16);
    let blocks_per_queue: usize = args.opt_value_from_str("--queue-size")?.unwrap_or(32);

    let leftover = args.finish();
    if !leftover.is_empty() {
        warn!("ignoring unrecognized arguments: {leftover:?}");
    }

    let trace = Trace::read(trace_path.clone().into(), pages_per_block, blocks_per_queue)
        .with_context(|| format!("Could not open trace {trace_path}"))?;
    let capacity = config.cache_size();
    let runs = sim::plan(mode, &config);

    let stats = if let [run] = runs.as_slice() {
        // One run: stream the trace straight through.
        let mut load_err: Option<LoadError> = None;
        let pages = trace
            .rec
            .iter()
            .map_while(|block| match block {
                Ok(block) => Some(block),
                Err(err) => {
                    load_err = Some(err);
                    None
                }
            })
            .flatten();
        let stats = sim::simulate(*run, capacity, config.seed, pages)?;
        if let Some(err) = load_err {
            return Err(err).context(trace_path);
        }
        vec![stats]
    } else {
        let pages = trace.pages().context(trace_path)?;
        runs.iter()
            .map(|&run| sim::simulate(run, capacity, config.seed, pages.iter().copied()))
            .collect::<Result<Vec<_>, _>>()?
    };

    for s in &stats {
        report(s);
    }

    if let Some(stats_path) = stats_path {
        let stats_file = fs::File::create(&stats_path)
            .with_context(|| format!("Cannot open output file {stats_path}"))?;
        serde_json::to_writer_pretty(stats_file, &stats)?;
    }
    Ok(())
}

fn report(stats: &RunStats) {
    let replace = stats
        .replace
        .map(|r| format!(" & {r}"))
        .unwrap_or_default();
    println!(
        "{}{} (capacity {}): {} hits / {} misses over {} references, hit ratio {:.2}%",
        stats.mapping,
        replace,
        stats.capacity,
        stats.hits,
        stats.misses,
        stats.total,
        stats.hit_ratio * 100.0
    );
}
