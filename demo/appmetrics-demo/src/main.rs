/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use clap::{Arg, ArgMatches, Command, ValueHint, value_parser};
use log::{debug, info};
use yaml_rust::{Yaml, YamlLoader};

use appmetrics::{
    AppMetrics, ComputeFn, Counter, FunctionalGaugeFloat64, Gauge, Meter, Registry, Tagged, Timer,
};
use appmetrics_prometheus::{Collector, CollectorConfig};
use appmetrics_statsd::StatsdClientConfig;

mod logger;

const ARG_CONFIG: &str = "config";
const ARG_TIME: &str = "time";
const ARG_PRINT_INTERVAL: &str = "print-interval";
const ARG_VERBOSE: &str = "verbose";

#[derive(AppMetrics)]
struct ServerMetrics {
    #[metric(name = "server.requests")]
    requests: Tagged<Counter>,
    #[metric(name = "server.latency", sample = "expdecay,1028,0.015")]
    latency: Timer,
    #[metric(name = "server.inflight")]
    inflight: Gauge,
    #[metric(name = "server.events")]
    events: Meter,
    #[metric(name = "server.uptime")]
    uptime: FunctionalGaugeFloat64,
    compute_uptime: ComputeFn<f64>,
}

#[derive(Default)]
struct DemoConfig {
    statsd: StatsdClientConfig,
    prometheus: CollectorConfig,
}

impl DemoConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        let docs = YamlLoader::load_from_str(&content)
            .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
        let mut config = DemoConfig::default();
        let Some(doc) = docs.first() else {
            return Ok(config);
        };
        let Yaml::Hash(map) = doc else {
            return Err(anyhow!("yaml value type for the config file should be 'map'"));
        };

        appmetrics_yaml::foreach_kv(map, |k, v| {
            match appmetrics_yaml::key::normalize(k).as_str() {
                "statsd" => {
                    config.statsd = StatsdClientConfig::parse_yaml(v)
                        .context(format!("invalid statsd client config for key {k}"))?;
                }
                "prometheus" => {
                    config.prometheus = CollectorConfig::parse_yaml(v)
                        .context(format!("invalid prometheus collector config for key {k}"))?;
                }
                _ => return Err(anyhow!("invalid key {k}")),
            }
            Ok(())
        })?;
        Ok(config)
    }
}

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .arg(
            Arg::new(ARG_CONFIG)
                .help("Yaml config file with 'statsd' and 'prometheus' sections")
                .long(ARG_CONFIG)
                .short('c')
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new(ARG_TIME)
                .help("How many seconds to run")
                .long(ARG_TIME)
                .short('t')
                .num_args(1)
                .value_parser(value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            Arg::new(ARG_PRINT_INTERVAL)
                .help("Seconds between prometheus dumps")
                .long(ARG_PRINT_INTERVAL)
                .num_args(1)
                .value_parser(value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show debug logs")
                .long(ARG_VERBOSE)
                .short('v')
                .action(clap::ArgAction::SetTrue),
        )
}

fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();
    let _logger_guard = logger::setup(args.get_flag(ARG_VERBOSE)).context("failed to setup log")?;

    let config = match args.get_one::<PathBuf>(ARG_CONFIG) {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    rt.block_on(run(&args, config))
}

async fn run(args: &ArgMatches, config: DemoConfig) -> anyhow::Result<()> {
    let run_time = args.get_one::<u64>(ARG_TIME).copied().unwrap_or(30);
    let print_interval = args.get_one::<u64>(ARG_PRINT_INTERVAL).copied().unwrap_or(10);

    let registry = Registry::new();
    let metrics = appmetrics::populate::<ServerMetrics>()?;
    let start = Instant::now();
    metrics
        .compute_uptime
        .set(move || start.elapsed().as_secs_f64());
    appmetrics::register(&registry, &*metrics);
    info!(
        "registered metrics: {:?}",
        appmetrics::metric_names(&*metrics)
    );

    let (emitter, token) = appmetrics_statsd::start_emitter(registry.clone(), &config.statsd)
        .context("failed to start statsd emitter")?;
    info!("statsd emitter started with backend {:?}", config.statsd.backend());

    let collector = Collector::new(registry.clone(), config.prometheus);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(run_time);
    let mut request_interval = tokio::time::interval(Duration::from_millis(100));
    let mut print_interval = tokio::time::interval_at(
        tokio::time::Instant::now() + Duration::from_secs(print_interval),
        Duration::from_secs(print_interval),
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => break,
            _ = request_interval.tick() => serve_request(&metrics).await,
            _ = print_interval.tick() => print!("{}", collector.render()),
        }
    }

    token.cancel();
    emitter
        .await
        .map_err(|e| anyhow!("statsd emitter task failed: {e}"))?;
    appmetrics::unregister(&registry, &*metrics);
    debug!("left in registry: {:?}", registry.names());
    Ok(())
}

async fn serve_request(metrics: &ServerMetrics) {
    metrics.inflight.inc(1);
    metrics.events.mark(1);

    let start = Instant::now();
    tokio::time::sleep(Duration::from_millis(fastrand::u64(1..20))).await;
    metrics.latency.update_since(start);

    let status = match fastrand::u8(0..100) {
        0..=89 => 200,
        90..=96 => 404,
        _ => 500,
    };
    metrics.requests.tag([format!("status:{status}")]).inc(1);
    metrics.inflight.dec(1);
}
