/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use appmetrics_registry::{HistogramSnapshot, Metric, Registry, name};

use crate::{StatsdClient, StatsdClientConfig, StatsdTagGroup};

const MIN_EMIT_INTERVAL: Duration = Duration::from_millis(1);

/// Pushes every registry metric to a statsd client.
pub struct StatsdEmitter {
    registry: Registry,
    client: StatsdClient,
    tags: StatsdTagGroup,
}

impl StatsdEmitter {
    pub fn new(registry: Registry, client: StatsdClient) -> Self {
        StatsdEmitter {
            registry,
            client,
            tags: StatsdTagGroup::default(),
        }
    }

    #[inline]
    pub fn client(&self) -> &StatsdClient {
        &self.client
    }

    /// Sends one value set for every metric and flushes the sink.
    pub fn emit_once(&mut self) {
        let mut entries = Vec::with_capacity(self.registry.len());
        self.registry
            .each(|name, metric| entries.push((name.to_string(), metric.clone())));
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        for (full_name, metric) in &entries {
            let (base, tags) = name::split_tagged_name(full_name);
            self.tags.clear();
            for tag in tags {
                self.tags.add_tag_value(tag);
            }
            emit_metric(&mut self.client, base, &self.tags, metric);
        }
        self.client.flush_sink();
    }

    /// Emits after every `interval`, starting one interval from now, until
    /// `token` is cancelled.
    pub async fn run(mut self, interval: Duration, token: CancellationToken) {
        let interval = interval.max(MIN_EMIT_INTERVAL);
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => break,
                _ = ticker.tick() => self.emit_once(),
            }
        }
        debug!("statsd emitter stopped");
    }

    /// Runs the emit loop on the current tokio runtime.
    pub fn spawn(self, interval: Duration, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(interval, token))
    }
}

fn emit_metric(client: &mut StatsdClient, name: &str, tags: &StatsdTagGroup, metric: &Metric) {
    match metric {
        Metric::Counter(c) => client.count_with_tags(name, c.count(), tags).send(),
        Metric::Gauge(g) => client.gauge_with_tags(name, g.value(), tags).send(),
        Metric::FunctionalGauge(g) => client.gauge_with_tags(name, g.value(), tags).send(),
        Metric::GaugeFloat64(g) => client.gauge_float_with_tags(name, g.value(), tags).send(),
        Metric::FunctionalGaugeFloat64(g) => {
            client.gauge_float_with_tags(name, g.value(), tags).send()
        }
        Metric::Histogram(h) => emit_sample(client, name, tags, &h.snapshot()),
        Metric::Timer(t) => emit_sample(client, name, tags, t.snapshot().histogram()),
        Metric::Meter(m) => {
            let s = m.snapshot();
            let n = format!("{name}.avg");
            client.gauge_float_with_tags(&n, s.rate_mean(), tags).send();
            let n = format!("{name}.count");
            client.gauge_with_tags(&n, s.count(), tags).send();
            let n = format!("{name}.rate1");
            client.gauge_float_with_tags(&n, s.rate1(), tags).send();
            let n = format!("{name}.rate5");
            client.gauge_float_with_tags(&n, s.rate5(), tags).send();
            let n = format!("{name}.rate15");
            client.gauge_float_with_tags(&n, s.rate15(), tags).send();
        }
    }
}

fn emit_sample(
    client: &mut StatsdClient,
    name: &str,
    tags: &StatsdTagGroup,
    s: &HistogramSnapshot,
) {
    let n = format!("{name}.avg");
    client.gauge_float_with_tags(&n, s.mean(), tags).send();
    let n = format!("{name}.count");
    client.gauge_with_tags(&n, s.count(), tags).send();
    let n = format!("{name}.max");
    client.gauge_with_tags(&n, s.max(), tags).send();
    let n = format!("{name}.median");
    client.gauge_float_with_tags(&n, s.percentile(0.5), tags).send();
    let n = format!("{name}.min");
    client.gauge_with_tags(&n, s.min(), tags).send();
    let n = format!("{name}.sum");
    client.gauge_with_tags(&n, s.sum(), tags).send();
    let n = format!("{name}.95percentile");
    client.gauge_float_with_tags(&n, s.percentile(0.95), tags).send();
}

/// Builds a client from `config` and spawns its emit loop on the current
/// tokio runtime.
pub fn start_emitter(
    registry: Registry,
    config: &StatsdClientConfig,
) -> io::Result<(JoinHandle<()>, CancellationToken)> {
    let client = config.build()?;
    let token = CancellationToken::new();
    let handle = StatsdEmitter::new(registry, client).spawn(config.emit_interval, token.clone());
    Ok((handle, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use appmetrics_registry::{
        Counter, FunctionalGauge, Gauge, GaugeFloat64, Histogram, Meter, Sample, Timer,
    };

    use crate::StatsdBuffer;

    fn buf_emitter(registry: &Registry) -> (StatsdEmitter, StatsdBuffer) {
        let buf = StatsdBuffer::default();
        let client = StatsdClient::with_buffer("", buf.clone(), 1024);
        (StatsdEmitter::new(registry.clone(), client), buf)
    }

    #[test]
    fn gauges() {
        let r = Registry::new();
        let g = Gauge::new();
        g.update(-3);
        r.register("gauge", g.into()).unwrap();
        let gf = GaugeFloat64::new();
        gf.update(0.5);
        r.register("gauge_float", gf.into()).unwrap();
        r.register("workers", FunctionalGauge::new(|| 7).into())
            .unwrap();

        let (mut emitter, buf) = buf_emitter(&r);
        emitter.emit_once();
        assert_eq!(
            buf.take_lines(),
            vec!["gauge:-3|g", "gauge_float:0.5|g", "workers:7|g"]
        );
    }

    #[test]
    fn histogram() {
        let r = Registry::new();
        let h = Histogram::new(Sample::uniform(100));
        for v in [
            10, 9, 15, 12, 20, 28, 8, 12, 20, 16, 17, 27, 11, 10, 20, 21, 19, 18, 10, 26,
        ] {
            h.update(v);
        }
        r.register("latency[route:/]", h.into()).unwrap();

        let (mut emitter, buf) = buf_emitter(&r);
        emitter.emit_once();
        assert_eq!(
            buf.take_lines(),
            vec![
                "latency.avg:16.45|g|#route:/",
                "latency.count:20|g|#route:/",
                "latency.max:28|g|#route:/",
                "latency.median:16.5|g|#route:/",
                "latency.min:8|g|#route:/",
                "latency.sum:329|g|#route:/",
                "latency.95percentile:27.95|g|#route:/",
            ]
        );
    }

    #[test]
    fn meter_and_timer() {
        let r = Registry::new();
        r.register("events", Meter::new().into()).unwrap();
        let t = Timer::new(Sample::uniform(10));
        t.update(Duration::from_micros(3));
        r.register("request", t.into()).unwrap();

        let (mut emitter, buf) = buf_emitter(&r);
        emitter.emit_once();
        let lines = buf.take_lines();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "events.avg:0.0|g");
        assert_eq!(lines[1], "events.count:0|g");
        assert_eq!(lines[2], "events.rate1:0.0|g");
        assert_eq!(lines[4], "events.rate15:0.0|g");
        assert_eq!(lines[6], "request.count:1|g");
        assert_eq!(lines[7], "request.max:3000|g");
        assert_eq!(lines[10], "request.sum:3000|g");
    }

    #[test]
    fn counter_tags() {
        let r = Registry::new();
        let c = Counter::new();
        c.inc(5);
        r.register("requests[role:server,canary]", c.clone().into())
            .unwrap();

        let buf = StatsdBuffer::default();
        let client = StatsdClient::with_buffer("app", buf.clone(), 1024).with_tag("env", "test");
        let mut emitter = StatsdEmitter::new(r, client);
        emitter.emit_once();
        c.inc(1);
        emitter.emit_once();
        assert_eq!(
            buf.take(),
            vec![
                "app.requests:5|c|#env:test,canary,role:server",
                "app.requests:6|c|#env:test,canary,role:server",
            ]
        );
    }
}
