/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use appmetrics_registry::{Counter, Registry};
use appmetrics_statsd::{StatsdBuffer, StatsdClient, StatsdEmitter};

fn counter_emitter(prefix: &str) -> (Counter, StatsdEmitter, StatsdBuffer) {
    let registry = Registry::new();
    let counter = Counter::new();
    registry
        .register("counter", counter.clone().into())
        .unwrap();
    let buf = StatsdBuffer::default();
    let client = StatsdClient::with_buffer(prefix, buf.clone(), 1024);
    (counter, StatsdEmitter::new(registry, client), buf)
}

#[test]
fn cumulative_counter() {
    let (counter, mut emitter, buf) = counter_emitter("");
    counter.inc(5);
    emitter.emit_once();
    assert_eq!(buf.take_lines(), vec!["counter:5|c"]);

    counter.inc(1);
    counter.inc(2);
    emitter.emit_once();
    assert_eq!(buf.take_lines(), vec!["counter:8|c"]);
}

#[test]
fn segment_size() {
    let registry = Registry::new();
    for i in 0..4 {
        registry
            .register(&format!("c{i}"), Counter::new().into())
            .unwrap();
    }
    let buf = StatsdBuffer::new(13);
    let client = StatsdClient::with_buffer("", buf.clone(), 1024);
    let mut emitter = StatsdEmitter::new(registry, client);
    emitter.emit_once();
    assert_eq!(buf.take(), vec!["c0:0|c\nc1:0|c", "c2:0|c\nc3:0|c"]);
}

#[tokio::test(start_paused = true)]
async fn first_emit_after_interval() {
    let (counter, emitter, buf) = counter_emitter("app");
    counter.inc(5);

    let token = CancellationToken::new();
    let handle = emitter.spawn(Duration::from_secs(10), token.clone());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(buf.is_empty());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(buf.take_lines(), vec!["app.counter:5|c"]);

    counter.inc(1);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(buf.take_lines(), vec!["app.counter:6|c"]);

    token.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_on_cancel() {
    let (_counter, emitter, buf) = counter_emitter("");

    let token = CancellationToken::new();
    let handle = emitter.spawn(Duration::from_secs(10), token.clone());
    tokio::time::sleep(Duration::from_secs(3)).await;
    token.cancel();
    handle.await.unwrap();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(buf.is_empty());
}
