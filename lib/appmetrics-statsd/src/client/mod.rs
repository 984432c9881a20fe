/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::io;
use std::time::Instant;

use log::warn;

use crate::{StatsdBuffer, StatsdMetricsSink, StatsdTagGroup};

mod formatter;

pub struct StatsdClient {
    prefix: String,
    sink: StatsdMetricsSink,
    tags: StatsdTagGroup,

    create_instant: Instant,
    last_error_report: u64,
    send_errors: u64,
}

impl StatsdClient {
    pub(crate) fn new(prefix: String, sink: StatsdMetricsSink) -> Self {
        StatsdClient {
            prefix,
            sink,
            tags: Default::default(),
            create_instant: Instant::now(),
            last_error_report: 0,
            send_errors: 0,
        }
    }

    /// A client that captures datagrams in `buf` instead of sending them.
    pub fn with_buffer(prefix: &str, buf: StatsdBuffer, cache_size: usize) -> Self {
        let sink = StatsdMetricsSink::buf_with_capacity(buf, cache_size);
        StatsdClient::new(prefix.to_string(), sink)
    }

    pub fn with_tag<T: AsRef<str>>(mut self, key: &str, value: T) -> Self {
        self.tags.add_tag(key, value);
        self
    }

    pub fn with_tag_value<T: AsRef<str>>(mut self, value: T) -> Self {
        self.tags.add_tag_value(value);
        self
    }

    pub fn with_static_tags(mut self, tags: &BTreeMap<String, String>) -> Self {
        self.tags.add_static_tags(tags);
        self
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// How many sends have failed since the client was created.
    #[inline]
    pub fn send_errors(&self) -> u64 {
        self.send_errors
    }

    pub fn flush_sink(&mut self) {
        if let Err(e) = self.sink.flush() {
            self.handle_emit_error(e);
        }
    }

    fn handle_emit_error(&mut self, e: io::Error) {
        self.send_errors += 1;
        let time_slice = self.create_instant.elapsed().as_secs() >> 6; // every 64s
        if self.last_error_report != time_slice || self.send_errors == 1 {
            warn!("sending metrics error: {e:?}");
            self.last_error_report = time_slice;
        }
    }
}
