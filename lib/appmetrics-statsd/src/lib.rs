/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod sink;
use sink::StatsdMetricsSink;
pub use sink::StatsdBuffer;

mod client;
pub use client::StatsdClient;

mod tag;
pub use tag::StatsdTagGroup;

mod config;
pub use config::{StatsdBackend, StatsdClientConfig};

mod emitter;
pub use emitter::{StatsdEmitter, start_emitter};
