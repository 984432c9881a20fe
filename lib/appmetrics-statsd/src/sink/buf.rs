/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex, PoisonError};

use super::SinkBuf;

const DEFAULT_MAX_SEGMENT_SIZE: usize = 1432;

/// In-memory datagram capture, for use in tests.
#[derive(Clone, Debug)]
pub struct StatsdBuffer {
    datagrams: Arc<Mutex<Vec<String>>>,
    max_segment_size: usize,
}

impl Default for StatsdBuffer {
    fn default() -> Self {
        StatsdBuffer::new(DEFAULT_MAX_SEGMENT_SIZE)
    }
}

impl StatsdBuffer {
    pub fn new(max_segment_size: usize) -> Self {
        StatsdBuffer {
            datagrams: Arc::new(Mutex::new(Vec::new())),
            max_segment_size,
        }
    }

    pub(super) fn send_batch(&self, buf: &SinkBuf) {
        let mut datagrams = self
            .datagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for packet in buf.iter(self.max_segment_size) {
            datagrams.push(String::from_utf8_lossy(packet).into_owned());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.datagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Removes and returns the captured datagrams.
    pub fn take(&self) -> Vec<String> {
        let mut datagrams = self
            .datagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *datagrams)
    }

    /// Removes the captured datagrams and returns their messages.
    pub fn take_lines(&self) -> Vec<String> {
        self.take()
            .iter()
            .flat_map(|d| d.lines())
            .map(|l| l.to_string())
            .collect()
    }
}
