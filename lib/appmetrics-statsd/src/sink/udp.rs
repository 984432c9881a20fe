/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{SocketAddr, UdpSocket};

use super::SinkBuf;

pub(super) struct UdpMetricsSink {
    addr: SocketAddr,
    socket: UdpSocket,
    max_segment_size: usize,
}

impl UdpMetricsSink {
    pub(super) fn new(addr: SocketAddr, socket: UdpSocket, max_segment_size: Option<usize>) -> Self {
        UdpMetricsSink {
            addr,
            socket,
            max_segment_size: max_segment_size.unwrap_or(1432),
        }
    }

    pub(super) fn send_batch(&self, buf: &SinkBuf) -> io::Result<()> {
        for packet in buf.iter(self.max_segment_size) {
            self.socket.send_to(packet, self.addr)?;
        }
        Ok(())
    }
}
