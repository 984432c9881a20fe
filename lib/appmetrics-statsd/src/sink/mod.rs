/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{SocketAddr, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;

mod buf;
pub use buf::StatsdBuffer;

mod udp;
use udp::UdpMetricsSink;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix::UnixMetricsSink;

/// Newline terminated messages waiting to be sent.
#[derive(Default)]
pub(super) struct SinkBuf {
    buf: Vec<u8>,
}

impl SinkBuf {
    fn with_capacity(capacity: usize) -> Self {
        SinkBuf {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn clear(&mut self) {
        self.buf.clear();
    }

    /// Splits into datagrams of whole messages, each no longer than
    /// `max_segment_size` unless a single message is already longer.
    pub(super) fn iter(&self, max_segment_size: usize) -> SegmentIter<'_> {
        SegmentIter {
            rest: &self.buf,
            max_segment_size,
        }
    }
}

pub(super) struct SegmentIter<'a> {
    rest: &'a [u8],
    max_segment_size: usize,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut end: Option<usize> = None;
        let mut next = 0;
        while next < self.rest.len() {
            let line_end = self.rest[next..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|p| next + p)
                .unwrap_or(self.rest.len());
            if end.is_some() && line_end > self.max_segment_size {
                break;
            }
            end = Some(line_end);
            next = line_end + 1;
        }

        let end = end.unwrap_or(self.rest.len());
        let packet = &self.rest[..end];
        self.rest = &self.rest[next.min(self.rest.len())..];
        Some(packet)
    }
}

enum MetricsSinkIo {
    Buf(StatsdBuffer),
    Udp(UdpMetricsSink),
    #[cfg(unix)]
    Unix(UnixMetricsSink),
}

impl MetricsSinkIo {
    fn send_batch(&self, buf: &SinkBuf) -> io::Result<()> {
        match self {
            MetricsSinkIo::Buf(b) => {
                b.send_batch(buf);
                Ok(())
            }
            MetricsSinkIo::Udp(s) => s.send_batch(buf),
            #[cfg(unix)]
            MetricsSinkIo::Unix(s) => s.send_batch(buf),
        }
    }
}

pub(crate) struct StatsdMetricsSink {
    cache_size: usize,
    buf: SinkBuf,
    io: MetricsSinkIo,
}

impl StatsdMetricsSink {
    pub(crate) fn buf_with_capacity(buf: StatsdBuffer, cache_size: usize) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: SinkBuf::with_capacity(cache_size),
            io: MetricsSinkIo::Buf(buf),
        }
    }

    pub(crate) fn udp_with_capacity(
        addr: SocketAddr,
        socket: UdpSocket,
        cache_size: usize,
        max_segment_size: Option<usize>,
    ) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: SinkBuf::with_capacity(cache_size),
            io: MetricsSinkIo::Udp(UdpMetricsSink::new(addr, socket, max_segment_size)),
        }
    }

    #[cfg(unix)]
    pub(crate) fn unix_with_capacity(
        path: PathBuf,
        socket: UnixDatagram,
        cache_size: usize,
        max_segment_size: Option<usize>,
    ) -> Self {
        StatsdMetricsSink {
            cache_size,
            buf: SinkBuf::with_capacity(cache_size),
            io: MetricsSinkIo::Unix(UnixMetricsSink::new(path, socket, max_segment_size)),
        }
    }

    /// Appends one message, which `format` must terminate with a newline.
    pub(crate) fn emit<F>(&mut self, format: F) -> io::Result<()>
    where
        F: FnOnce(&mut Vec<u8>),
    {
        format(&mut self.buf.buf);
        if self.buf.len() >= self.cache_size {
            self.flush_buf()
        } else {
            Ok(())
        }
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        let r = self.io.send_batch(&self.buf);
        self.buf.clear();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(data: &[u8], max: usize) -> Vec<&[u8]> {
        SegmentIter {
            rest: data,
            max_segment_size: max,
        }
        .collect()
    }

    #[test]
    fn segment_single() {
        assert_eq!(segments(b"a:1|c\n", 16), vec![b"a:1|c".as_slice()]);
        assert!(segments(b"", 16).is_empty());
    }

    #[test]
    fn segment_join() {
        assert_eq!(
            segments(b"a:1|c\nb:2|c\n", 16),
            vec![b"a:1|c\nb:2|c".as_slice()]
        );
    }

    #[test]
    fn segment_split() {
        assert_eq!(
            segments(b"a:1|c\nb:2|c\nc:3|c\n", 12),
            vec![b"a:1|c\nb:2|c".as_slice(), b"c:3|c".as_slice()]
        );
        assert_eq!(
            segments(b"a:1|c\nb:2|c\n", 5),
            vec![b"a:1|c".as_slice(), b"b:2|c".as_slice()]
        );
    }

    #[test]
    fn segment_oversize() {
        assert_eq!(
            segments(b"long.name:1|c\nb:2|c\n", 8),
            vec![b"long.name:1|c".as_slice(), b"b:2|c".as_slice()]
        );
    }

    #[test]
    fn emit_flush_at_cache_size() {
        let buffer = StatsdBuffer::new(64);
        let mut sink = StatsdMetricsSink::buf_with_capacity(buffer.clone(), 10);
        sink.emit(|b| b.extend_from_slice(b"a:1|c\n")).unwrap();
        assert!(buffer.is_empty());
        sink.emit(|b| b.extend_from_slice(b"b:2|c\n")).unwrap();
        assert_eq!(buffer.take(), vec!["a:1|c\nb:2|c".to_string()]);
        sink.flush().unwrap();
        assert!(buffer.is_empty());
    }
}
