/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;
use std::time::Duration;

use crate::{StatsdClient, StatsdMetricsSink};

#[cfg(feature = "yaml")]
mod yaml;

const UDP_DEFAULT_PORT: u16 = 8125;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsdBackend {
    Udp(SocketAddr, Option<IpAddr>),
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Default for StatsdBackend {
    fn default() -> Self {
        StatsdBackend::Udp(
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), UDP_DEFAULT_PORT),
            None,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsdClientConfig {
    backend: StatsdBackend,
    prefix: String,
    tags: BTreeMap<String, String>,
    tag_values: Vec<String>,
    pub cache_size: usize,
    pub max_segment_size: Option<usize>,
    pub emit_interval: Duration,
}

impl Default for StatsdClientConfig {
    fn default() -> Self {
        StatsdClientConfig::with_prefix(String::new())
    }
}

impl StatsdClientConfig {
    pub fn with_prefix<T: Into<String>>(prefix: T) -> Self {
        StatsdClientConfig {
            backend: StatsdBackend::default(),
            prefix: prefix.into(),
            tags: BTreeMap::new(),
            tag_values: Vec::new(),
            cache_size: 1024,
            max_segment_size: None,
            emit_interval: Duration::from_secs(10),
        }
    }

    pub fn set_backend(&mut self, target: StatsdBackend) {
        self.backend = target;
    }

    pub fn set_prefix<T: Into<String>>(&mut self, prefix: T) {
        self.prefix = prefix.into();
    }

    pub fn add_tag<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.tags.insert(key.into(), value.into());
    }

    /// Adds a verbatim global tag, which may have no value.
    pub fn add_tag_value<T: Into<String>>(&mut self, value: T) {
        self.tag_values.push(value.into());
    }

    #[inline]
    pub fn backend(&self) -> &StatsdBackend {
        &self.backend
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    #[inline]
    pub fn tag_values(&self) -> &[String] {
        &self.tag_values
    }

    fn with_global_tags(&self, client: StatsdClient) -> StatsdClient {
        self.tag_values
            .iter()
            .fold(client.with_static_tags(&self.tags), |client, v| {
                client.with_tag_value(v)
            })
    }

    pub fn build(&self) -> io::Result<StatsdClient> {
        let sink = match &self.backend {
            StatsdBackend::Udp(addr, bind) => {
                let bind_ip = bind.unwrap_or(match addr {
                    SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
                });
                let socket = UdpSocket::bind(SocketAddr::new(bind_ip, 0))?;
                socket.set_nonblocking(true)?;
                StatsdMetricsSink::udp_with_capacity(
                    *addr,
                    socket,
                    self.cache_size,
                    self.max_segment_size,
                )
            }
            #[cfg(unix)]
            StatsdBackend::Unix(path) => {
                let socket = UnixDatagram::unbound()?;
                socket.set_nonblocking(true)?;
                StatsdMetricsSink::unix_with_capacity(
                    path.clone(),
                    socket,
                    self.cache_size,
                    self.max_segment_size,
                )
            }
        };

        let client = StatsdClient::new(self.prefix.clone(), sink);
        Ok(self.with_global_tags(client))
    }
}
