/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_sockaddr(v: &Yaml) -> anyhow::Result<SocketAddr> {
    if let Yaml::String(s) = v {
        SocketAddr::from_str(s).map_err(|e| anyhow!("invalid socket address: {e}"))
    } else {
        Err(anyhow!(
            "yaml value type for 'SocketAddr' should be 'string'"
        ))
    }
}

pub fn as_ipaddr(v: &Yaml) -> anyhow::Result<IpAddr> {
    if let Yaml::String(s) = v {
        IpAddr::from_str(s).map_err(|e| anyhow!("invalid ip address: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'IpAddr' should be 'string'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn t_sockaddr() {
        let v = Yaml::String("127.0.0.1:8125".to_string());
        assert_eq!(
            as_sockaddr(&v).unwrap(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8125)
        );

        let v = Yaml::String("[::1]:8125".to_string());
        assert!(as_sockaddr(&v).unwrap().is_ipv6());

        let v = Yaml::String("127.0.0.1".to_string());
        assert!(as_sockaddr(&v).is_err());

        let v = Yaml::Integer(8125);
        assert!(as_sockaddr(&v).is_err());
    }

    #[test]
    fn t_ipaddr() {
        let v = Yaml::String("0.0.0.0".to_string());
        assert_eq!(as_ipaddr(&v).unwrap(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let v = Yaml::String("localhost".to_string());
        assert!(as_ipaddr(&v).is_err());
    }
}
