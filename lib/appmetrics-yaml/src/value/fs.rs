/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_absolute_path(v: &Yaml) -> anyhow::Result<PathBuf> {
    if let Yaml::String(path) = v {
        let path = PathBuf::from(path);
        if path.is_relative() {
            return Err(anyhow!(
                "invalid value: {} is not an absolute path",
                path.display()
            ));
        }
        Ok(path)
    } else {
        Err(anyhow!(
            "yaml value type for absolute path should be string"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn t_absolute_path() {
        let v = Yaml::String("/var/run/statsd.sock".to_string());
        assert_eq!(
            as_absolute_path(&v).unwrap(),
            PathBuf::from("/var/run/statsd.sock")
        );

        let v = Yaml::String("statsd.sock".to_string());
        assert!(as_absolute_path(&v).is_err());

        assert!(as_absolute_path(&Yaml::Null).is_err());
    }
}
