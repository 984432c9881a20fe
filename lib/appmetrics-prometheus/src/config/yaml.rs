/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::CollectorConfig;

impl CollectorConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = CollectorConfig::default();
            appmetrics_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'prometheus collector config' should be 'map'"
            ))
        }
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match appmetrics_yaml::key::normalize(k).as_str() {
            "labels" | "static_labels" => {
                self.labels = appmetrics_yaml::value::as_static_tags(v)
                    .context(format!("invalid static labels value for key {k}"))?;
            }
            "histogram_quantiles" => {
                self.histogram_quantiles = appmetrics_yaml::value::as_quantile_list(v)
                    .context(format!("invalid quantile list value for key {k}"))?;
            }
            "timer_quantiles" => {
                self.timer_quantiles = appmetrics_yaml::value::as_quantile_list(v)
                    .context(format!("invalid quantile list value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}
