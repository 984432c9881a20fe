/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

use log::warn;

#[cfg(feature = "yaml")]
mod yaml;

pub const DEFAULT_QUANTILES: [f64; 2] = [0.5, 0.95];

#[derive(Clone, Debug, PartialEq)]
pub struct CollectorConfig {
    labels: BTreeMap<String, String>,
    histogram_quantiles: Vec<f64>,
    timer_quantiles: Vec<f64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            labels: BTreeMap::new(),
            histogram_quantiles: DEFAULT_QUANTILES.to_vec(),
            timer_quantiles: DEFAULT_QUANTILES.to_vec(),
        }
    }
}

impl CollectorConfig {
    /// Adds static labels to every exposed series.
    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in labels {
            self.labels.insert(k.into(), v.into());
        }
        self
    }

    pub fn with_histogram_quantiles(mut self, quantiles: &[f64]) -> Self {
        self.histogram_quantiles = checked_quantiles(quantiles);
        self
    }

    pub fn with_timer_quantiles(mut self, quantiles: &[f64]) -> Self {
        self.timer_quantiles = checked_quantiles(quantiles);
        self
    }

    #[inline]
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    #[inline]
    pub fn histogram_quantiles(&self) -> &[f64] {
        &self.histogram_quantiles
    }

    #[inline]
    pub fn timer_quantiles(&self) -> &[f64] {
        &self.timer_quantiles
    }
}

fn checked_quantiles(quantiles: &[f64]) -> Vec<f64> {
    quantiles
        .iter()
        .copied()
        .filter(|q| {
            if (0.0..=1.0).contains(q) {
                true
            } else {
                warn!("quantile {q} is out of range [0, 1], ignored");
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        let config = CollectorConfig::default();
        assert!(config.labels().is_empty());
        assert_eq!(config.histogram_quantiles(), &[0.5, 0.95]);
        assert_eq!(config.timer_quantiles(), &[0.5, 0.95]);
    }

    #[test]
    fn builder() {
        let config = CollectorConfig::default()
            .with_labels([("env", "test")])
            .with_labels([("dc", "a"), ("env", "prod")])
            .with_histogram_quantiles(&[0.25, 0.5, 0.75])
            .with_timer_quantiles(&[0.99]);
        assert_eq!(config.labels().len(), 2);
        assert_eq!(config.labels().get("env").map(String::as_str), Some("prod"));
        assert_eq!(config.histogram_quantiles(), &[0.25, 0.5, 0.75]);
        assert_eq!(config.timer_quantiles(), &[0.99]);
    }

    #[test]
    fn out_of_range_quantiles() {
        let config = CollectorConfig::default().with_histogram_quantiles(&[-0.1, 0.0, 1.0, 1.5]);
        assert_eq!(config.histogram_quantiles(), &[0.0, 1.0]);

        let config = CollectorConfig::default().with_timer_quantiles(&[f64::NAN, 0.9]);
        assert_eq!(config.timer_quantiles(), &[0.9]);
    }
}
