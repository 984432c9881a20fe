/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use appmetrics_registry::MetricKind;

use crate::{DefinitionError, SampleSpec};

/// The type of a metric field: a plain metric or a [Tagged](crate::Tagged) one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Plain(MetricKind),
    Tagged(MetricKind),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldKindError {
    #[error("unsupported metric type {0}")]
    Unsupported(String),
    #[error("functional gauge {0} can not be tagged")]
    TaggedFunctionalGauge(MetricKind),
}

impl FieldKind {
    pub fn metric_kind(&self) -> MetricKind {
        match self {
            FieldKind::Plain(k) | FieldKind::Tagged(k) => *k,
        }
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self, FieldKind::Tagged(_))
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path).trim()
}

impl FromStr for FieldKind {
    type Err = FieldKindError;

    /// Parses type names like `Counter`, `Tagged<Histogram>` or
    /// `appmetrics::Tagged<appmetrics::Timer>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unsupported = || FieldKindError::Unsupported(s.to_string());

        if let Some((outer, inner)) = s.strip_suffix('>').and_then(|s| s.split_once('<')) {
            if last_segment(outer) != "Tagged" {
                return Err(unsupported());
            }
            let kind = MetricKind::from_type_name(last_segment(inner)).ok_or_else(unsupported)?;
            if kind.is_functional() {
                return Err(FieldKindError::TaggedFunctionalGauge(kind));
            }
            Ok(FieldKind::Tagged(kind))
        } else {
            MetricKind::from_type_name(last_segment(s))
                .map(FieldKind::Plain)
                .ok_or_else(unsupported)
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Plain(k) => write!(f, "{k}"),
            FieldKind::Tagged(k) => write!(f, "Tagged<{k}>"),
        }
    }
}

/// The declaration of one metric field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricDecl {
    field: String,
    name: String,
    type_name: String,
    sample: Option<String>,
}

impl MetricDecl {
    pub fn new(field: &str, name: &str, type_name: &str) -> Self {
        MetricDecl {
            field: field.to_string(),
            name: name.to_string(),
            type_name: type_name.to_string(),
            sample: None,
        }
    }

    pub fn with_sample(mut self, sample: &str) -> Self {
        self.sample = Some(sample.to_string());
        self
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The registry key of this metric.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    pub fn kind(&self) -> Result<FieldKind, DefinitionError> {
        FieldKind::from_str(&self.type_name).map_err(|e| match e {
            FieldKindError::Unsupported(_) => DefinitionError::InvalidFieldKind {
                field: self.field.clone(),
                type_name: self.type_name.clone(),
            },
            FieldKindError::TaggedFunctionalGauge(kind) => {
                DefinitionError::TaggedFunctionalGaugeUnsupported {
                    field: self.field.clone(),
                    kind,
                }
            }
        })
    }

    /// The sample spec to use, or the default one if none is declared.
    ///
    /// The declared sample is ignored for kinds without a reservoir.
    pub fn sample_spec(&self) -> Result<SampleSpec, DefinitionError> {
        let kind = self.kind()?.metric_kind();
        match &self.sample {
            Some(s) if kind.is_sampled() => {
                SampleSpec::from_str(s).map_err(|source| DefinitionError::InvalidSampleSpec {
                    field: self.field.clone(),
                    source,
                })
            }
            _ => Ok(SampleSpec::default()),
        }
    }

    /// Checks the declaration without building anything.
    ///
    /// Compute accessors are resolved when populating, so they are not
    /// checked here.
    pub fn validate(&self) -> Result<FieldKind, DefinitionError> {
        let kind = self.kind()?;
        self.sample_spec()?;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!(
            FieldKind::from_str("Counter").unwrap(),
            FieldKind::Plain(MetricKind::Counter)
        );
        assert_eq!(
            FieldKind::from_str("appmetrics::GaugeFloat64").unwrap(),
            FieldKind::Plain(MetricKind::GaugeFloat64)
        );
        assert_eq!(
            FieldKind::from_str("Tagged<Histogram>").unwrap(),
            FieldKind::Tagged(MetricKind::Histogram)
        );
        assert_eq!(
            FieldKind::from_str(" appmetrics::Tagged< appmetrics::Timer > ").unwrap(),
            FieldKind::Tagged(MetricKind::Timer)
        );
        assert_eq!(
            FieldKind::from_str("Tagged<FunctionalGauge>").unwrap_err(),
            FieldKindError::TaggedFunctionalGauge(MetricKind::FunctionalGauge)
        );
        assert!(FieldKind::from_str("String").is_err());
        assert!(FieldKind::from_str("Vec<Counter>").is_err());
        assert!(FieldKind::from_str("Tagged<String>").is_err());
        assert!(FieldKind::from_str("Tagged<>").is_err());
    }

    #[test]
    fn kind_display() {
        for s in ["Meter", "Tagged<Gauge>"] {
            assert_eq!(FieldKind::from_str(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn validate() {
        let d = MetricDecl::new("latency", "server.latency", "Histogram").with_sample("uniform,100");
        assert_eq!(d.validate().unwrap(), FieldKind::Plain(MetricKind::Histogram));
        assert_eq!(
            d.sample_spec().unwrap(),
            SampleSpec::Uniform {
                reservoir_size: 100
            }
        );

        let d = MetricDecl::new("latency", "server.latency", "Tagged<Timer>");
        assert_eq!(d.sample_spec().unwrap(), SampleSpec::default());
    }

    #[test]
    fn validate_err() {
        let e = MetricDecl::new("name", "server.name", "String")
            .validate()
            .unwrap_err();
        assert!(matches!(e, DefinitionError::InvalidFieldKind { ref type_name, .. } if type_name == "String"));
        assert_eq!(e.field(), "name");

        let e = MetricDecl::new("queue", "server.queue", "Tagged<FunctionalGaugeFloat64>")
            .validate()
            .unwrap_err();
        assert!(matches!(
            e,
            DefinitionError::TaggedFunctionalGaugeUnsupported {
                kind: MetricKind::FunctionalGaugeFloat64,
                ..
            }
        ));

        let e = MetricDecl::new("latency", "server.latency", "Histogram")
            .with_sample("uniform,x")
            .validate()
            .unwrap_err();
        assert!(matches!(e, DefinitionError::InvalidSampleSpec { .. }));
    }

    #[test]
    fn sample_ignored_on_unsampled_kinds() {
        for type_name in ["Meter", "Counter", "Tagged<Gauge>"] {
            let d = MetricDecl::new("requests", "server.requests", type_name)
                .with_sample("uniform,100");
            assert!(d.validate().is_ok(), "{type_name}");
            assert_eq!(d.sample_spec().unwrap(), SampleSpec::default());
        }

        let d = MetricDecl::new("rate", "server.rate", "Meter").with_sample("sliding");
        assert!(d.validate().is_ok());
    }
}
