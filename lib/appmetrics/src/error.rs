/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use appmetrics_registry::{MetricKind, SampleKind};

#[derive(Debug, Error, PartialEq)]
pub enum SampleSpecError {
    #[error("invalid sample type {0}")]
    UnknownType(String),
    #[error("invalid {0} sample: unexpected number of arguments")]
    InvalidArguments(SampleKind),
    #[error("invalid {0} sample: reservoir: {1}")]
    InvalidReservoirSize(SampleKind, String),
    #[error("invalid {0} sample: alpha: {1}")]
    InvalidAlpha(SampleKind, String),
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("field {field}: metric declared on non-metric type {type_name}")]
    InvalidFieldKind { field: String, type_name: String },
    #[error("field {field}: {accessor}: compute function does not exist")]
    MissingComputeFunction { field: String, accessor: String },
    #[error("field {field}: {accessor}: compute function must return a value of type {expected}")]
    ComputeFunctionWrongSignature {
        field: String,
        accessor: String,
        expected: &'static str,
    },
    #[error("field {field}: tagged {kind} is not supported")]
    TaggedFunctionalGaugeUnsupported { field: String, kind: MetricKind },
    #[error("field {field}: invalid sample spec: {source}")]
    InvalidSampleSpec {
        field: String,
        #[source]
        source: SampleSpecError,
    },
}

impl DefinitionError {
    /// The name of the field with the bad definition.
    pub fn field(&self) -> &str {
        match self {
            DefinitionError::InvalidFieldKind { field, .. }
            | DefinitionError::MissingComputeFunction { field, .. }
            | DefinitionError::ComputeFunctionWrongSignature { field, .. }
            | DefinitionError::TaggedFunctionalGaugeUnsupported { field, .. }
            | DefinitionError::InvalidSampleSpec { field, .. } => field,
        }
    }
}
