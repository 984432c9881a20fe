/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use appmetrics_registry::{Sample, SampleKind};

use crate::SampleSpecError;

pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;
pub const DEFAULT_EXP_DECAY_ALPHA: f64 = 0.015;

/// How to build the reservoir sample of a histogram or a timer.
///
/// The text form is `uniform[,<reservoirSize>]` or
/// `expdecay[,<reservoirSize>,<alpha>]`, case-insensitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleSpec {
    Uniform { reservoir_size: usize },
    ExpDecay { reservoir_size: usize, alpha: f64 },
}

impl Default for SampleSpec {
    fn default() -> Self {
        SampleSpec::ExpDecay {
            reservoir_size: DEFAULT_RESERVOIR_SIZE,
            alpha: DEFAULT_EXP_DECAY_ALPHA,
        }
    }
}

impl SampleSpec {
    pub fn kind(&self) -> SampleKind {
        match self {
            SampleSpec::Uniform { .. } => SampleKind::Uniform,
            SampleSpec::ExpDecay { .. } => SampleKind::ExpDecay,
        }
    }

    pub fn reservoir_size(&self) -> usize {
        match self {
            SampleSpec::Uniform { reservoir_size } => *reservoir_size,
            SampleSpec::ExpDecay { reservoir_size, .. } => *reservoir_size,
        }
    }

    /// Creates a new empty sample.
    pub fn build(&self) -> Sample {
        match self {
            SampleSpec::Uniform { reservoir_size } => Sample::uniform(*reservoir_size),
            SampleSpec::ExpDecay {
                reservoir_size,
                alpha,
            } => Sample::exp_decay(*reservoir_size, *alpha),
        }
    }
}

fn parse_reservoir_size(kind: SampleKind, s: &str) -> Result<usize, SampleSpecError> {
    match usize::from_str(s) {
        Ok(0) => Err(SampleSpecError::InvalidReservoirSize(
            kind,
            "should be greater than 0".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(SampleSpecError::InvalidReservoirSize(kind, e.to_string())),
    }
}

fn parse_alpha(s: &str) -> Result<f64, SampleSpecError> {
    let kind = SampleKind::ExpDecay;
    match f64::from_str(s) {
        Ok(alpha) if alpha.is_finite() && alpha > 0.0 => Ok(alpha),
        Ok(_) => Err(SampleSpecError::InvalidAlpha(
            kind,
            "should be a finite number greater than 0".to_string(),
        )),
        Err(e) => Err(SampleSpecError::InvalidAlpha(kind, e.to_string())),
    }
}

impl FromStr for SampleSpec {
    type Err = SampleSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let parts = lower.split(',').map(str::trim).collect::<Vec<_>>();
        match parts[0] {
            "uniform" => {
                let kind = SampleKind::Uniform;
                match parts.len() {
                    1 => Ok(SampleSpec::Uniform {
                        reservoir_size: DEFAULT_RESERVOIR_SIZE,
                    }),
                    2 => Ok(SampleSpec::Uniform {
                        reservoir_size: parse_reservoir_size(kind, parts[1])?,
                    }),
                    _ => Err(SampleSpecError::InvalidArguments(kind)),
                }
            }
            "expdecay" => {
                let kind = SampleKind::ExpDecay;
                match parts.len() {
                    1 => Ok(SampleSpec::default()),
                    3 => Ok(SampleSpec::ExpDecay {
                        reservoir_size: parse_reservoir_size(kind, parts[1])?,
                        alpha: parse_alpha(parts[2])?,
                    }),
                    _ => Err(SampleSpecError::InvalidArguments(kind)),
                }
            }
            _ => Err(SampleSpecError::UnknownType(parts[0].to_string())),
        }
    }
}

impl fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSpec::Uniform { reservoir_size } => write!(f, "uniform,{reservoir_size}"),
            SampleSpec::ExpDecay {
                reservoir_size,
                alpha,
            } => write!(f, "expdecay,{reservoir_size},{alpha}"),
        }
    }
}
