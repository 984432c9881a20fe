/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

/// Parses a humanized duration like `10s` or `1h2m`. A bare number is seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                if let Ok(u) = u64::from_str(value) {
                    Ok(Duration::from_secs(u))
                } else if let Ok(f) = f64::from_str(value) {
                    Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
                } else {
                    Err(anyhow!("invalid duration string"))
                }
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            let u = u64::try_from(*value).map_err(|_| anyhow!("negative duration value"))?;
            Ok(Duration::from_secs(u))
        }
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid f64 value: {e}"))?;
            Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer' or 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_duration() {
        let v = Yaml::String("10s".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(10));

        let v = Yaml::String("1h2m".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(3600 + 120));

        let v = Yaml::String("500ms".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(500));

        let v = Yaml::String("30".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(30));

        let v = Yaml::String("-1000h".to_string());
        assert!(as_duration(&v).is_err());

        let v = Yaml::Integer(60);
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(60));

        let v = Yaml::Integer(-1);
        assert!(as_duration(&v).is_err());

        let v = Yaml::Real("1.5".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(1500));

        let v = Yaml::Array(vec![Yaml::Integer(1)]);
        assert!(as_duration(&v).is_err());
    }
}
