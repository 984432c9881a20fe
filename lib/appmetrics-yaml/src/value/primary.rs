/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

pub fn as_f64(v: &Yaml) -> anyhow::Result<f64> {
    match v {
        Yaml::String(s) => Ok(f64::from_str(s)?),
        Yaml::Integer(i) => Ok(*i as f64),
        Yaml::Real(s) => Ok(f64::from_str(s)?),
        _ => Err(anyhow!(
            "yaml value type for 'f64' should be 'string', 'integer' or 'real'"
        )),
    }
}

pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}

/// Converts a yaml array, or a single value, to a list.
pub fn as_list<T, F>(v: &Yaml, convert: F) -> anyhow::Result<Vec<T>>
where
    F: Fn(&Yaml) -> anyhow::Result<T>,
{
    match v {
        Yaml::Array(seq) => {
            let mut vec = Vec::with_capacity(seq.len());
            for (i, v) in seq.iter().enumerate() {
                let node = convert(v).context(format!("invalid value for list element #{i}"))?;
                vec.push(node);
            }
            Ok(vec)
        }
        _ => {
            let node = convert(v)?;
            Ok(vec![node])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_f64() {
        assert_eq!(as_f64(&Yaml::Real("0.95".to_string())).unwrap(), 0.95);
        assert_eq!(as_f64(&Yaml::Integer(1)).unwrap(), 1.0);
        assert_eq!(as_f64(&Yaml::String("0.5".to_string())).unwrap(), 0.5);
        assert!(as_f64(&Yaml::String("half".to_string())).is_err());
        assert!(as_f64(&Yaml::Boolean(true)).is_err());
    }

    #[test]
    fn t_string() {
        assert_eq!(as_string(&Yaml::String("abc".to_string())).unwrap(), "abc");
        assert_eq!(as_string(&Yaml::Integer(123)).unwrap(), "123");
        assert_eq!(as_string(&Yaml::Real("1.5".to_string())).unwrap(), "1.5");
        assert!(as_string(&Yaml::Null).is_err());
    }

    #[test]
    fn t_list() {
        let v = Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(2)]);
        assert_eq!(as_list(&v, as_f64).unwrap(), vec![1.0, 2.0]);

        let v = Yaml::Integer(3);
        assert_eq!(as_list(&v, as_f64).unwrap(), vec![3.0]);

        let v = Yaml::Array(vec![Yaml::Integer(1), Yaml::Null]);
        assert!(as_list(&v, as_f64).is_err());
    }
}
