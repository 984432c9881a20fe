/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

fn check_tag_chars(s: &str) -> anyhow::Result<()> {
    if s.is_empty() {
        return Err(anyhow!("empty string"));
    }
    for c in s.chars() {
        if c.is_ascii() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '/' => {}
                _ => return Err(anyhow!("invalid char {c:?}")),
            }
        } else if !c.is_alphanumeric() {
            return Err(anyhow!("non alphanumeric char {c:?}"));
        }
    }
    Ok(())
}

/// Parses a map of static metrics tags.
pub fn as_static_tags(v: &Yaml) -> anyhow::Result<BTreeMap<String, String>> {
    if let Yaml::Hash(map) = v {
        let mut tags = BTreeMap::new();
        crate::foreach_kv(map, |k, v| {
            check_tag_chars(k).context("invalid metrics tag name")?;
            let value = crate::value::as_string(v).context("invalid metrics tag yaml value")?;
            check_tag_chars(&value).context("invalid metrics tag value")?;

            if tags.insert(k.to_string(), value).is_some() {
                Err(anyhow!("found duplicate value for tag name {k}"))
            } else {
                Ok(())
            }
        })?;
        Ok(tags)
    } else {
        Err(anyhow!(
            "the yaml value type for 'static metric tags' should be 'map'"
        ))
    }
}

/// Parses a list of verbatim tags, each either `name` or `name:value`.
pub fn as_tag_list(v: &Yaml) -> anyhow::Result<Vec<String>> {
    crate::value::as_list(v, |v| {
        let tag = crate::value::as_string(v)?;
        match tag.split_once(':') {
            Some((name, value)) => {
                check_tag_chars(name).context("invalid metrics tag name")?;
                check_tag_chars(value).context("invalid metrics tag value")?;
            }
            None => check_tag_chars(&tag).context("invalid metrics tag name")?,
        }
        Ok(tag)
    })
}

/// Parses a list of quantiles, each within [0, 1].
pub fn as_quantile_list(v: &Yaml) -> anyhow::Result<Vec<f64>> {
    crate::value::as_list(v, |v| {
        let q = crate::value::as_f64(v)?;
        if (0.0..=1.0).contains(&q) {
            Ok(q)
        } else {
            Err(anyhow!("quantile {q} is out of range [0, 1]"))
        }
    })
}
