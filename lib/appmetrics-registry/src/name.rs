/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! The tag suffix grammar used for registry keys:
//!
//!   baseName[tag1,tag2:value2,...]
//!
//! Tags are plain values or `key:value` pairs. A name that does not end with
//! `]`, or has no `[`, carries no tags.

const TAGS_START: char = '[';
const TAGS_END: char = ']';
const TAGS_DELIMITER: char = ',';

/// Trims every tag, drops the empty ones, then sorts and deduplicates the rest.
pub fn clean_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut clean: Vec<String> = tags
        .into_iter()
        .filter_map(|t| {
            let t = t.as_ref().trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .collect();
    clean.sort_unstable();
    clean.dedup();
    clean
}

/// Appends the tag suffix to `base`. The tags should already be cleaned.
pub fn join_tagged_name<S: AsRef<str>>(base: &str, tags: &[S]) -> String {
    if tags.is_empty() {
        return base.to_string();
    }

    let len = tags.iter().map(|t| t.as_ref().len() + 1).sum::<usize>();
    let mut name = String::with_capacity(base.len() + len + 1);
    name.push_str(base);
    name.push(TAGS_START);
    for (i, t) in tags.iter().enumerate() {
        if i > 0 {
            name.push(TAGS_DELIMITER);
        }
        name.push_str(t.as_ref());
    }
    name.push(TAGS_END);
    name
}

/// Splits a registry key into its base name and sorted tag list.
///
/// Malformed names are returned whole with no tags.
pub fn split_tagged_name(name: &str) -> (&str, Vec<&str>) {
    let Some(start) = name.find(TAGS_START) else {
        return (name, Vec::new());
    };
    let Some(inner) = name[start + 1..].strip_suffix(TAGS_END) else {
        return (name, Vec::new());
    };

    let mut tags = inner
        .split(TAGS_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    tags.sort_unstable();
    (&name[..start], tags)
}

/// Splits a single tag into its key and value, if it has a value.
pub fn split_tag_pair(tag: &str) -> Option<(&str, &str)> {
    tag.split_once(':')
}
