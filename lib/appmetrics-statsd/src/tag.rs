/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;

/// Pre-formatted DogStatsD tags, joined by `,`.
#[derive(Clone, Debug, Default)]
pub struct StatsdTagGroup {
    buf: Vec<u8>,
}

impl StatsdTagGroup {
    pub fn add_tag<T: AsRef<str>>(&mut self, key: &str, value: T) {
        if !self.buf.is_empty() {
            self.buf.push(b',');
        }
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.push(b':');
        self.buf.extend_from_slice(value.as_ref().as_bytes());
    }

    pub fn add_static_tags(&mut self, tags: &BTreeMap<String, String>) {
        for (k, v) in tags {
            self.add_tag(k, v);
        }
    }

    pub fn add_tag_value<T: AsRef<str>>(&mut self, value: T) {
        if !self.buf.is_empty() {
            self.buf.push(b',');
        }
        self.buf.extend_from_slice(value.as_ref().as_bytes());
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join() {
        let mut tags = StatsdTagGroup::default();
        tags.add_tag("env", "test");
        tags.add_tag_value("canary");
        tags.add_tag_value("role:server");
        assert_eq!(tags.as_bytes(), b"env:test,canary,role:server");

        tags.clear();
        assert_eq!(tags.len(), 0);
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());
        tags.add_static_tags(&map);
        assert_eq!(tags.as_bytes(), b"a:1,b:2");
    }
}
