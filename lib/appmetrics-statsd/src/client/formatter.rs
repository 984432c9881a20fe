/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use itoa::Integer;
use ryu::Float;
use smallvec::SmallVec;

use super::StatsdClient;
use crate::StatsdTagGroup;

enum MetricType {
    Count,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Count => "c",
            MetricType::Gauge => "g",
        }
    }
}

pub struct MetricFormatter<'a> {
    client: &'a mut StatsdClient,
    metric_type: MetricType,
    name: &'a str,
    value: SmallVec<[u8; 24]>,
    common_tags: Option<&'a StatsdTagGroup>,
    local_tags: StatsdTagGroup,
}

impl StatsdClient {
    pub fn count<'a, T: Integer>(&'a mut self, name: &'a str, value: T) -> MetricFormatter<'a> {
        let mut buffer = itoa::Buffer::new();
        let value = buffer.format(value);
        self.metric_with_type(
            MetricType::Count,
            name,
            SmallVec::from_slice(value.as_bytes()),
        )
    }

    pub fn count_with_tags<'a, T: Integer>(
        &'a mut self,
        name: &'a str,
        value: T,
        common_tags: &'a StatsdTagGroup,
    ) -> MetricFormatter<'a> {
        self.count(name, value).with_tag_group(common_tags)
    }

    pub fn gauge<'a, T: Integer>(&'a mut self, name: &'a str, value: T) -> MetricFormatter<'a> {
        let mut buffer = itoa::Buffer::new();
        let value = buffer.format(value);
        self.metric_with_type(
            MetricType::Gauge,
            name,
            SmallVec::from_slice(value.as_bytes()),
        )
    }

    pub fn gauge_with_tags<'a, T: Integer>(
        &'a mut self,
        name: &'a str,
        value: T,
        common_tags: &'a StatsdTagGroup,
    ) -> MetricFormatter<'a> {
        self.gauge(name, value).with_tag_group(common_tags)
    }

    pub fn gauge_float<'a, T: Float>(&'a mut self, name: &'a str, value: T) -> MetricFormatter<'a> {
        let mut buffer = ryu::Buffer::new();
        let value = buffer.format(value);
        self.metric_with_type(
            MetricType::Gauge,
            name,
            SmallVec::from_slice(value.as_bytes()),
        )
    }

    pub fn gauge_float_with_tags<'a, T: Float>(
        &'a mut self,
        name: &'a str,
        value: T,
        common_tags: &'a StatsdTagGroup,
    ) -> MetricFormatter<'a> {
        self.gauge_float(name, value).with_tag_group(common_tags)
    }

    fn metric_with_type<'a>(
        &'a mut self,
        metric_type: MetricType,
        name: &'a str,
        value: SmallVec<[u8; 24]>,
    ) -> MetricFormatter<'a> {
        MetricFormatter {
            client: self,
            metric_type,
            name,
            value,
            common_tags: None,
            local_tags: StatsdTagGroup::default(),
        }
    }
}

impl<'a> MetricFormatter<'a> {
    fn with_tag_group(mut self, tags: &'a StatsdTagGroup) -> Self {
        if tags.len() > 0 {
            self.common_tags = Some(tags);
        }
        self
    }

    pub fn with_tag<T: AsRef<str>>(mut self, key: &str, value: T) -> Self {
        self.local_tags.add_tag(key, value);
        self
    }

    pub fn with_tag_value<T: AsRef<str>>(mut self, value: T) -> Self {
        self.local_tags.add_tag_value(value);
        self
    }

    pub fn send(self) {
        let MetricFormatter {
            client,
            metric_type,
            name,
            value,
            common_tags,
            local_tags,
        } = self;

        let r = client.sink.emit(|buf| {
            if !client.prefix.is_empty() {
                buf.extend_from_slice(client.prefix.as_bytes());
                buf.push(b'.');
            }
            buf.extend_from_slice(name.as_bytes());
            buf.push(b':');
            buf.extend_from_slice(value.as_slice());
            buf.push(b'|');
            buf.extend_from_slice(metric_type.as_str().as_bytes());

            let mut append_tags = false;
            for tags in [Some(&client.tags), common_tags, Some(&local_tags)]
                .into_iter()
                .flatten()
            {
                if tags.len() == 0 {
                    continue;
                }
                if append_tags {
                    buf.push(b',');
                } else {
                    buf.extend_from_slice(b"|#");
                    append_tags = true;
                }
                buf.extend_from_slice(tags.as_bytes());
            }

            buf.push(b'\n');
        });
        if let Err(e) = r {
            client.handle_emit_error(e);
        }
    }
}
