/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Name rewriting for the Prometheus data model.
//!
//! Every run of unsupported characters becomes a single `_`. Leading `_` are
//! trimmed, and a leading digit gets a `_` prefix.

fn sanitize<F>(raw: &str, valid: F) -> String
where
    F: Fn(char) -> bool,
{
    let mut s = String::with_capacity(raw.len());
    let mut in_invalid = false;
    for c in raw.chars() {
        if valid(c) {
            s.push(c);
            in_invalid = false;
        } else if !in_invalid {
            s.push('_');
            in_invalid = true;
        }
    }

    let s = s.trim_start_matches('_');
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{s}")
    } else {
        s.to_string()
    }
}

/// Allowed chars are `[a-zA-Z0-9_:]`. May return an empty string.
pub fn metric_name(raw: &str) -> String {
    sanitize(raw, |c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Allowed chars are `[a-zA-Z0-9_]`. May return an empty string.
pub fn label_name(raw: &str) -> String {
    sanitize(raw, |c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric() {
        assert_eq!(metric_name("requests"), "requests");
        assert_eq!(metric_name("server.requests.total"), "server_requests_total");
        assert_eq!(metric_name("ns:requests"), "ns:requests");
        assert_eq!(
            metric_name("> invalid metric names! are ~~fun~~ ☃️"),
            "invalid_metric_names_are_fun_"
        );
        assert_eq!(metric_name("__internal"), "internal");
        assert_eq!(metric_name("5xx.count"), "_5xx_count");
        assert_eq!(metric_name("!!!"), "");
    }

    #[test]
    fn label() {
        assert_eq!(label_name("subsystem"), "subsystem");
        assert_eq!(label_name("http.status"), "http_status");
        assert_eq!(label_name("ns:key"), "ns_key");
        assert_eq!(label_name("__name__"), "name__");
        assert_eq!(label_name("1st"), "_1st");
    }
}
