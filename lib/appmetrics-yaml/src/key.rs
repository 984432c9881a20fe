/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("Emit-Interval"), "emit_interval");
        assert_eq!(normalize("CACHE_SIZE"), "cache_size");
        assert_eq!(normalize("histogram-Quantiles"), "histogram_quantiles");
    }
}
