/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

extern crate proc_macro;

use syn::{DeriveInput, parse_macro_input};

mod app_metrics;

/// Implements `appmetrics::PopulateMetrics` and `appmetrics::MetricsHolder`
/// for a struct with `#[metric(name = "...", sample = "...")]` fields.
#[proc_macro_derive(AppMetrics, attributes(metric))]
pub fn app_metrics(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let expanded = app_metrics::derive(input);
    proc_macro::TokenStream::from(expanded)
}
