/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_f64, as_list, as_string};

mod net;
pub use net::{as_ipaddr, as_sockaddr};

mod fs;
pub use fs::as_absolute_path;

mod metrics;
pub use metrics::{as_quantile_list, as_static_tags, as_tag_list};
