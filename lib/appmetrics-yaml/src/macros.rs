/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Loads the first document of a yaml string. For use in tests, the caller
/// should import `yaml_rust::YamlLoader`.
#[macro_export]
macro_rules! yaml_doc {
    ($s:expr) => {
        YamlLoader::load_from_str($s).unwrap().remove(0)
    };
}
