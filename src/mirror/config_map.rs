// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ConfigMap mirror rules: data and binary data are fully inherited.

use crate::config::Config;
use crate::constants::labels;
use crate::error::Result;
use crate::mirror::engine::{mirror_metadata, Mirrorable};
use k8s_openapi::api::core::v1::ConfigMap;
use std::time::Duration;

impl Mirrorable for ConfigMap {
    const KIND: &'static str = "ConfigMap";
    const MARKER_LABEL: &'static str = labels::CONFIG;
    const MARKER_VALUE: &'static str = labels::RUNTIME;

    fn requeue_after(config: &Config) -> Duration {
        config.config_map_requeue
    }

    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self> {
        Ok(ConfigMap {
            metadata: mirror_metadata(
                existing.map(|e| &e.metadata),
                &base.metadata,
                target_namespace,
            ),
            data: base.data.clone(),
            binary_data: base.binary_data.clone(),
            ..existing.cloned().unwrap_or_default()
        })
    }
}
