// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Role mirror rules: policy rules are fully inherited.

use crate::config::Config;
use crate::constants::labels;
use crate::error::Result;
use crate::mirror::engine::{mirror_metadata, Mirrorable};
use k8s_openapi::api::rbac::v1::Role;
use std::time::Duration;

impl Mirrorable for Role {
    const KIND: &'static str = "Role";
    const MARKER_LABEL: &'static str = labels::RBAC;
    const MARKER_VALUE: &'static str = labels::ROLE;

    fn requeue_after(config: &Config) -> Duration {
        config.role_requeue
    }

    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self> {
        Ok(Role {
            metadata: mirror_metadata(
                existing.map(|e| &e.metadata),
                &base.metadata,
                target_namespace,
            ),
            rules: base.rules.clone(),
        })
    }
}
