// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! RoleBinding mirror rules: the role reference is inherited and the single
//! subject is re-pointed at the target namespace.

use crate::config::Config;
use crate::constants::labels;
use crate::error::{MirrorError, Result};
use crate::mirror::engine::{mirror_metadata, Mirrorable};
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::ResourceExt;
use std::time::Duration;

impl Mirrorable for RoleBinding {
    const KIND: &'static str = "RoleBinding";
    const MARKER_LABEL: &'static str = labels::RBAC;
    const MARKER_VALUE: &'static str = labels::ROLE_BINDING;

    fn requeue_after(config: &Config) -> Duration {
        config.role_binding_requeue
    }

    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self> {
        // A base binding must point at exactly one subject; its namespace is
        // rewritten so the binding grants rights in the mirror's namespace,
        // never in the base's.
        let subjects = base.subjects.as_deref().unwrap_or_default();
        if subjects.len() != 1 {
            return Err(MirrorError::InvalidSubjectCount {
                name: base.name_any(),
                count: subjects.len(),
            });
        }

        let mut subject = subjects[0].clone();
        subject.namespace = Some(target_namespace.to_string());

        Ok(RoleBinding {
            metadata: mirror_metadata(
                existing.map(|e| &e.metadata),
                &base.metadata,
                target_namespace,
            ),
            role_ref: base.role_ref.clone(),
            subjects: Some(vec![subject]),
        })
    }
}
