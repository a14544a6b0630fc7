// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ServiceAccount mirror rules: image pull secrets and the automount flag are
//! inherited; locally issued token secrets are preserved.

use crate::config::Config;
use crate::constants::labels;
use crate::error::Result;
use crate::mirror::engine::{mirror_metadata, Mirrorable};
use k8s_openapi::api::core::v1::{ObjectReference, ServiceAccount};
use kube::ResourceExt;
use std::time::Duration;

impl Mirrorable for ServiceAccount {
    const KIND: &'static str = "ServiceAccount";
    const MARKER_LABEL: &'static str = labels::CONFIG;
    const MARKER_VALUE: &'static str = labels::SERVICE_ACCOUNT;

    fn requeue_after(config: &Config) -> Duration {
        config.service_account_requeue
    }

    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self> {
        // Token secrets ("<name>-token...") are issued by the cluster per
        // namespace: the mirror keeps its own, and never inherits the base's.
        let mut secrets = shift_token_secrets(base);
        if let Some(existing) = existing {
            secrets.extend(extract_token_secrets(existing));
        }

        Ok(ServiceAccount {
            metadata: mirror_metadata(
                existing.map(|e| &e.metadata),
                &base.metadata,
                target_namespace,
            ),
            automount_service_account_token: base.automount_service_account_token,
            image_pull_secrets: base.image_pull_secrets.clone(),
            secrets: Some(secrets),
        })
    }
}

fn token_prefix(service_account: &ServiceAccount) -> String {
    format!("{}-token", service_account.name_any())
}

/// The secret entries issued to this service account by the cluster
fn extract_token_secrets(service_account: &ServiceAccount) -> Vec<ObjectReference> {
    let prefix = token_prefix(service_account);
    service_account
        .secrets
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter(|s| s.name.as_deref().is_some_and(|n| n.starts_with(&prefix)))
        .collect()
}

/// The secret entries with the token entries shifted out
fn shift_token_secrets(service_account: &ServiceAccount) -> Vec<ObjectReference> {
    let prefix = token_prefix(service_account);
    service_account
        .secrets
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter(|s| !s.name.as_deref().is_some_and(|n| n.starts_with(&prefix)))
        .collect()
}
