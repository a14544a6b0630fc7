// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace eligibility policy

use crate::config::Config;
use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tracing::debug;

/// Check whether mirrors may be written into a namespace: it must not be the
/// base namespace, not be explicitly excluded, and not be terminating.
pub fn is_eligible_namespace(namespace: &Namespace, config: &Config) -> bool {
    let name = namespace.name_any();
    if name == config.base_namespace {
        return false;
    }
    if config.excluded_namespaces.iter().any(|ex| *ex == name) {
        return false;
    }
    let terminating = namespace
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        == Some("Terminating");
    !terminating
}

/// List the names of all namespaces that may currently receive mirrors.
/// The eligible set is recomputed on every call; API list order is preserved.
pub async fn list_eligible_namespaces(client: &Client, config: &Config) -> Result<Vec<String>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let list = namespaces.list(&ListParams::default()).await?;

    let eligible: Vec<String> = list
        .items
        .into_iter()
        .filter(|ns| is_eligible_namespace(ns, config))
        .map(|ns| ns.name_any())
        .collect();

    debug!("Found {} eligible namespaces", eligible.len());
    Ok(eligible)
}
