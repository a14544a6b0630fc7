// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret reconciler - propagation plus a finalizer-gated deletion guard:
//! a base Secret may only go away after its mirrors have been removed.

use crate::config::Config;
use crate::constants::{labels, SECRET_FINALIZER};
use crate::error::{MirrorError, Result};
use crate::kubernetes::list_eligible_namespaces;
use crate::mirror::{is_base, propagate_to_namespaces, Mirrorable};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    runtime::{controller::Action, watcher, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct SecretReconciler {
    client: Client,
    config: Config,
}

impl SecretReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let secrets: Api<Secret> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(secrets, watcher::Config::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled secret: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(secret: Arc<Secret>, ctx: Arc<SecretReconciler>) -> Result<Action> {
    let name = secret.name_any();
    let namespace = secret.namespace().unwrap_or_default();

    debug!("Reconciling secret: {}/{}", namespace, name);

    if !is_base(&*secret, &ctx.config) {
        debug!("Secret {}/{} is not a base secret, skipping", namespace, name);
        return Ok(Action::await_change());
    }

    let api: Api<Secret> = Api::namespaced(ctx.client.clone(), &ctx.config.base_namespace);
    let Some(base) = api.get_opt(&name).await? else {
        debug!("Secret {}/{} is gone, nothing to do", namespace, name);
        return Ok(Action::await_change());
    };

    // Deletion guard: once the base is marked for deletion, propagation must
    // not run again; the finalizer is only released after every mirror has
    // been removed.
    if base.metadata.deletion_timestamp.is_some() {
        if has_finalizer(&base) {
            cleanup_mirrors(&ctx.client, &ctx.config, &base).await?;
            remove_finalizer(&api, &base).await?;
            info!("Released finalizer on deleted base secret {}", name);
        }
        return Ok(Action::await_change());
    }

    // Secrets managed by some other party are mirrored but never guarded:
    // their mirrors are left in place when the base is deleted.
    let base = if is_externally_managed(&base) {
        base
    } else {
        ensure_finalizer(&api, &base).await?
    };

    propagate_to_namespaces(&ctx.client, &ctx.config, &base).await?;

    Ok(Action::requeue(Secret::requeue_after(&ctx.config)))
}

fn error_policy(_secret: Arc<Secret>, error: &MirrorError, _ctx: Arc<SecretReconciler>) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(60))
}

fn has_finalizer(secret: &Secret) -> bool {
    secret.finalizers().iter().any(|f| f == SECRET_FINALIZER)
}

fn is_externally_managed(secret: &Secret) -> bool {
    secret.labels().contains_key(labels::MANAGED_BY)
}

/// Attach the deletion-hook finalizer if it is not present yet, returning
/// the stored object the propagation pass should work from.
async fn ensure_finalizer(api: &Api<Secret>, secret: &Secret) -> Result<Secret> {
    if has_finalizer(secret) {
        return Ok(secret.clone());
    }

    debug!("Attaching finalizer to base secret {}", secret.name_any());
    let mut updated = secret.clone();
    updated
        .metadata
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(SECRET_FINALIZER.to_string());

    Ok(api
        .replace(&secret.name_any(), &PostParams::default(), &updated)
        .await?)
}

async fn remove_finalizer(api: &Api<Secret>, secret: &Secret) -> Result<()> {
    let mut updated = secret.clone();
    if let Some(finalizers) = updated.metadata.finalizers.as_mut() {
        finalizers.retain(|f| f != SECRET_FINALIZER);
    }
    api.replace(&secret.name_any(), &PostParams::default(), &updated)
        .await?;
    Ok(())
}

/// Delete the mirror of `base` from every currently-eligible namespace.
/// The delete is selector-scoped to marker-labelled secrets of the base's
/// name, so already-removed mirrors make a retry a no-op rather than an
/// error.
async fn cleanup_mirrors(client: &Client, config: &Config, base: &Secret) -> Result<()> {
    let name = base.name_any();
    let selector = format!("{}={}", labels::CONFIG, labels::CREDENTIALS);
    let namespaces = list_eligible_namespaces(client, config).await?;

    info!(
        "Cleaning up mirrors of secret {} in {} namespaces",
        name,
        namespaces.len()
    );

    for namespace in &namespaces {
        let api: Api<Secret> = Api::namespaced(client.clone(), namespace);
        let lp = ListParams::default()
            .labels(&selector)
            .fields(&format!("metadata.name={}", name));
        api.delete_collection(&DeleteParams::background(), &lp).await?;
        debug!("Removed mirror secret {}/{}", namespace, name);
    }

    Ok(())
}
