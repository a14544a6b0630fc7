// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic propagation engine, instantiated once per mirrored kind.

use crate::config::Config;
use crate::error::Result;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{ListParams, ObjectMeta, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info};

/// A namespaced kind whose base instances are mirrored into user namespaces.
///
/// Implementors supply the marker label identifying base instances and the
/// pure merge rule turning (existing mirror, base instance) into the desired
/// mirror state. All API plumbing lives in the free functions below.
pub trait Mirrorable:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// Kind name used in log lines
    const KIND: &'static str;
    /// Marker label key on base instances
    const MARKER_LABEL: &'static str;
    /// Marker label value for this kind
    const MARKER_VALUE: &'static str;

    /// Drift-correction interval for this kind
    fn requeue_after(config: &Config) -> Duration;

    /// Compute the desired mirror in `target_namespace`. `existing` is the
    /// current mirror, if any; kind-specific local state may be preserved
    /// from it, everything else comes from `base`.
    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self>;
}

/// Check whether an object is a base instance: it must live in the base
/// namespace and carry this kind's marker label.
pub fn is_base<T: Mirrorable>(obj: &T, config: &Config) -> bool {
    let meta = obj.meta();
    meta.namespace.as_deref() == Some(config.base_namespace.as_str())
        && meta
            .labels
            .as_ref()
            .and_then(|labels| labels.get(T::MARKER_LABEL))
            .is_some_and(|value| value == T::MARKER_VALUE)
}

/// List all base instances of a kind in the base namespace.
pub async fn list_base<T: Mirrorable>(client: &Client, config: &Config) -> Result<Vec<T>> {
    let api: Api<T> = Api::namespaced(client.clone(), &config.base_namespace);
    let selector = format!("{}={}", T::MARKER_LABEL, T::MARKER_VALUE);
    let list = api.list(&ListParams::default().labels(&selector)).await?;
    Ok(list.items)
}

/// Metadata for a mirror: name taken from the base, namespace of the target,
/// labels and annotations replaced wholesale from the base. When updating,
/// the existing mirror's identity fields (uid, resourceVersion) are kept so
/// the replace call targets the object that was read.
pub fn mirror_metadata(
    existing: Option<&ObjectMeta>,
    base: &ObjectMeta,
    target_namespace: &str,
) -> ObjectMeta {
    let mut metadata = existing.cloned().unwrap_or_default();
    metadata.name = base.name.clone();
    metadata.namespace = Some(target_namespace.to_string());
    metadata.labels = base.labels.clone();
    metadata.annotations = base.annotations.clone();
    metadata
}

/// Idempotent create-or-update of the mirror of `base` in `namespace`.
pub async fn update_namespace<T: Mirrorable>(
    client: &Client,
    namespace: &str,
    base: &T,
) -> Result<()> {
    let name = base.name_any();
    let api: Api<T> = Api::namespaced(client.clone(), namespace);

    match api.get_opt(&name).await? {
        None => {
            debug!("Creating {} mirror {}/{}", T::KIND, namespace, name);
            let desired = T::merge(None, base, namespace)?;
            api.create(&PostParams::default(), &desired).await?;
        }
        Some(existing) => {
            debug!("Updating {} mirror {}/{}", T::KIND, namespace, name);
            let desired = T::merge(Some(&existing), base, namespace)?;
            api.replace(&name, &PostParams::default(), &desired).await?;
        }
    }

    Ok(())
}

/// Mirror one base instance into every currently-eligible namespace.
/// Propagation is sequential and aborts on the first error; the partially
/// propagated state is corrected on the next reconcile.
pub async fn propagate_to_namespaces<T: Mirrorable>(
    client: &Client,
    config: &Config,
    base: &T,
) -> Result<()> {
    let namespaces = crate::kubernetes::list_eligible_namespaces(client, config).await?;

    info!(
        "Propagating {} {} to {} namespaces",
        T::KIND,
        base.name_any(),
        namespaces.len()
    );

    for namespace in &namespaces {
        update_namespace(client, namespace, base).await?;
    }

    Ok(())
}

/// Mirror every base instance of one kind into a single namespace.
pub async fn populate_namespace<T: Mirrorable>(
    client: &Client,
    config: &Config,
    namespace: &str,
) -> Result<()> {
    let bases = list_base::<T>(client, config).await?;

    debug!(
        "Populating namespace {} with {} base {}s",
        namespace,
        bases.len(),
        T::KIND
    );

    for base in &bases {
        update_namespace(client, namespace, base).await?;
    }

    Ok(())
}
