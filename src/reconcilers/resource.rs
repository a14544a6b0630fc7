// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic per-kind reconciler - watches one mirrored kind and re-propagates
//! changed base instances to every eligible namespace.

use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::mirror::{is_base, propagate_to_namespaces, Mirrorable};
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct ResourceReconciler<T> {
    client: Client,
    config: Config,
    _kind: PhantomData<T>,
}

impl<T: Mirrorable> ResourceReconciler<T> {
    pub fn new(client: Client, config: Config) -> Self {
        Self {
            client,
            config,
            _kind: PhantomData,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let api: Api<T> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(api, WatcherConfig::default())
            .run(reconcile::<T>, error_policy::<T>, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled {}: {:?}", T::KIND, o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile<T: Mirrorable>(
    obj: Arc<T>,
    ctx: Arc<ResourceReconciler<T>>,
) -> Result<Action> {
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();

    debug!("Reconciling {}: {}/{}", T::KIND, namespace, name);

    if !is_base(&*obj, &ctx.config) {
        debug!(
            "{} {}/{} is not a base instance, skipping",
            T::KIND,
            namespace,
            name
        );
        return Ok(Action::await_change());
    }

    // Re-read the base instance; a deleted one is a no-op (mirrors of the
    // four non-Secret kinds are left in place when their base goes away).
    let api: Api<T> = Api::namespaced(ctx.client.clone(), &ctx.config.base_namespace);
    let Some(base) = api.get_opt(&name).await? else {
        debug!("{} {}/{} is gone, nothing to do", T::KIND, namespace, name);
        return Ok(Action::await_change());
    };

    propagate_to_namespaces(&ctx.client, &ctx.config, &base).await?;

    // Periodic re-trigger corrects mirror drift between watch events
    Ok(Action::requeue(T::requeue_after(&ctx.config)))
}

fn error_policy<T: Mirrorable>(
    _obj: Arc<T>,
    error: &MirrorError,
    _ctx: Arc<ResourceReconciler<T>>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(60))
}
