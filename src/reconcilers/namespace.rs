// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace reconciler - fills a newly created namespace with mirrors of
//! every base instance of every mirrored kind.

use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::kubernetes::is_eligible_namespace;
use crate::mirror::populate_namespace;
use futures::StreamExt;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret, ServiceAccount};
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use kube::{
    runtime::{controller::Action, watcher, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct NamespaceReconciler {
    client: Client,
    config: Config,
}

impl NamespaceReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(namespaces, watcher::Config::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled namespace: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(namespace: Arc<Namespace>, ctx: Arc<NamespaceReconciler>) -> Result<Action> {
    let name = namespace.name_any();

    if !is_eligible_namespace(&namespace, &ctx.config) {
        debug!("Namespace {} is not eligible, skipping", name);
        return Ok(Action::await_change());
    }

    let api: Api<Namespace> = Api::all(ctx.client.clone());
    if api.get_opt(&name).await?.is_none() {
        debug!("Namespace {} is gone, nothing to do", name);
        return Ok(Action::await_change());
    }

    info!("Populating namespace {} with base resources", name);

    // Fixed kind order; abort on the first error. Drift after this pass is
    // corrected by each kind's own periodic requeue, so no requeue here.
    populate_namespace::<ConfigMap>(&ctx.client, &ctx.config, &name).await?;
    populate_namespace::<Secret>(&ctx.client, &ctx.config, &name).await?;
    populate_namespace::<Role>(&ctx.client, &ctx.config, &name).await?;
    populate_namespace::<RoleBinding>(&ctx.client, &ctx.config, &name).await?;
    populate_namespace::<ServiceAccount>(&ctx.client, &ctx.config, &name).await?;

    Ok(Action::await_change())
}

fn error_policy(
    _namespace: Arc<Namespace>,
    error: &MirrorError,
    _ctx: Arc<NamespaceReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::labels;
    use crate::test_utils::{
        configmap_json, configmap_list_json, make_test_config, namespace_json, not_found_json,
        MockService,
    };
    use kube::api::ObjectMeta;

    fn make_namespace(name: &str) -> Namespace {
        Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn make_reconciler(client: Client) -> Arc<NamespaceReconciler> {
        Arc::new(NamespaceReconciler::new(
            client,
            make_test_config("base-ns", &["kube-system"]),
        ))
    }

    fn empty_list(kind: &str) -> String {
        format!(
            r#"{{"apiVersion":"v1","kind":"{}","metadata":{{"resourceVersion":"1"}},"items":[]}}"#,
            kind
        )
    }

    #[tokio::test]
    async fn test_reconcile_skips_base_and_excluded_namespaces() {
        let ctx = make_reconciler(MockService::new().into_client());

        let action = reconcile(Arc::new(make_namespace("base-ns")), ctx.clone())
            .await
            .unwrap();
        assert_eq!(format!("{:?}", action), format!("{:?}", Action::await_change()));

        let action = reconcile(Arc::new(make_namespace("kube-system")), ctx)
            .await
            .unwrap();
        assert_eq!(format!("{:?}", action), format!("{:?}", Action::await_change()));
    }

    #[tokio::test]
    async fn test_reconcile_noops_when_namespace_is_gone() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/vanished",
                404,
                &not_found_json("namespaces", "vanished"),
            )
            .into_client();

        let action = reconcile(Arc::new(make_namespace("vanished")), make_reconciler(client))
            .await
            .unwrap();

        assert_eq!(format!("{:?}", action), format!("{:?}", Action::await_change()));
    }

    #[tokio::test]
    async fn test_reconcile_populates_all_kinds_into_new_namespace() {
        let base_cm = serde_json::from_str::<serde_json::Value>(&configmap_json(
            "ah-tak-przeciez",
            "base-ns",
            &[("test_1", "value_!"), ("test_2", "value_2")],
        ))
        .unwrap();
        let base_cm = {
            let mut v = base_cm;
            v["metadata"]["labels"] = serde_json::json!({ labels::CONFIG: labels::RUNTIME });
            v
        };

        let client = MockService::new()
            .on_get("/api/v1/namespaces/tam", 200, &namespace_json("tam", "Active"))
            // One base ConfigMap, no base instances of the other kinds
            .on_get(
                "/api/v1/namespaces/base-ns/configmaps",
                200,
                &configmap_list_json(&[base_cm]),
            )
            .on_get("/api/v1/namespaces/base-ns/secrets", 200, &empty_list("SecretList"))
            .on_get(
                "/apis/rbac.authorization.k8s.io/v1/namespaces/base-ns/roles",
                200,
                &empty_list("RoleList"),
            )
            .on_get(
                "/apis/rbac.authorization.k8s.io/v1/namespaces/base-ns/rolebindings",
                200,
                &empty_list("RoleBindingList"),
            )
            .on_get(
                "/api/v1/namespaces/base-ns/serviceaccounts",
                200,
                &empty_list("ServiceAccountList"),
            )
            .on_get(
                "/api/v1/namespaces/tam/configmaps/ah-tak-przeciez",
                404,
                &not_found_json("configmaps", "ah-tak-przeciez"),
            )
            .on_post(
                "/api/v1/namespaces/tam/configmaps",
                201,
                &configmap_json("ah-tak-przeciez", "tam", &[("test_1", "value_!")]),
            )
            .into_client();

        let action = reconcile(Arc::new(make_namespace("tam")), make_reconciler(client))
            .await
            .unwrap();

        assert_eq!(format!("{:?}", action), format!("{:?}", Action::await_change()));
    }

    #[tokio::test]
    async fn test_reconcile_aborts_on_first_listing_error() {
        // Base ConfigMap listing is not stubbed, so the populate pass fails
        // before any other kind is attempted.
        let client = MockService::new()
            .on_get("/api/v1/namespaces/tam", 200, &namespace_json("tam", "Active"))
            .into_client();

        let result = reconcile(Arc::new(make_namespace("tam")), make_reconciler(client)).await;
        assert!(result.is_err());
    }
}
