// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use k8s_openapi::api::core::v1::{ConfigMap, ServiceAccount};
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use kube::Client;
use tracing::{info, warn};

use nsmirror::config::Config;
use nsmirror::reconcilers::{NamespaceReconciler, ResourceReconciler, SecretReconciler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting nsmirror operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: base_namespace={}, excluded_namespaces={:?}",
        config.base_namespace, config.excluded_namespaces
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // One reconciler per mirrored kind, plus the namespace populator
    let config_maps = ResourceReconciler::<ConfigMap>::new(client.clone(), config.clone());
    let roles = ResourceReconciler::<Role>::new(client.clone(), config.clone());
    let role_bindings = ResourceReconciler::<RoleBinding>::new(client.clone(), config.clone());
    let service_accounts = ResourceReconciler::<ServiceAccount>::new(client.clone(), config.clone());
    let secrets = SecretReconciler::new(client.clone(), config.clone());
    let namespaces = NamespaceReconciler::new(client, config);

    info!("Starting reconcilers...");

    // Run all reconcilers concurrently
    tokio::try_join!(
        config_maps.run(),
        secrets.run(),
        roles.run(),
        role_bindings.run(),
        service_accounts.run(),
        namespaces.run()
    )?;

    // This should never be reached as reconcilers run forever
    warn!("All reconcilers stopped unexpectedly");
    Ok(())
}
