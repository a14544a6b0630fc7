// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_NAMESPACE: &str = "base";
const DEFAULT_EXCLUDED_NAMESPACES: &str = "kube-system,kube-public,kube-node-lease";
const DEFAULT_REQUEUE_SECONDS: u64 = 60;

/// Operator configuration loaded from environment variables.
/// Constructed once at startup and passed into every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace holding the administrator-authored base objects
    pub base_namespace: String,
    /// Namespaces that never receive mirrors (base namespace is always excluded)
    pub excluded_namespaces: Vec<String>,
    /// Per-kind drift-correction intervals
    pub config_map_requeue: Duration,
    pub secret_requeue: Duration,
    pub service_account_requeue: Duration,
    pub role_requeue: Duration,
    pub role_binding_requeue: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_namespace =
            env::var("BASE_NAMESPACE").unwrap_or_else(|_| DEFAULT_BASE_NAMESPACE.to_string());
        let excluded_namespaces = parse_excluded(
            &env::var("EXCLUDED_NAMESPACES")
                .unwrap_or_else(|_| DEFAULT_EXCLUDED_NAMESPACES.to_string()),
        );

        Ok(Config {
            base_namespace,
            excluded_namespaces,
            config_map_requeue: requeue_from_env("CONFIG_MAP_REQUEUE_SECONDS")?,
            secret_requeue: requeue_from_env("SECRET_REQUEUE_SECONDS")?,
            service_account_requeue: requeue_from_env("SERVICE_ACCOUNT_REQUEUE_SECONDS")?,
            role_requeue: requeue_from_env("ROLE_REQUEUE_SECONDS")?,
            role_binding_requeue: requeue_from_env("ROLE_BINDING_REQUEUE_SECONDS")?,
        })
    }
}

fn parse_excluded(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn requeue_from_env(var: &str) -> Result<Duration> {
    let secs = match env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{} is not a valid number of seconds", var))?,
        Err(_) => DEFAULT_REQUEUE_SECONDS,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_excluded_splits_on_comma() {
        assert_eq!(
            parse_excluded("kube-system,kube-public"),
            vec!["kube-system".to_string(), "kube-public".to_string()]
        );
    }

    #[test]
    fn test_parse_excluded_trims_whitespace() {
        assert_eq!(
            parse_excluded(" kube-system , kube-public "),
            vec!["kube-system".to_string(), "kube-public".to_string()]
        );
    }

    #[test]
    fn test_parse_excluded_drops_empty_entries() {
        assert_eq!(parse_excluded("kube-system,,"), vec!["kube-system".to_string()]);
        assert!(parse_excluded("").is_empty());
    }
}
