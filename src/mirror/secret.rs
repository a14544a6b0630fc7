// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret mirror rules: data, string data and type are fully inherited.

use crate::config::Config;
use crate::constants::labels;
use crate::error::Result;
use crate::mirror::engine::{mirror_metadata, Mirrorable};
use k8s_openapi::api::core::v1::Secret;
use std::time::Duration;

impl Mirrorable for Secret {
    const KIND: &'static str = "Secret";
    const MARKER_LABEL: &'static str = labels::CONFIG;
    const MARKER_VALUE: &'static str = labels::CREDENTIALS;

    fn requeue_after(config: &Config) -> Duration {
        config.secret_requeue
    }

    fn merge(existing: Option<&Self>, base: &Self, target_namespace: &str) -> Result<Self> {
        Ok(Secret {
            metadata: mirror_metadata(
                existing.map(|e| &e.metadata),
                &base.metadata,
                target_namespace,
            ),
            data: base.data.clone(),
            string_data: base.string_data.clone(),
            type_: base.type_.clone(),
            ..existing.cloned().unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECRET_FINALIZER;
    use crate::mirror::engine::is_base;
    use crate::test_utils::make_test_config;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn make_base(name: &str) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("base-ns".to_string()),
                labels: Some(BTreeMap::from([(
                    labels::CONFIG.to_string(),
                    labels::CREDENTIALS.to_string(),
                )])),
                finalizers: Some(vec![SECRET_FINALIZER.to_string()]),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString(b"secret123".to_vec()),
            )])),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_create_copies_payload_and_type() {
        let base = make_base("registry-credentials");

        let mirror = Secret::merge(None, &base, "tam").unwrap();

        assert_eq!(mirror.metadata.name.as_deref(), Some("registry-credentials"));
        assert_eq!(mirror.metadata.namespace.as_deref(), Some("tam"));
        assert_eq!(mirror.metadata.labels, base.metadata.labels);
        assert_eq!(mirror.data, base.data);
        assert_eq!(mirror.type_.as_deref(), Some("Opaque"));
    }

    #[test]
    fn test_merge_does_not_carry_base_finalizer_to_mirror() {
        let base = make_base("registry-credentials");
        let mirror = Secret::merge(None, &base, "tam").unwrap();
        assert_eq!(mirror.metadata.finalizers, None);
    }

    #[test]
    fn test_merge_update_restores_tampered_data() {
        let base = make_base("registry-credentials");
        let existing = Secret {
            metadata: ObjectMeta {
                name: Some("registry-credentials".to_string()),
                namespace: Some("tam".to_string()),
                resource_version: Some("7".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString(b"tampered".to_vec()),
            )])),
            ..Default::default()
        };

        let mirror = Secret::merge(Some(&existing), &base, "tam").unwrap();

        assert_eq!(mirror.metadata.resource_version.as_deref(), Some("7"));
        assert_eq!(mirror.data, base.data);
    }

    #[test]
    fn test_is_base() {
        let config = make_test_config("base-ns", &[]);

        assert!(is_base(&make_base("s"), &config));

        let mut wrong_namespace = make_base("s");
        wrong_namespace.metadata.namespace = Some("some-other-ns".to_string());
        assert!(!is_base(&wrong_namespace, &config));

        let mut no_labels = make_base("s");
        no_labels.metadata.labels = None;
        assert!(!is_base(&no_labels, &config));
    }
}
