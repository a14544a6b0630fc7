// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for namespace eligibility.

pub mod namespaces;

pub use namespaces::{is_eligible_namespace, list_eligible_namespaces};
