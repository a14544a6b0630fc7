// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-kind mirror services: classification, listing, and merge rules.

pub mod config_map;
pub mod engine;
pub mod role;
pub mod role_binding;
pub mod secret;
pub mod service_account;

pub use engine::{
    is_base, list_base, mirror_metadata, populate_namespace, propagate_to_namespaces,
    update_namespace, Mirrorable,
};
