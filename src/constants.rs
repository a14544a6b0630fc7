// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes label keys and values used by nsmirror
pub mod labels {
    /// Marker label for core base objects in the base namespace
    pub const CONFIG: &str = "nsmirror.io/config";
    /// CONFIG value marking a base ConfigMap
    pub const RUNTIME: &str = "runtime";
    /// CONFIG value marking a base Secret
    pub const CREDENTIALS: &str = "credentials";
    /// CONFIG value marking a base ServiceAccount
    pub const SERVICE_ACCOUNT: &str = "service-account";

    /// Marker label for RBAC base objects in the base namespace
    pub const RBAC: &str = "nsmirror.io/rbac";
    /// RBAC value marking a base Role
    pub const ROLE: &str = "role";
    /// RBAC value marking a base RoleBinding
    pub const ROLE_BINDING: &str = "rolebinding";

    /// Base Secrets carrying this label are owned by some other party:
    /// they are still mirrored, but never finalizer-guarded.
    pub const MANAGED_BY: &str = "nsmirror.io/managed-by";
}

/// The operator name
pub const OPERATOR_NAME: &str = "nsmirror";

/// Finalizer attached to base Secrets so their mirrors can be cleaned up
/// before the base is allowed to go away.
pub const SECRET_FINALIZER: &str = "nsmirror.io/deletion-hook";
