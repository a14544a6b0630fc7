// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("RoleBinding {name} must have exactly one subject, found {count}")]
    InvalidSubjectCount { name: String, count: usize },
}

pub type Result<T> = std::result::Result<T, MirrorError>;
