//! Product-specific survey arguments.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::backend::BackendId;

/// Product arguments relevant to one backend.
///
/// Only non-empty entries are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductArgs {
    /// CBC device groups to scope the survey to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device_group: Vec<String>,

    /// CBC device policy to scope the survey to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_policy: Option<String>,

    /// CBr sensor group to scope the survey to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_group: Option<String>,

    /// Query SentinelOne Deep Visibility instead of PowerQuery
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deep_visibility: bool,
}

impl ProductArgs {
    /// Names of the arguments that carry a value.
    pub fn names(&self) -> BTreeSet<&'static str> {
        let mut names = BTreeSet::new();
        if !self.device_group.is_empty() {
            names.insert("device_group");
        }
        if self.device_policy.as_deref().is_some_and(|p| !p.is_empty()) {
            names.insert("device_policy");
        }
        if self.sensor_group.as_deref().is_some_and(|g| !g.is_empty()) {
            names.insert("sensor_group");
        }
        if self.deep_visibility {
            names.insert("deep_visibility");
        }
        names
    }

    /// Whether no argument carries a value.
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

/// Raw product flags as supplied by the operator.
#[derive(Debug, Clone, Default)]
pub struct ProductOptions {
    pub device_group: Vec<String>,
    pub device_policy: Option<String>,
    pub sensor_group: Option<String>,
    pub deep_visibility: bool,
}

/// Keep only the product flags the backend understands.
pub fn build_product_args(backend: BackendId, opts: &ProductOptions) -> ProductArgs {
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    match backend {
        BackendId::Cbc => ProductArgs {
            device_group: opts.device_group.clone(),
            device_policy: non_empty(&opts.device_policy),
            ..Default::default()
        },
        BackendId::Cbr => ProductArgs {
            sensor_group: non_empty(&opts.sensor_group),
            ..Default::default()
        },
        BackendId::S1 => ProductArgs {
            deep_visibility: opts.deep_visibility,
            ..Default::default()
        },
        BackendId::Cortex | BackendId::Dfe => ProductArgs::default(),
    }
}
