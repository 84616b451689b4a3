//! EDR backend identifiers and the static capability registry.
//!
//! Descriptors are immutable facts about each backend: its display name,
//! what credentials it needs, and which product-specific arguments it
//! understands. Nothing here performs I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a supported EDR backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// VMware Carbon Black Cloud Enterprise EDR
    Cbc,
    /// VMware Carbon Black EDR (Response)
    Cbr,
    /// Palo Alto Cortex XDR
    Cortex,
    /// Microsoft Defender for Endpoint
    Dfe,
    /// SentinelOne
    S1,
}

impl BackendId {
    /// Every supported backend, in display order.
    pub const ALL: [BackendId; 5] = [
        BackendId::Cbc,
        BackendId::Cbr,
        BackendId::Cortex,
        BackendId::Dfe,
        BackendId::S1,
    ];

    /// Get the backend name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Cbc => "cbc",
            BackendId::Cbr => "cbr",
            BackendId::Cortex => "cortex",
            BackendId::Dfe => "dfe",
            BackendId::S1 => "s1",
        }
    }

    /// Get the static descriptor for this backend.
    pub fn descriptor(&self) -> &'static BackendDescriptor {
        match self {
            BackendId::Cbc => &CBC,
            BackendId::Cbr => &CBR,
            BackendId::Cortex => &CORTEX,
            BackendId::Dfe => &DFE,
            BackendId::S1 => &S1,
        }
    }

    /// Whether a credentials file on its own is enough to authenticate.
    ///
    /// The Carbon Black products read url/token/org key out of their own
    /// credential file format, so no profile is needed.
    pub fn accepts_bare_credentials_file(&self) -> bool {
        matches!(self, BackendId::Cbc | BackendId::Cbr)
    }

    /// Whether the backend can only be configured through a credentials
    /// file plus profile at the option level.
    pub fn requires_credentials_file(&self) -> bool {
        matches!(self, BackendId::Cortex | BackendId::Dfe | BackendId::S1)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = BackendIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cbc" => Ok(BackendId::Cbc),
            "cbr" => Ok(BackendId::Cbr),
            "cortex" => Ok(BackendId::Cortex),
            "dfe" => Ok(BackendId::Dfe),
            "s1" => Ok(BackendId::S1),
            _ => Err(BackendIdParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid backend ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid EDR '{0}', valid values: cbc, cbr, cortex, dfe, s1")]
pub struct BackendIdParseError(pub String);

/// Error returned by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} is not a supported EDR")]
    UnknownBackend(String),
}

/// How a backend treats Sigma rule input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSupport {
    /// Rules are translated into the backend's query language
    Supported,
    /// The backend has no Sigma translation
    Unsupported,
    /// Only supported when querying Deep Visibility rather than PowerQuery
    RequiresDeepVisibility,
}

/// Immutable description of one backend.
#[derive(Debug)]
pub struct BackendDescriptor {
    /// Backend identifier
    pub id: BackendId,

    /// Human-readable product name
    pub full_name: &'static str,

    /// Remediation text describing what credentials are needed
    pub credential_requirements: &'static str,

    /// Product-specific argument names, or None if the backend takes none
    pub product_arguments: Option<&'static [&'static str]>,

    /// Direct-field credential sets; any one fully present is sufficient
    pub minimum_credentials: &'static [&'static [&'static str]],

    /// Sigma rule handling
    pub rule_support: RuleSupport,
}

impl BackendDescriptor {
    /// Check whether a set of present credential fields satisfies one of
    /// the backend's minimum field sets.
    pub fn satisfied_by<'a, I>(&self, present: I) -> bool
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.minimum_credentials.iter().any(|required| {
            required
                .iter()
                .all(|field| present.clone().into_iter().any(|p| p == *field))
        })
    }
}

static CBC: BackendDescriptor = BackendDescriptor {
    id: BackendId::Cbc,
    full_name: "VMware Carbon Black Cloud Enterprise EDR (CBC)",
    credential_requirements: "VMware Carbon Black Cloud Enterprise EDR requires a URL, token, and org_key or a credential file located following the documentation at: https://github.com/redcanaryco/surveyor/wiki/Getting-started",
    product_arguments: Some(&["device_group", "device_policy"]),
    minimum_credentials: &[&["url", "token", "org_key"]],
    rule_support: RuleSupport::Supported,
};

static CBR: BackendDescriptor = BackendDescriptor {
    id: BackendId::Cbr,
    full_name: "VMware Carbon Black EDR (CBr)",
    credential_requirements: "VMware Carbon Black EDR requires a URL and token or a credential file located following the documentation at: https://github.com/redcanaryco/surveyor/wiki/Getting-started",
    product_arguments: Some(&["sensor_group"]),
    minimum_credentials: &[&["url", "token"]],
    rule_support: RuleSupport::Supported,
};

static CORTEX: BackendDescriptor = BackendDescriptor {
    id: BackendId::Cortex,
    full_name: "Cortex XDR (Cortex)",
    credential_requirements: "Cortex XDR requires a URL, api_key, api_key_id, and auth_type or a credential file and profile to be passed",
    product_arguments: None,
    minimum_credentials: &[&["api_key", "url", "api_key_id", "auth_type"]],
    rule_support: RuleSupport::Unsupported,
};

static DFE: BackendDescriptor = BackendDescriptor {
    id: BackendId::Dfe,
    full_name: "Microsoft Defender for Endpoint (DFE)",
    credential_requirements: "Microsoft Defender for Endpoint requires a token or all of 'tenantId', 'appId', and 'appSecret', or a credential file and profile to be passed",
    product_arguments: None,
    minimum_credentials: &[&["token"], &["tenantId", "appId", "appSecret"]],
    rule_support: RuleSupport::Supported,
};

static S1: BackendDescriptor = BackendDescriptor {
    id: BackendId::S1,
    full_name: "SentinelOne (S1)",
    credential_requirements: "SentinelOne requires a URL and token and one of the following site_ids, account_ids, or account_names, or a credential file and profile to be passed",
    product_arguments: Some(&["deep_visibility"]),
    minimum_credentials: &[
        &["url", "token", "site_ids"],
        &["url", "token", "account_ids"],
        &["url", "token", "account_names"],
    ],
    rule_support: RuleSupport::RequiresDeepVisibility,
};

/// Look up a backend descriptor by its exact string id.
///
/// Unlike [`BackendId::from_str`], the match is case-sensitive: `CBC` is not
/// a known backend here.
pub fn lookup(name: &str) -> Result<&'static BackendDescriptor, RegistryError> {
    BackendId::ALL
        .iter()
        .find(|id| id.as_str() == name)
        .map(|id| id.descriptor())
        .ok_or_else(|| RegistryError::UnknownBackend(name.to_string()))
}

/// Iterate over every descriptor in display order.
pub fn descriptors() -> impl Iterator<Item = &'static BackendDescriptor> {
    BackendId::ALL.iter().map(|id| id.descriptor())
}
