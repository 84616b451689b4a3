//! Per-backend credential specifications.
//!
//! A [`CredentialSpec`] only records which fields were supplied. Whether
//! those values actually authenticate is up to the backend client.

use std::collections::BTreeSet;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::backend::BackendId;

/// Profile used when none is supplied.
pub const DEFAULT_PROFILE: &str = "default";

/// Auth type used by Cortex when none is supplied.
pub const DEFAULT_CORTEX_AUTH_TYPE: &str = "standard";

/// Credential fields handed to a backend client.
///
/// Unset fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creds_file: Option<PathBuf>,

    /// Cortex authentication type (`standard` or `advanced`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    /// Cortex tenant ids
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub site_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_names: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,

    /// Azure AD tenant for a DFE app registration
    #[serde(rename = "tenantId", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(rename = "appId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(rename = "appSecret", skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
}

impl CredentialSpec {
    /// Names of every field holding a non-empty value.
    pub fn present_fields(&self) -> BTreeSet<&'static str> {
        let strings = [
            ("profile", self.profile.as_deref()),
            ("auth_type", self.auth_type.as_deref()),
            ("url", self.url.as_deref()),
            ("token", self.token.as_deref()),
            ("org_key", self.org_key.as_deref()),
            ("api_key", self.api_key.as_deref()),
            ("api_key_id", self.api_key_id.as_deref()),
            ("tenantId", self.tenant_id.as_deref()),
            ("appId", self.app_id.as_deref()),
            ("appSecret", self.app_secret.as_deref()),
        ];
        let lists = [
            ("tenant_ids", &self.tenant_ids),
            ("site_ids", &self.site_ids),
            ("account_ids", &self.account_ids),
            ("account_names", &self.account_names),
        ];

        let mut present: BTreeSet<&'static str> = strings
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| !v.is_empty()))
            .map(|(name, _)| name)
            .collect();

        present.extend(
            lists
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(name, _)| name),
        );

        if self
            .creds_file
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
        {
            present.insert("creds_file");
        }

        present
    }

    /// Check whether a field holds a non-empty value.
    pub fn has(&self, field: &str) -> bool {
        self.present_fields().contains(field)
    }
}

/// Raw credential overrides as supplied by the operator.
#[derive(Debug, Clone, Default)]
pub struct CredentialOptions {
    pub profile: Option<String>,
    pub creds_file: Option<PathBuf>,
    pub auth_type: Option<String>,
    pub tenant_ids: Vec<String>,
    pub site_ids: Vec<String>,
    pub account_ids: Vec<String>,
    pub account_names: Vec<String>,
}

/// Errors from building credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum CredentialError {
    #[error("{backend} needs to be passed the location to a credentials file, and a profile")]
    #[diagnostic(
        code(surveyor::credentials::missing_file),
        help("Cortex, S1, and DFE need both --creds <FILE> and --profile <NAME>")
    )]
    MissingCredentialsFile { backend: BackendId },
}

/// Build the credential specification for a backend.
///
/// The Carbon Black backends fall back to the `default` profile. Every other
/// backend must be given both a credentials file and a profile.
pub fn build_credentials(
    backend: BackendId,
    opts: &CredentialOptions,
) -> Result<CredentialSpec, CredentialError> {
    let profile = non_empty(opts.profile.as_deref());

    if !backend.requires_credentials_file() {
        return Ok(CredentialSpec {
            profile: Some(profile.unwrap_or(DEFAULT_PROFILE).to_string()),
            ..Default::default()
        });
    }

    let creds_file = opts
        .creds_file
        .clone()
        .filter(|p| !p.as_os_str().is_empty());

    let (Some(profile), Some(creds_file)) = (profile, creds_file) else {
        return Err(CredentialError::MissingCredentialsFile { backend });
    };

    let mut creds = CredentialSpec {
        profile: Some(profile.to_string()),
        creds_file: Some(creds_file),
        ..Default::default()
    };

    match backend {
        BackendId::Cortex => {
            let auth_type = non_empty(opts.auth_type.as_deref())
                .unwrap_or(DEFAULT_CORTEX_AUTH_TYPE)
                .to_lowercase();
            creds.auth_type = Some(auth_type);
            creds.tenant_ids = opts.tenant_ids.clone();
        }
        BackendId::S1 => {
            creds.site_ids = opts.site_ids.clone();
            creds.account_ids = opts.account_ids.clone();
            creds.account_names = opts.account_names.clone();
        }
        BackendId::Dfe | BackendId::Cbc | BackendId::Cbr => {}
    }

    tracing::debug!(
        "Built {} credentials with fields {:?}",
        backend,
        creds.present_fields()
    );

    Ok(creds)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_opts() -> CredentialOptions {
        CredentialOptions {
            profile: Some("prod".to_string()),
            creds_file: Some(PathBuf::from("/etc/surveyor/creds.ini")),
            ..Default::default()
        }
    }

    #[test]
    fn test_carbon_black_defaults_profile() {
        for backend in [BackendId::Cbc, BackendId::Cbr] {
            let creds = build_credentials(backend, &CredentialOptions::default()).unwrap();
            assert_eq!(creds.profile.as_deref(), Some("default"));
            assert_eq!(creds.present_fields().len(), 1);
        }
    }

    #[test]
    fn test_carbon_black_profile_override() {
        let opts = CredentialOptions {
            profile: Some("lab".to_string()),
            ..Default::default()
        };
        let creds = build_credentials(BackendId::Cbc, &opts).unwrap();
        assert_eq!(creds.profile.as_deref(), Some("lab"));
    }

    #[test]
    fn test_carbon_black_ignores_creds_file() {
        let creds = build_credentials(BackendId::Cbr, &file_opts()).unwrap();
        assert!(creds.creds_file.is_none());
    }

    #[test]
    fn test_file_backends_require_file_and_profile() {
        let only_profile = CredentialOptions {
            profile: Some("prod".to_string()),
            ..Default::default()
        };
        let only_file = CredentialOptions {
            creds_file: Some(PathBuf::from("creds.ini")),
            ..Default::default()
        };

        for backend in [BackendId::Cortex, BackendId::Dfe, BackendId::S1] {
            assert_eq!(
                build_credentials(backend, &only_profile).unwrap_err(),
                CredentialError::MissingCredentialsFile { backend }
            );
            assert!(build_credentials(backend, &only_file).is_err());
        }
    }

    #[test]
    fn test_empty_profile_counts_as_missing() {
        let mut opts = file_opts();
        opts.profile = Some(String::new());
        assert!(build_credentials(BackendId::Dfe, &opts).is_err());
    }

    #[test]
    fn test_cortex_auth_type() {
        let creds = build_credentials(BackendId::Cortex, &file_opts()).unwrap();
        assert_eq!(creds.auth_type.as_deref(), Some("standard"));

        let mut opts = file_opts();
        opts.auth_type = Some("ADVANCED".to_string());
        opts.tenant_ids = vec!["t1".to_string(), "t2".to_string()];
        let creds = build_credentials(BackendId::Cortex, &opts).unwrap();
        assert_eq!(creds.auth_type.as_deref(), Some("advanced"));
        assert_eq!(creds.tenant_ids, vec!["t1", "t2"]);
    }

    #[test]
    fn test_s1_identifier_lists() {
        let mut opts = file_opts();
        opts.site_ids = vec!["123".to_string()];
        opts.account_names = vec!["acme".to_string()];
        opts.tenant_ids = vec!["ignored".to_string()];

        let creds = build_credentials(BackendId::S1, &opts).unwrap();
        assert_eq!(creds.site_ids, vec!["123"]);
        assert!(creds.account_ids.is_empty());
        assert_eq!(creds.account_names, vec!["acme"]);
        assert!(creds.tenant_ids.is_empty());
    }

    #[test]
    fn test_dfe_only_file_and_profile() {
        let creds = build_credentials(BackendId::Dfe, &file_opts()).unwrap();
        let fields: Vec<_> = creds.present_fields().into_iter().collect();
        assert_eq!(fields, vec!["creds_file", "profile"]);
    }

    #[test]
    fn test_present_fields_skips_empty_values() {
        let creds = CredentialSpec {
            profile: Some(String::new()),
            url: Some("https://edr.example".to_string()),
            site_ids: Vec::new(),
            ..Default::default()
        };
        assert!(creds.has("url"));
        assert!(!creds.has("profile"));
        assert!(!creds.has("site_ids"));
    }

    #[test]
    fn test_serialization_omits_unset_fields() {
        let creds = CredentialSpec {
            tenant_id: Some("t".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({ "tenantId": "t" }));
    }
}
