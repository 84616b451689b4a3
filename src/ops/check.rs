//! Structural pre-flight checks for credentials and product arguments.
//!
//! These checks only look at which fields are present. They never fail
//! hard: every outcome is a [`ValidationResult`] the caller can print,
//! warn about, or act on.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::core::backend;
use crate::core::credentials::CredentialSpec;
use crate::core::product_args::ProductArgs;

/// Message reported when a profile and credentials file were supplied.
pub const FILE_AND_PROFILE_SUPPLIED: &str =
    "A profile and path to a credentials file argument have been supplied";

/// Message reported when no product arguments were supplied.
pub const NO_ARGUMENTS_SUPPLIED: &str = "No arguments were supplied";

/// What a backend needs, as reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequiredFields {
    /// Remediation text
    Text(String),
    /// Argument names the backend accepts
    Names(BTreeSet<String>),
}

impl fmt::Display for RequiredFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredFields::Text(text) => write!(f, "{}", text),
            RequiredFields::Names(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

/// Outcome of a structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the check passed
    pub passed: bool,

    /// Backend label (id, full name, or an unsupported-backend message)
    pub backend: String,

    /// What the backend requires
    pub required_fields: Option<RequiredFields>,

    /// Backend-capable arguments that were not supplied
    pub incompatible_arguments: Option<BTreeSet<String>>,
}

impl ValidationResult {
    fn new(passed: bool, backend: impl Into<String>, required: Option<RequiredFields>) -> Self {
        ValidationResult {
            passed,
            backend: backend.into(),
            required_fields: required,
            incompatible_arguments: None,
        }
    }

    fn unsupported(name: &str) -> Self {
        let err = backend::RegistryError::UnknownBackend(name.to_string());
        ValidationResult::new(false, err.to_string(), None)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_report(self))
    }
}

/// Check that credentials carry the minimum fields a backend needs.
///
/// A credentials file plus profile is accepted for every backend, including
/// ones with no file-based login of their own.
pub fn check_credentials(backend: &str, creds: &CredentialSpec) -> ValidationResult {
    let descriptor = match backend::lookup(backend) {
        Ok(descriptor) => descriptor,
        Err(_) => return ValidationResult::unsupported(backend),
    };

    let id = descriptor.id;
    let requirements = || Some(RequiredFields::Text(descriptor.credential_requirements.to_string()));

    if id.accepts_bare_credentials_file() && creds.has("creds_file") {
        return ValidationResult::new(true, id.as_str(), requirements());
    }

    if creds.has("creds_file") && creds.has("profile") {
        return ValidationResult::new(
            true,
            id.as_str(),
            Some(RequiredFields::Text(FILE_AND_PROFILE_SUPPLIED.to_string())),
        );
    }

    let present = creds.present_fields();
    let passed = descriptor.satisfied_by(present.iter().copied());
    if !passed {
        tracing::debug!(
            "Credentials for {} are incomplete, present fields: {:?}",
            id,
            present
        );
    }

    ValidationResult::new(passed, id.as_str(), requirements())
}

/// Check supplied product arguments against what the backend accepts.
///
/// Passing requires at least one argument the backend recognizes. Any
/// recognized arguments that were left out are listed as incompatible; this
/// is informational only.
pub fn check_product_args(backend: &str, args: &ProductArgs) -> ValidationResult {
    let descriptor = match backend::lookup(backend) {
        Ok(descriptor) => descriptor,
        Err(_) => return ValidationResult::unsupported(backend),
    };

    if args.is_empty() {
        return ValidationResult::new(
            true,
            descriptor.full_name,
            Some(RequiredFields::Text(NO_ARGUMENTS_SUPPLIED.to_string())),
        );
    }

    let declared: BTreeSet<&str> = descriptor
        .product_arguments
        .unwrap_or_default()
        .iter()
        .copied()
        .collect();
    let supplied = args.names();

    let incompatible: BTreeSet<String> = declared
        .difference(&supplied)
        .map(|name| name.to_string())
        .collect();
    let compatible = declared.intersection(&supplied).count();

    let required = descriptor
        .product_arguments
        .map(|names| RequiredFields::Names(names.iter().map(|n| n.to_string()).collect()));

    let mut result = ValidationResult::new(compatible > 0, descriptor.full_name, required);
    if !incompatible.is_empty() {
        result.incompatible_arguments = Some(incompatible);
    }
    result
}

/// Format a validation result for terminal output.
pub fn format_report(result: &ValidationResult) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let status = if result.passed { "[OK]" } else { "[!!]" };

    writeln!(output, "{} {}", status, result.backend).unwrap();

    if let Some(required) = &result.required_fields {
        writeln!(output, "      Requires: {}", required).unwrap();
    }

    if let Some(incompatible) = &result.incompatible_arguments {
        let names: Vec<&str> = incompatible.iter().map(String::as_str).collect();
        writeln!(output, "      Not supplied: {}", names.join(", ")).unwrap();
    }

    output
}
