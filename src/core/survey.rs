//! Survey options and the resolved survey specification.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::backend::BackendId;
use crate::core::credentials::{CredentialOptions, CredentialSpec};
use crate::core::product_args::{ProductArgs, ProductOptions};

/// Kind of indicator listed in an IOC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IocType {
    Md5,
    Ipaddr,
    Domain,
}

impl IocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::Md5 => "md5",
            IocType::Ipaddr => "ipaddr",
            IocType::Domain => "domain",
        }
    }
}

impl fmt::Display for IocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(IocType::Md5),
            "ipaddr" => Ok(IocType::Ipaddr),
            "domain" => Ok(IocType::Domain),
            _ => Err(format!(
                "invalid IOC type '{}', valid values: md5, ipaddr, domain",
                s
            )),
        }
    }
}

/// Format of the survey results file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("invalid output format '{}', valid values: csv, json", s)),
        }
    }
}

/// Raw, backend-agnostic survey options.
///
/// This is the typed equivalent of the parsed command line. Nothing here
/// has been checked yet; see [`crate::ops::build_survey`].
#[derive(Debug, Clone, Default)]
pub struct SurveyOptions {
    pub credentials: CredentialOptions,
    pub product: ProductOptions,

    /// Prefix for the results file name
    pub prefix: Option<String>,
    pub days: Option<u32>,
    pub minutes: Option<u32>,
    pub limit: Option<u32>,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub query: Option<String>,
    pub output: Option<PathBuf>,
    pub no_file: bool,
    pub no_progress: bool,
    pub log_dir: Option<PathBuf>,

    /// Extra column value appended to every result row
    pub namespace: Option<String>,

    pub ioc_file: Option<PathBuf>,
    pub ioc_type: Option<IocType>,

    /// A definition file path, or a name under the built-in definitions
    pub deffile: Option<PathBuf>,
    pub defdir: Option<PathBuf>,

    /// Inline program definitions, keyed by program name
    pub definitions: BTreeMap<String, serde_json::Value>,

    pub sigmarule: Option<PathBuf>,
    pub sigmadir: Option<PathBuf>,

    pub output_format: OutputFormat,
}

/// A validated survey, ready to hand to a backend client.
///
/// Every optional field is left unset rather than carried as an empty
/// value, and unset fields are not serialized. Consumers treat a missing
/// field as "use your default".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySpecification {
    pub backend: BackendId,
    pub credentials: CredentialSpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    pub write_to_file: bool,
    pub no_progress: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ioc_source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ioc_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ioc_type: Option<IocType>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub definition_files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sigma_rules: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_args: Option<ProductArgs>,

    pub output_format: OutputFormat,
}

impl SurveySpecification {
    /// Create an empty specification for a backend.
    pub fn new(backend: BackendId, credentials: CredentialSpec) -> Self {
        SurveySpecification {
            backend,
            credentials,
            prefix: None,
            days: None,
            minutes: None,
            limit: None,
            hostname: None,
            username: None,
            query: None,
            output: None,
            write_to_file: true,
            no_progress: false,
            log_dir: None,
            namespace: None,
            ioc_source: None,
            ioc_list: Vec::new(),
            ioc_type: None,
            definitions: BTreeMap::new(),
            definition_files: Vec::new(),
            sigma_rules: Vec::new(),
            product_args: None,
            output_format: OutputFormat::default(),
        }
    }

    /// Drop every present-but-empty value.
    ///
    /// Idempotent: pruning an already pruned specification changes nothing.
    pub fn pruned(mut self) -> Self {
        for field in [
            &mut self.prefix,
            &mut self.hostname,
            &mut self.username,
            &mut self.query,
            &mut self.namespace,
            &mut self.ioc_source,
        ] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }

        for field in [&mut self.output, &mut self.log_dir] {
            if field.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                *field = None;
            }
        }

        self.definition_files.retain(|p| !p.as_os_str().is_empty());
        self.sigma_rules.retain(|p| !p.as_os_str().is_empty());

        if self.product_args.as_ref().is_some_and(ProductArgs::is_empty) {
            self.product_args = None;
        }

        self
    }
}
