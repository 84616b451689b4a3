//! Implementation of `surveyor survey`.
//!
//! Turns raw survey options into a [`SurveySpecification`]. All option
//! checks run before anything is read from disk, and no partial
//! specification is ever returned.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::backend::{BackendId, RuleSupport};
use crate::core::credentials::{build_credentials, CredentialError};
use crate::core::product_args::build_product_args;
use crate::core::survey::{SurveyOptions, SurveySpecification};
use crate::util::fs::{base_name, files_with_extension, read_trimmed_lines};

/// Reasons a survey specification cannot be built.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum SurveyError {
    #[error("--iocfile requires --ioctype")]
    #[diagnostic(
        code(surveyor::survey::missing_ioc_type),
        help("Pass --ioctype with one of: md5, ipaddr, domain")
    )]
    MissingIocType { ioc_file: PathBuf },

    #[error("--ioctype requires --iocfile")]
    #[diagnostic(
        code(surveyor::survey::ioc_type_without_file),
        help("Pass --iocfile with the indicators to search for, or drop --ioctype")
    )]
    IocTypeWithoutIocFile,

    #[error("supplied --iocfile is not a file: {}", .0.display())]
    #[diagnostic(code(surveyor::survey::ioc_file_not_found))]
    IocFileNotFound(PathBuf),

    #[error("--output and --prefix cannot be used with --no-file")]
    #[diagnostic(code(surveyor::survey::output_with_no_file))]
    OutputWithNoFile,

    #[error("--days and --minutes are mutually exclusive")]
    #[diagnostic(code(surveyor::survey::time_window))]
    ConflictingTimeWindows,

    #[error("neither --sigmarule nor --sigmadir are supported by product \"{backend}\"")]
    #[diagnostic(code(surveyor::survey::rules_unsupported))]
    RulesUnsupported { backend: BackendId },

    #[error("neither --sigmarule nor --sigmadir are supported by SentinelOne PowerQuery")]
    #[diagnostic(
        code(surveyor::survey::rules_require_deep_visibility),
        help("Pass --dv to query Deep Visibility instead")
    )]
    RulesRequireDeepVisibility,

    #[error("supplied --sigmarule is not a file: {}", .0.display())]
    #[diagnostic(code(surveyor::survey::rule_file_not_found))]
    RuleFileNotFound(PathBuf),

    #[error("supplied --sigmadir is not a directory: {}", .0.display())]
    #[diagnostic(code(surveyor::survey::rule_dir_not_found))]
    RuleDirNotFound(PathBuf),

    #[error("the deffile `{}` doesn't exist", .name.display())]
    #[diagnostic(
        code(surveyor::survey::definition_file_not_found),
        help("Pass a path to a definition file, or the name of a built-in definition")
    )]
    DefinitionFileNotFound { name: PathBuf, searched: PathBuf },

    #[error("supplied --defdir is not a directory: {}", .0.display())]
    #[diagnostic(code(surveyor::survey::definition_dir_not_found))]
    DefinitionDirNotFound(PathBuf),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Credentials(#[from] CredentialError),

    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(surveyor::survey::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SurveyError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> SurveyError + '_ {
        move |source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Build a survey specification from raw options.
///
/// `definitions_dir` is where bare definition names (e.g. `remote_access`)
/// are looked up when `deffile` does not point at an existing path.
pub fn build_survey(
    backend: BackendId,
    opts: &SurveyOptions,
    definitions_dir: &Path,
) -> Result<SurveySpecification, SurveyError> {
    validate_options(backend, opts)?;

    let credentials = build_credentials(backend, &opts.credentials)?;

    let definition_files = resolve_definition_files(opts, definitions_dir)?;
    let sigma_rules = resolve_sigma_rules(opts)?;

    let mut spec = SurveySpecification::new(backend, credentials);

    if let Some(ioc_file) = present_path(&opts.ioc_file) {
        spec.ioc_list = read_trimmed_lines(ioc_file).map_err(SurveyError::io(ioc_file))?;
        spec.ioc_source = Some(base_name(ioc_file));
        spec.ioc_type = opts.ioc_type;
        tracing::debug!(
            "Loaded {} IOCs from {}",
            spec.ioc_list.len(),
            ioc_file.display()
        );
    }

    spec.prefix = opts.prefix.clone();
    spec.days = opts.days;
    spec.minutes = opts.minutes;
    spec.limit = opts.limit;
    spec.hostname = opts.hostname.clone();
    spec.username = opts.username.clone();
    spec.query = opts.query.clone();
    spec.output = opts.output.clone();
    spec.write_to_file = !opts.no_file;
    spec.no_progress = opts.no_progress;
    spec.log_dir = opts.log_dir.clone();
    spec.namespace = opts.namespace.clone();
    spec.definitions = opts.definitions.clone();
    spec.definition_files = definition_files;
    spec.sigma_rules = sigma_rules;
    spec.product_args = Some(build_product_args(backend, &opts.product));
    spec.output_format = opts.output_format;

    Ok(spec.pruned())
}

/// Reject contradictory or unusable option combinations.
fn validate_options(backend: BackendId, opts: &SurveyOptions) -> Result<(), SurveyError> {
    let ioc_file = present_path(&opts.ioc_file);

    match (ioc_file, opts.ioc_type) {
        (Some(path), None) => {
            return Err(SurveyError::MissingIocType {
                ioc_file: path.to_path_buf(),
            })
        }
        (None, Some(_)) => return Err(SurveyError::IocTypeWithoutIocFile),
        _ => {}
    }

    if let Some(path) = ioc_file {
        if !path.is_file() {
            return Err(SurveyError::IocFileNotFound(path.to_path_buf()));
        }
    }

    let wants_output = present_path(&opts.output).is_some() || present_str(&opts.prefix).is_some();
    if wants_output && opts.no_file {
        return Err(SurveyError::OutputWithNoFile);
    }

    if opts.days.is_some() && opts.minutes.is_some() {
        return Err(SurveyError::ConflictingTimeWindows);
    }

    let sigmarule = present_path(&opts.sigmarule);
    let sigmadir = present_path(&opts.sigmadir);

    if sigmarule.is_some() || sigmadir.is_some() {
        match backend.descriptor().rule_support {
            RuleSupport::Supported => {}
            RuleSupport::Unsupported => return Err(SurveyError::RulesUnsupported { backend }),
            RuleSupport::RequiresDeepVisibility if !opts.product.deep_visibility => {
                return Err(SurveyError::RulesRequireDeepVisibility)
            }
            RuleSupport::RequiresDeepVisibility => {}
        }
    }

    if let Some(path) = sigmarule {
        if !path.is_file() {
            return Err(SurveyError::RuleFileNotFound(path.to_path_buf()));
        }
    }

    if let Some(path) = sigmadir {
        if !path.is_dir() {
            return Err(SurveyError::RuleDirNotFound(path.to_path_buf()));
        }
    }

    Ok(())
}

/// Resolve `deffile` and `defdir` into a list of definition files.
fn resolve_definition_files(
    opts: &SurveyOptions,
    definitions_dir: &Path,
) -> Result<Vec<PathBuf>, SurveyError> {
    let mut files = Vec::new();

    if let Some(deffile) = present_path(&opts.deffile) {
        files.push(resolve_definition_file(deffile, definitions_dir)?);
    }

    if let Some(defdir) = present_path(&opts.defdir) {
        if !defdir.is_dir() {
            return Err(SurveyError::DefinitionDirNotFound(defdir.to_path_buf()));
        }
        files.extend(files_with_extension(defdir, "json").map_err(SurveyError::io(defdir))?);
    }

    Ok(files)
}

/// Resolve a definition file, falling back to the built-in definitions.
///
/// `remote_access` and `remote_access.json` both resolve to
/// `<definitions_dir>/remote_access.json` when no such path exists locally.
pub fn resolve_definition_file(
    deffile: &Path,
    definitions_dir: &Path,
) -> Result<PathBuf, SurveyError> {
    if deffile.exists() {
        return Ok(deffile.to_path_buf());
    }

    let mut candidate = definitions_dir.join(deffile).into_os_string();
    if !candidate.to_string_lossy().ends_with(".json") {
        candidate.push(".json");
    }
    let candidate = PathBuf::from(candidate);

    if candidate.is_file() {
        tracing::debug!("Using built-in definition file {}", candidate.display());
        Ok(candidate)
    } else {
        Err(SurveyError::DefinitionFileNotFound {
            name: deffile.to_path_buf(),
            searched: candidate,
        })
    }
}

/// Collect Sigma rules: the single rule first, then the directory walk.
fn resolve_sigma_rules(opts: &SurveyOptions) -> Result<Vec<PathBuf>, SurveyError> {
    let mut rules = Vec::new();

    if let Some(rule) = present_path(&opts.sigmarule) {
        rules.push(rule.to_path_buf());
    }

    if let Some(dir) = present_path(&opts.sigmadir) {
        rules.extend(files_with_extension(dir, "yml").map_err(SurveyError::io(dir))?);
    }

    Ok(rules)
}

fn present_path(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

fn present_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
