//! `surveyor survey` command
//!
//! Builds a survey specification for one EDR and prints it as JSON. The
//! structural checks run afterwards and only warn: the Carbon Black
//! backends can still authenticate through the vendor's own credential file.

use std::path::PathBuf;

use anyhow::{Context, Result};

use surveyor::core::{
    BackendId, CredentialOptions, IocType, OutputFormat, ProductOptions, SurveyOptions,
};
use surveyor::ops::{build_survey, check_credentials, check_product_args};
use surveyor::util::config::Config;
use surveyor::util::diagnostic::suggestions;
use surveyor::GlobalContext;

use crate::cli::{CredentialArgs, ProductFlags, SurveyArgs};
use crate::commands::GlobalArgs;
use crate::logging;

pub fn execute(args: SurveyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let backend: BackendId = args.edr.parse()?;

    let log_dir = args.log_dir.clone().unwrap_or_else(|| config.log_dir());
    let (log_path, _log_guard) = logging::log_to_file(global.verbose, &log_dir, backend.as_str())?;
    tracing::debug!("Log file: {}", log_path.display());
    tracing::debug!("Product: {}", backend);

    let definitions_dir = global
        .definitions_dir
        .clone()
        .or_else(|| config.survey.definitions_dir.clone())
        .unwrap_or_else(|| ctx.builtin_definitions_dir());
    tracing::debug!("Definitions directory: {}", definitions_dir.display());

    let opts = survey_options(args, &config, log_dir)?;
    let spec = build_survey(backend, &opts, &definitions_dir)?;

    let creds = check_credentials(backend.as_str(), &spec.credentials);
    if creds.passed {
        tracing::debug!("Credential check passed for {}", backend);
    } else {
        tracing::warn!(
            "Credential check failed:\n{}{}",
            creds,
            suggestions::CHECK_CREDENTIALS
        );
    }

    if let Some(product_args) = &spec.product_args {
        let product = check_product_args(backend.as_str(), product_args);
        if !product.passed {
            tracing::warn!("Product argument check failed:\n{}", product);
        }
    }

    let json = serde_json::to_string_pretty(&spec)
        .context("failed to serialize survey specification")?;
    println!("{}", json);

    Ok(())
}

/// Translate parsed flags into survey options, filling gaps from config.
fn survey_options(args: SurveyArgs, config: &Config, log_dir: PathBuf) -> Result<SurveyOptions> {
    let output_format = match args.output_format.as_deref() {
        Some(format) => format.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
        None => config.output_format().unwrap_or_default(),
    };

    let ioc_type = args
        .ioc_type
        .as_deref()
        .map(str::parse::<IocType>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(SurveyOptions {
        credentials: credential_options(args.credentials, config),
        product: product_options(args.product),
        prefix: args.prefix,
        days: args.days,
        minutes: args.minutes,
        limit: args.limit.or(config.survey.limit),
        hostname: args.hostname,
        username: args.username,
        query: args.query,
        output: args.output,
        no_file: args.no_file,
        no_progress: args.no_progress,
        log_dir: Some(log_dir),
        namespace: args.namespace,
        ioc_file: args.ioc_file,
        ioc_type,
        deffile: args.deffile,
        defdir: args.defdir,
        sigmarule: args.sigmarule,
        sigmadir: args.sigmadir,
        output_format,
        ..Default::default()
    })
}

fn credential_options(args: CredentialArgs, config: &Config) -> CredentialOptions {
    CredentialOptions {
        profile: args.profile.or_else(|| config.credentials.profile.clone()),
        creds_file: args.creds.or_else(|| config.credentials.creds_file.clone()),
        auth_type: args.auth_type,
        tenant_ids: args.tenant_ids,
        site_ids: args.site_ids,
        account_ids: args.account_ids,
        account_names: args.account_names,
    }
}

fn product_options(flags: ProductFlags) -> ProductOptions {
    ProductOptions {
        device_group: flags.device_group,
        device_policy: flags.device_policy,
        sensor_group: flags.sensor_group,
        deep_visibility: flags.dv,
    }
}
