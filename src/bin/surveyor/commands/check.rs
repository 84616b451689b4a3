//! `surveyor check` command
//!
//! Runs the structural credential and product-argument checks against the
//! flags as given, without building a survey. The EDR name is not parsed up
//! front so an unsupported name is reported like any other failed check.

use anyhow::{bail, Result};

use surveyor::core::{CredentialSpec, ProductArgs};
use surveyor::ops::{check_credentials, check_product_args};
use surveyor::util::config::Config;
use surveyor::GlobalContext;

use crate::cli::CheckArgs;

pub fn execute(args: CheckArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let edr = args.edr.clone();
    let product = ProductArgs {
        device_group: args.product.device_group.clone(),
        device_policy: args.product.device_policy.clone(),
        sensor_group: args.product.sensor_group.clone(),
        deep_visibility: args.product.dv,
    };
    let creds = credential_spec(args, &config);

    let creds_result = check_credentials(&edr, &creds);
    let product_result = check_product_args(&edr, &product);

    println!("Credentials:");
    print!("{}", creds_result);
    println!();
    println!("Product arguments:");
    print!("{}", product_result);

    if !creds_result.passed {
        bail!("credentials are not sufficient for `{}`", edr);
    }
    if !product_result.passed {
        bail!("product arguments do not match `{}`", edr);
    }

    Ok(())
}

/// Credential fields exactly as supplied, with profile and file defaults
/// taken from config.
fn credential_spec(args: CheckArgs, config: &Config) -> CredentialSpec {
    let creds = args.credentials;

    CredentialSpec {
        profile: creds.profile.or_else(|| config.credentials.profile.clone()),
        creds_file: creds.creds.or_else(|| config.credentials.creds_file.clone()),
        auth_type: creds.auth_type,
        tenant_ids: creds.tenant_ids,
        site_ids: creds.site_ids,
        account_ids: creds.account_ids,
        account_names: creds.account_names,
        url: args.url,
        token: args.token,
        org_key: args.org_key,
        api_key: args.api_key,
        api_key_id: args.api_key_id,
        tenant_id: args.tenant_id,
        app_id: args.app_id,
        app_secret: args.app_secret,
    }
}
