//! `surveyor backend` command
//!
//! List supported EDRs and show what each one needs.

use anyhow::Result;

use surveyor::core::backend::{descriptors, BackendDescriptor, BackendId, RuleSupport};

use crate::cli::{BackendArgs, BackendCommands};

pub fn execute(args: BackendArgs) -> Result<()> {
    match args.command {
        BackendCommands::List => list_backends(),
        BackendCommands::Show(show_args) => show_backend(&show_args.backend),
    }
}

fn list_backends() -> Result<()> {
    println!("Supported EDRs:");
    println!();

    for descriptor in descriptors() {
        println!("  {:<8} {}", descriptor.id, descriptor.full_name);
    }

    Ok(())
}

fn show_backend(name: &str) -> Result<()> {
    let id: BackendId = name.parse()?;
    let descriptor = id.descriptor();

    println!("EDR: {} ({})", descriptor.full_name, descriptor.id);
    println!();

    println!("Credentials:");
    println!("  {}", descriptor.credential_requirements);
    if id.requires_credentials_file() {
        println!("  Surveys need --creds <FILE> and --profile <NAME>");
    }
    println!();

    println!("Product arguments:");
    match descriptor.product_arguments {
        Some(names) => {
            for name in names {
                println!("  {}", name);
            }
        }
        None => println!("  (none)"),
    }
    println!();

    println!("Sigma rules:");
    println!("  {}", rule_support(descriptor));

    Ok(())
}

fn rule_support(descriptor: &BackendDescriptor) -> &'static str {
    match descriptor.rule_support {
        RuleSupport::Supported => "supported",
        RuleSupport::Unsupported => "not supported",
        RuleSupport::RequiresDeepVisibility => "supported with --dv only",
    }
}
