//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Surveyor - build and validate EDR survey specifications
#[derive(Parser)]
#[command(name = "surveyor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding the built-in definition files
    #[arg(long, global = true, env = "SURVEYOR_DEFINITIONS_DIR")]
    pub definitions_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a survey specification and print it as JSON
    Survey(SurveyArgs),

    /// Check credentials and product arguments against an EDR
    Check(CheckArgs),

    /// Inspect supported EDR backends
    Backend(BackendArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Credential flags shared by `survey` and `check`.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Path to a credentials file
    #[arg(long = "creds")]
    pub creds: Option<PathBuf>,

    /// Profile within the credentials file
    #[arg(long)]
    pub profile: Option<String>,

    /// Cortex authentication type (standard, advanced)
    #[arg(long)]
    pub auth_type: Option<String>,

    /// Cortex tenant ids
    #[arg(long, num_args = 1..)]
    pub tenant_ids: Vec<String>,

    /// SentinelOne site ids
    #[arg(long, num_args = 1..)]
    pub site_ids: Vec<String>,

    /// SentinelOne account ids
    #[arg(long, num_args = 1..)]
    pub account_ids: Vec<String>,

    /// SentinelOne account names
    #[arg(long, num_args = 1..)]
    pub account_names: Vec<String>,
}

/// Product-specific flags shared by `survey` and `check`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProductFlags {
    /// CBC device groups
    #[arg(long, num_args = 1..)]
    pub device_group: Vec<String>,

    /// CBC device policy
    #[arg(long)]
    pub device_policy: Option<String>,

    /// CBr sensor group
    #[arg(long)]
    pub sensor_group: Option<String>,

    /// Use SentinelOne Deep Visibility instead of PowerQuery
    #[arg(long)]
    pub dv: bool,
}

#[derive(Args)]
pub struct SurveyArgs {
    /// EDR to survey (cbc, cbr, cortex, dfe, s1)
    pub edr: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(flatten)]
    pub product: ProductFlags,

    /// Prefix for the results file name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Number of days to search
    #[arg(long)]
    pub days: Option<u32>,

    /// Number of minutes to search
    #[arg(long)]
    pub minutes: Option<u32>,

    /// Maximum number of results per query
    #[arg(long)]
    pub limit: Option<u32>,

    /// Only search this host
    #[arg(long)]
    pub hostname: Option<String>,

    /// Only search this user
    #[arg(long)]
    pub username: Option<String>,

    /// Run a single query directly
    #[arg(long)]
    pub query: Option<String>,

    /// Results file path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Results format (csv, json)
    #[arg(long)]
    pub output_format: Option<String>,

    /// Print results instead of writing a file
    #[arg(long)]
    pub no_file: bool,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Value appended to every result row
    #[arg(long)]
    pub namespace: Option<String>,

    /// File of indicators, one per line
    #[arg(long = "iocfile")]
    pub ioc_file: Option<PathBuf>,

    /// Indicator type in --iocfile (md5, ipaddr, domain)
    #[arg(long = "ioctype")]
    pub ioc_type: Option<String>,

    /// Definition file path, or the name of a built-in definition
    #[arg(long)]
    pub deffile: Option<PathBuf>,

    /// Directory of definition files
    #[arg(long)]
    pub defdir: Option<PathBuf>,

    /// Sigma rule file
    #[arg(long)]
    pub sigmarule: Option<PathBuf>,

    /// Directory of Sigma rule files
    #[arg(long)]
    pub sigmadir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// EDR to check against
    pub edr: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(flatten)]
    pub product: ProductFlags,

    /// API URL
    #[arg(long)]
    pub url: Option<String>,

    /// API token
    #[arg(long)]
    pub token: Option<String>,

    /// CBC org key
    #[arg(long)]
    pub org_key: Option<String>,

    /// Cortex API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Cortex API key id
    #[arg(long)]
    pub api_key_id: Option<String>,

    /// DFE tenant id
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// DFE app id
    #[arg(long)]
    pub app_id: Option<String>,

    /// DFE app secret
    #[arg(long)]
    pub app_secret: Option<String>,
}

#[derive(Args)]
pub struct BackendArgs {
    #[command(subcommand)]
    pub command: BackendCommands,
}

#[derive(Subcommand)]
pub enum BackendCommands {
    /// List supported EDRs
    List,

    /// Show details for one EDR
    Show(BackendShowArgs),
}

#[derive(Args)]
pub struct BackendShowArgs {
    /// EDR id
    pub backend: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
