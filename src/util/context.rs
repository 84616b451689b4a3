//! Global context for Surveyor operations.
//!
//! Resolves where configuration lives for the current invocation and where
//! the bundled definition files are.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::util::config::{load_config, Config};

/// Name of the built-in definitions directory.
pub const DEFINITIONS_DIR_NAME: &str = "definitions";

/// Paths Surveyor reads configuration and definitions from.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Surveyor data (~/.surveyor/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".surveyor"))
            .unwrap_or_else(|| PathBuf::from(".surveyor"));

        Ok(GlobalContext { cwd, home })
    }

    #[cfg(test)]
    fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    #[cfg(test)]
    fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local Surveyor directory.
    pub fn project_surveyor_dir(&self) -> PathBuf {
        self.cwd.join(".surveyor")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_surveyor_dir().join("config.toml")
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }

    /// Locate the definition files shipped with Surveyor.
    ///
    /// Looks next to the installed executable first, then falls back to the
    /// source checkout this binary was built from.
    pub fn builtin_definitions_dir(&self) -> PathBuf {
        let installed = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFINITIONS_DIR_NAME)));

        match installed {
            Some(dir) if dir.is_dir() => dir,
            _ => Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFINITIONS_DIR_NAME),
        }
    }
}
