//! Implementation of the configuration module.

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::diagnostics::Mode;

/// Represents the configuration for the `cfn-check` command line tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// Configuration for the `check` command.
    #[serde(default)]
    pub check: CheckConfig,
    /// Configuration for template analysis.
    #[serde(default)]
    pub analysis: cfn_analysis::Config,
}

/// Represents the configuration for the `check` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Causes the command to fail if any warnings are reported.
    pub deny_warnings: bool,
    /// Hide diagnostics with `hint` severity.
    pub hide_hints: bool,
    /// Disables color output.
    pub no_color: bool,
    /// The report mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_mode: Option<Mode>,
}

impl Config {
    /// Read a configuration file from the specified path.
    pub fn read_config(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| {
            format!(
                "failed to read config file `{path}`",
                path = path.display()
            )
        })?;

        toml::from_str(&text).with_context(|| {
            format!(
                "failed to parse config file `{path}`",
                path = path.display()
            )
        })
    }

    /// Write a configuration to the specified path.
    pub fn write_config(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = toml::to_string(self).context("failed to serialize config")?;
        std::fs::write(path, data).context("failed to write config file")
    }
}
