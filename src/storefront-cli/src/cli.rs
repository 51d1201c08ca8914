//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::CliConfig;
use crate::suggest_cmd::SuggestCommand;

/// Storefront search suggestions from the terminal.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Storefront API base URL (overrides config and environment).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print suggestions for the trailing word of TEXT.
    Suggest(SuggestCommand),

    /// Full-screen search box with live suggestions.
    Interactive,
}

impl Cli {
    /// Whether the selected command owns the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Command::Interactive)
    }

    /// Resolve configuration: file, then environment, then `--api-url`.
    pub fn load_config(&self) -> Result<CliConfig> {
        self.load_config_with(|key| std::env::var(key).ok())
    }

    /// Like [`Cli::load_config`] with an explicit environment lookup.
    pub fn load_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<CliConfig> {
        let mut config = CliConfig::resolve(self.config.as_deref())?;
        config.apply_overrides(lookup);
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_API_URL;
    use crate::suggest_cmd::OutputFormat;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_suggest() {
        let cli = Cli::try_parse_from(["storefront", "suggest", "milk", "and", "che", "--format", "json"])
            .unwrap();
        let Command::Suggest(cmd) = &cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(cmd.text, vec!["milk", "and", "che"]);
        assert_eq!(cmd.format, OutputFormat::Json);
        assert_eq!(cli.log_level, "info");
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_suggest_requires_text() {
        assert!(Cli::try_parse_from(["storefront", "suggest"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storefront",
            "interactive",
            "--api-url",
            "http://127.0.0.1:9/api",
            "--json-logs",
        ])
        .unwrap();
        assert!(cli.is_interactive());
        assert!(cli.json_logs);
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9/api"));
    }

    #[test]
    fn test_precedence_flag_over_env_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"https://file.example/api\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let env = |key: &str| (key == ENV_API_URL).then(|| "https://env.example/api".to_string());

        let cli = Cli::try_parse_from(["storefront", "--config", &path, "interactive"]).unwrap();
        assert_eq!(cli.load_config_with(|_| None).unwrap().api.base_url, "https://file.example/api");
        assert_eq!(cli.load_config_with(env).unwrap().api.base_url, "https://env.example/api");

        let cli = Cli::try_parse_from([
            "storefront",
            "--config",
            &path,
            "--api-url",
            "https://flag.example/api",
            "interactive",
        ])
        .unwrap();
        assert_eq!(cli.load_config_with(env).unwrap().api.base_url, "https://flag.example/api");
    }
}
