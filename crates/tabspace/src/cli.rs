//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Tabspace - drive a tab workspace from the terminal
#[derive(Debug, Parser)]
#[command(name = "tabspace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Menu tree (JSON) defining the available pages; a demo menu is used if omitted
    #[arg(long, value_name = "FILE")]
    pub menu: Option<PathBuf>,

    /// Workspace configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the maximum number of open tabs
    #[arg(long, value_name = "N")]
    pub max_tabs: Option<usize>,

    /// Directory holding the session database
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter (overrides TABSPACE_LOG and RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    /// Explicit log filter. Without one, and without an environment override,
    /// the console stays quiet so log lines do not interleave with prompts.
    pub fn log_filter(&self) -> Option<String> {
        if self.log.is_some() {
            return self.log.clone();
        }
        let env_set = ["TABSPACE_LOG", "RUST_LOG"].iter().any(|var| std::env::var_os(var).is_some());
        (!env_set).then(|| "warn".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "tabspace",
            "--menu",
            "menu.json",
            "--max-tabs",
            "4",
            "--log",
            "debug",
        ]);
        assert_eq!(cli.menu, Some(PathBuf::from("menu.json")));
        assert_eq!(cli.max_tabs, Some(4));
        assert_eq!(cli.log_filter().as_deref(), Some("debug"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tabspace"]);
        assert!(cli.menu.is_none());
        assert!(cli.config.is_none());
        assert!(cli.data_dir.is_none());
    }
}
