mod classify;
mod config;
mod db;
mod dispatch;
mod error;
mod render;
mod repl;
mod shortcuts;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::Configuration;
use db::DatabaseConnection;
use dispatch::Dispatcher;
use render::OutputMode;
use repl::{Repl, TerminalInput};
use shortcuts::Shortcuts;

#[derive(Debug, Parser)]
#[command(name = "sqlsh", version, about = "Interactive SQL shell with shortcut macros")]
struct Cli {
    /// Path to the JSON configuration file [default: ~/.sqlsh_config.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connection url, used instead of the configuration file
    #[arg(long)]
    url: Option<String>,

    /// Initial output mode for query results
    #[arg(short, long, value_enum)]
    format: Option<OutputMode>,

    /// Do not read or write the history file
    #[arg(long)]
    no_history: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_configuration(&cli)?;
    let conn = DatabaseConnection::open(&config).await?;

    let result = run_shell(&conn, &config, &cli).await;

    conn.close().await;

    result
}

fn load_configuration(cli: &Cli) -> Result<Configuration> {
    if let Some(url) = &cli.url {
        return Ok(Configuration::from_url(url.clone()));
    }
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Configuration::default_path()?,
    };
    Ok(Configuration::load(&path)?)
}

async fn run_shell(conn: &DatabaseConnection, config: &Configuration, cli: &Cli) -> Result<()> {
    let mut shortcuts = Shortcuts::builtin();
    for shortcut in &config.shortcuts {
        shortcuts.register(shortcut.clone());
    }

    let mode = cli.format.or(config.format).unwrap_or_default();
    let history_path = if cli.no_history {
        None
    } else {
        TerminalInput::default_history_path()
    };

    let mut input = TerminalInput::new(history_path)?;
    let mut repl = Repl::new(Dispatcher::new(conn), shortcuts, mode);
    repl.run(&mut input, &mut io::stdout(), &mut io::stderr()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_flag_skips_config_file() {
        let cli = Cli::parse_from([
            "sqlsh",
            "--url",
            "sqlite::memory:",
            "--config",
            "/nonexistent",
        ]);
        let config = load_configuration(&cli).unwrap();
        assert_eq!(config.url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_missing_config_file_fails() {
        let cli = Cli::parse_from(["sqlsh", "--config", "/nonexistent/sqlsh.json"]);
        assert!(load_configuration(&cli).is_err());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::parse_from([
            "sqlsh",
            "--url",
            "sqlite::memory:",
            "-f",
            "csv",
            "--no-history",
        ]);
        assert_eq!(cli.format, Some(OutputMode::Csv));
        assert!(cli.no_history);
    }
}
