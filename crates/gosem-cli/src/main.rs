//! gosem: semantic token classification for Go source.

mod commands_config;
mod commands_serve;
mod commands_tokenize;
mod protocol;

use clap::{Parser, Subcommand};
use gosem_core::GosemConfig;
use std::path::PathBuf;

const DEFAULT_LOG_DIRECTIVE: &str = "gosem=info";

#[derive(Parser)]
#[command(
    name = "gosem",
    about = "Classify Go identifiers into semantic token categories"
)]
#[command(version, propagate_version = true)]
struct Cli {
    /// Defaults to `tokenize` reading stdin
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a Go buffer and print its category table as JSON
    Tokenize {
        /// Read this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Answer newline-delimited tokenize requests on stdin, or over TCP
    Serve {
        /// Listen on this localhost port instead of stdio (53827 when no value is given)
        #[arg(short, long)]
        port: Option<Option<u16>>,
    },

    /// Read or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a configuration value (dot path, e.g. `catalog.embedded`)
    Get { key: String },
    /// Set a configuration value and save the config file
    Set { key: String, value: String },
}

fn main() -> anyhow::Result<()> {
    let config = GosemConfig::load_or_default();

    // stdout is reserved for JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                config.log.filter.parse().unwrap_or_else(|_| {
                    DEFAULT_LOG_DIRECTIVE
                        .parse()
                        .expect("valid tracing directive")
                }),
            ),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tokenize { file: None }) {
        Commands::Tokenize { file } => {
            commands_tokenize::cmd_tokenize(file.as_deref(), &config)?;
        }
        Commands::Serve { port } => {
            let port = port.map(|p| p.unwrap_or(commands_serve::DEFAULT_PORT));
            commands_serve::cmd_serve(&config, port)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Get { key } => commands_config::cmd_config_get(&key)?,
            ConfigAction::Set { key, value } => commands_config::cmd_config_set(&key, &value)?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_tokenize() {
        let cli = Cli::try_parse_from(["gosem"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn tokenize_accepts_file() {
        let cli = Cli::try_parse_from(["gosem", "tokenize", "--file", "main.go"]).unwrap();
        match cli.command {
            Some(Commands::Tokenize { file }) => {
                assert_eq!(file, Some(PathBuf::from("main.go")));
            }
            _ => panic!("Expected Tokenize command"),
        }
    }

    #[test]
    fn config_set_parses_key_and_value() {
        let cli =
            Cli::try_parse_from(["gosem", "config", "set", "catalog.embedded", "false"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "catalog.embedded");
                assert_eq!(value, "false");
            }
            _ => panic!("Expected Config Set command"),
        }
    }

    fn serve_port(args: &[&str]) -> Option<Option<u16>> {
        match Cli::try_parse_from(args).unwrap().command {
            Some(Commands::Serve { port }) => port,
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn serve_defaults_to_stdio() {
        assert_eq!(serve_port(&["gosem", "serve"]), None);
        assert!(Cli::try_parse_from(["gosem", "serve", "extra"]).is_err());
    }

    #[test]
    fn serve_port_flag() {
        assert_eq!(serve_port(&["gosem", "serve", "--port"]), Some(None));
        assert_eq!(serve_port(&["gosem", "serve", "-p", "9000"]), Some(Some(9000)));
        assert!(Cli::try_parse_from(["gosem", "serve", "--port", "70000"]).is_err());
    }
}
