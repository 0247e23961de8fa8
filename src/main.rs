use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use navsync::config::{Config, LoggingConfig, SerializerKind};
use navsync::logging::init_tracing;
use navsync::router::RouteTable;
use navsync::scenario::{run_scenario, Scenario};

#[derive(Parser, Debug)]
#[command(name = "navsync", version, about = "Replay router and store synchronization scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario and print the report as JSON
    Replay {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Config file (default: platform config dir)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Override the router slot key
        #[arg(long, value_name = "KEY")]
        state_key: Option<String>,

        /// Override the router state serializer
        #[arg(long, value_enum)]
        serializer: Option<SerializerKind>,
    },
    /// Print a scenario's route table as JSON
    Routes {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            scenario,
            config,
            state_key,
            serializer,
        } => {
            let mut config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            if let Some(state_key) = state_key {
                config.router_store.state_key = state_key;
            }
            if let Some(serializer) = serializer {
                config.router_store.serializer = serializer;
            }
            config.validate()?;
            init_tracing(&config.logging);

            let scenario = Scenario::load(&scenario)?;
            let report = run_scenario(&scenario, &config)
                .with_context(|| format!("Scenario '{}' failed", scenario.name))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Routes { scenario } => {
            init_tracing(&LoggingConfig::default());

            let scenario = Scenario::load(&scenario)?;
            let table = RouteTable::new(scenario.routes)?;
            println!("{}", serde_json::to_string_pretty(table.routes())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_accepts_overrides() {
        let cli = Cli::parse_from([
            "navsync",
            "replay",
            "flow.toml",
            "--state-key",
            "nav",
            "--serializer",
            "minimal",
        ]);
        match cli.command {
            Command::Replay {
                scenario,
                state_key,
                serializer,
                config,
            } => {
                assert_eq!(scenario, PathBuf::from("flow.toml"));
                assert_eq!(state_key.as_deref(), Some("nav"));
                assert_eq!(serializer, Some(SerializerKind::Minimal));
                assert!(config.is_none());
            }
            other => panic!("expected replay, got {:?}", other),
        }
    }

    #[test]
    fn unknown_serializer_is_rejected() {
        let result = Cli::try_parse_from(["navsync", "replay", "flow.toml", "--serializer", "full"]);
        assert!(result.is_err());
    }
}
