use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::source::SourceKind;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the battery level (-1 when unknown)
    Level,

    /// Print level, charging and plugged-in state as JSON
    Info {
        /// Single-line JSON output
        #[arg(short, long)]
        compact: bool,
    },

    /// Dispatch one method channel call and print the response
    Call {
        /// Method name, e.g. getBatteryLevel
        method: String,

        /// Call arguments as JSON
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Answer JSON-lines method calls on stdio or a Unix socket
    Serve {
        /// Listen on this Unix socket instead of stdio
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },

    /// Show config file contents
    Config {
        /// Print the config file path only
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Print source, raw reading and derived snapshot
    Debug,
}

#[derive(Debug, Parser)]
#[command(name = "juice", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Battery API to query
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceKind>,

    /// Use fixed values instead of the OS, as status:level (e.g. full:87)
    #[arg(long, global = true)]
    pub simulate: Option<String>,

    /// Method channel name to answer on
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call_with_globals() {
        let cli = Cli::try_parse_from([
            "juice",
            "call",
            "getBatteryInfo",
            "--simulate",
            "full:87",
            "--source",
            "system",
        ])
        .unwrap();

        assert_eq!(cli.simulate.as_deref(), Some("full:87"));
        assert_eq!(cli.source, Some(SourceKind::System));
        match cli.command {
            Commands::Call { method, args } => {
                assert_eq!(method, "getBatteryInfo");
                assert_eq!(args, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_socket() {
        let cli = Cli::try_parse_from(["juice", "serve", "--socket", "/tmp/juice.sock"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { socket: Some(ref p) } if p == &PathBuf::from("/tmp/juice.sock")
        ));
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["juice"]).is_err());
    }
}
