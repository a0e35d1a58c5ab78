use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for kindred-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub request_timeout: Option<u64>,
    pub seed_demo: bool,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Self::command().get_matches();

        // Handle special help for environment variables
        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self {
            port: matches.get_one::<u16>("port").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            request_timeout: matches.get_one::<u64>("request_timeout").copied(),
            seed_demo: matches.get_flag("seed_demo"),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    fn command() -> Command {
        Command::new("kindred-server")
            .version(kindred::VERSION)
            .about("HTTP API server for the Kindred genealogical graph engine")
            .long_about(
                r#"Kindred Server exposes family members, parent/child relationships and
partnerships over a JSON REST API, together with the render-ready family graph.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.

Examples:
  kindred-server --port 8080
  kindred-server --config kindred.toml --seed-demo
  kindred-server --log-level debug"#,
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: KINDRED_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .long_help(
                        "Path to a Kindred configuration file (toml, yaml or json).
Environment variable: KINDRED_CONFIG_FILE",
                    )
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("max_request_size")
                    .long("max-request-size")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies.
Larger requests will be rejected.
Environment variable: KINDRED_MAX_REQUEST_SIZE",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("request_timeout")
                    .long("request-timeout")
                    .value_name("SECONDS")
                    .help("Request timeout in seconds")
                    .long_help(
                        "Requests still running after this many seconds are aborted.
Environment variable: KINDRED_REQUEST_TIMEOUT",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("seed_demo")
                    .long("seed-demo")
                    .help("Load the demo family into an empty store")
                    .long_help(
                        "Seed the record store with the demo family on startup.
Ignored when the store already holds members.
Environment variable: KINDRED_SEED_DEMO",
                    )
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Print environment variable help
    fn print_env_help() {
        println!("Kindred Server Environment Variables");
        println!("====================================");
        println!();
        println!("Server Configuration:");
        println!("  KINDRED_PORT                 - Server port (default: 3000)");
        println!("  KINDRED_MAX_REQUEST_SIZE     - Max request body size in bytes (default: 1MB)");
        println!("  KINDRED_REQUEST_TIMEOUT      - Request timeout in seconds (default: 30)");
        println!("  KINDRED_CONFIG_FILE          - Path to config file");
        println!("  KINDRED_SEED_DEMO            - Seed the demo family (default: false)");
        println!();
        println!("Library Configuration (nested keys use a double underscore):");
        println!("  KINDRED_STORAGE__BACKEND       - memory or surrealdb (default: memory)");
        println!("  KINDRED_STORAGE__SNAPSHOT_PATH - JSON snapshot for the memory backend");
        println!("  KINDRED_GRAPH__MAX_PARENTS     - Parent cap per member (default: 2)");
        println!("  KINDRED_GRAPH__MEMBER_DELETION - restrict or cascade (default: restrict)");
        println!("  KINDRED_LOGGING__LEVEL         - Log level (default: info)");
        println!();
        println!("Logging:");
        println!("  RUST_LOG                     - Overrides the configured log filter");
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parses_flags() {
        let matches = CliArgs::command()
            .try_get_matches_from([
                "kindred-server",
                "--port",
                "8080",
                "--seed-demo",
                "--log-level",
                "debug",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert!(matches.get_flag("seed_demo"));
        assert_eq!(
            matches.get_one::<String>("log_level").map(String::as_str),
            Some("debug")
        );
    }

    #[test]
    fn test_command_rejects_unknown_level() {
        let result =
            CliArgs::command().try_get_matches_from(["kindred-server", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
