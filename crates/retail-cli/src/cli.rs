//! CLI argument definitions for the retail ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use retail_cli::config::EtlConfig;
use retail_persistence::StoreDriver;

#[derive(Parser)]
#[command(
    name = "retail-etl",
    version,
    about = "Load, clean and store the retail sales CSV exports",
    long_about = "Load the retail sales CSV exports, normalize column names and missing \
                  values, optionally store each dataset in MySQL, PostgreSQL or SQLite, \
                  and print a summary.\n\n\
                  Files of unknown encoding are decoded with the first encoding that \
                  reads them cleanly."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline: load, normalize, optionally persist, report.
    Run(RunArgs),

    /// List the configured datasets and whether their files are present.
    Datasets(DatasetsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding the CSV files (overrides `data_dir`).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Store every normalized dataset in the configured database.
    #[arg(long = "persist")]
    pub persist: bool,

    /// Load files one after another instead of in parallel.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Database driver.
    #[arg(long = "driver", value_enum)]
    pub driver: Option<DriverArg>,

    #[arg(long = "db-host", value_name = "HOST")]
    pub db_host: Option<String>,

    #[arg(long = "db-port", value_name = "PORT")]
    pub db_port: Option<u16>,

    #[arg(long = "db-user", value_name = "USER")]
    pub db_user: Option<String>,

    /// Database name, or the database file for SQLite.
    #[arg(long = "db-name", value_name = "NAME")]
    pub db_name: Option<String>,

    /// Full connection URL (overrides the other --db-* flags).
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

impl RunArgs {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply_to(&self, config: &mut EtlConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir.clone_from(dir);
        }
        if self.sequential {
            config.parallel_load = false;
        }
        let store = &mut config.store;
        if let Some(driver) = self.driver {
            let driver = StoreDriver::from(driver);
            // Follow the driver's port unless a port was chosen explicitly.
            if store.driver.default_port() == Some(store.port)
                && let Some(port) = driver.default_port()
            {
                store.port = port;
            }
            store.driver = driver;
        }
        if let Some(host) = &self.db_host {
            store.host.clone_from(host);
        }
        if let Some(port) = self.db_port {
            store.port = port;
        }
        if let Some(user) = &self.db_user {
            store.user.clone_from(user);
        }
        if let Some(name) = &self.db_name {
            store.database.clone_from(name);
        }
        if let Some(url) = &self.database_url {
            store.url = Some(url.clone());
        }
    }
}

#[derive(Parser)]
pub struct DatasetsArgs {
    /// TOML configuration file.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DriverArg {
    Mysql,
    Postgres,
    Sqlite,
}

impl From<DriverArg> for StoreDriver {
    fn from(value: DriverArg) -> Self {
        match value {
            DriverArg::Mysql => Self::Mysql,
            DriverArg::Postgres => Self::Postgres,
            DriverArg::Sqlite => Self::Sqlite,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_driver_switch_follows_default_port() {
        let cli = parse(&["retail-etl", "run", "--driver", "postgres", "--db-host", "db"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let mut config = EtlConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.store.driver, StoreDriver::Postgres);
        assert_eq!(config.store.port, 5432);
        assert_eq!(config.store.host, "db");
    }

    #[test]
    fn test_explicit_port_wins() {
        let cli = parse(&[
            "retail-etl", "run", "data", "--driver", "postgres", "--db-port", "6543",
            "--sequential",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let mut config = EtlConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.store.port, 6543);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.parallel_load);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["retail-etl", "datasets", "--log-format", "json", "-v"]);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.verbosity.is_present());
    }
}
