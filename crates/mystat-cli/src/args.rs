//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mystat_connection::{BackoffStrategy, ReconnectConfig};
use mystat_core::{ConnectionConfig, InstanceAddr};
use mystat_monitor::{
    DEFAULT_CYCLES_PER_EPOCH, DEFAULT_PAGE_SIZE_KB, DeltaConfig, FileSink, SamplerConfig,
    TableSchema,
};

use crate::logging::LoggingConfig;

const USAGE_HINT: &str = "Usage: mystat -H 10.0.0.201:3306";

/// Sample MySQL performance counters into a fixed-width table
#[derive(Parser, Debug, Clone)]
#[command(name = "mystat", version, about, long_about = None)]
pub struct Args {
    /// Instance to monitor, as host:port
    #[arg(short = 'H', long, env = "MYSTAT_HOST", value_parser = parse_instance_addr)]
    pub host: InstanceAddr,

    /// Login user
    #[arg(short, long, env = "MYSTAT_USER", default_value = "dba_ro")]
    pub user: String,

    /// Login password
    #[arg(short, long, env = "MYSTAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds between rows
    #[arg(
        short,
        long,
        env = "MYSTAT_INTERVAL",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(2..)
    )]
    pub interval: u64,

    /// Append rows to <host>_<port>_mysql_stat.log instead of stdout
    #[arg(short, long, env = "MYSTAT_OUTPUT")]
    pub output: bool,

    /// Directory for the output file
    #[arg(long, env = "MYSTAT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Add replication lag and buffer pool columns
    #[arg(short = 'x', long, env = "MYSTAT_EXTENDED")]
    pub extended: bool,

    /// Stop after this many rows
    #[arg(
        short = 'c',
        long,
        env = "MYSTAT_COUNT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub count: Option<u64>,

    /// Rows sampled over one connection before reconnecting
    #[arg(
        long,
        env = "MYSTAT_CYCLES_PER_CONNECTION",
        default_value_t = DEFAULT_CYCLES_PER_EPOCH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cycles_per_connection: u32,

    /// InnoDB page size used for buffer pool MB figures
    #[arg(
        long,
        env = "MYSTAT_PAGE_SIZE_KB",
        default_value_t = DEFAULT_PAGE_SIZE_KB,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub page_size_kb: u64,

    /// Connection retries before giving up
    #[arg(long, env = "MYSTAT_CONNECT_RETRIES", default_value_t = 3)]
    pub connect_retries: u32,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write JSON diagnostics to the log directory
    #[arg(long, env = "MYSTAT_LOG_JSON")]
    pub log_json: bool,
}

fn parse_instance_addr(s: &str) -> Result<InstanceAddr, String> {
    s.parse::<InstanceAddr>()
        .map_err(|e| format!("{}\n{}", e, USAGE_HINT))
}

impl Args {
    pub fn connection_config(&self) -> ConnectionConfig {
        let config = ConnectionConfig::new(self.host.clone(), self.user.clone());
        match &self.password {
            Some(password) => config.with_password(password.clone()),
            None => config,
        }
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        let config = SamplerConfig::new(Duration::from_secs(self.interval))
            .with_cycles_per_epoch(self.cycles_per_connection)
            .with_reconnect(ReconnectConfig::new(
                self.connect_retries,
                BackoffStrategy::default(),
            ))
            .with_delta(DeltaConfig::new(self.page_size_kb));
        match self.count {
            Some(count) => config.with_max_rows(count),
            None => config,
        }
    }

    pub fn schema(&self) -> TableSchema {
        if self.extended {
            TableSchema::extended()
        } else {
            TableSchema::canonical()
        }
    }

    /// The append target when `--output` is set
    pub fn file_sink(&self) -> Option<FileSink> {
        self.output
            .then(|| FileSink::for_instance(&self.output_dir, &self.host))
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::for_verbosity(self.verbose).with_json_logs(self.log_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec!["mystat"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-H", "10.0.0.201:3306"]).unwrap();

        assert_eq!(args.host, InstanceAddr::new("10.0.0.201", 3306));
        assert_eq!(args.user, "dba_ro");
        assert_eq!(args.interval, 5);
        assert!(!args.output);
        assert!(!args.extended);
        assert_eq!(args.count, None);
        assert_eq!(args.cycles_per_connection, 20);
        assert_eq!(args.page_size_kb, 16);
        assert_eq!(args.connect_retries, 3);
        assert!(args.file_sink().is_none());
    }

    #[test]
    fn test_address_without_port_is_usage_error() {
        let err = parse(&["-H", "10.0.0.201"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains(USAGE_HINT));
    }

    #[test]
    fn test_interval_must_exceed_one_second() {
        let err = parse(&["-H", "db:3306", "-i", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["-H", "db:3306", "-i", "2"]).unwrap().interval, 2);
    }

    #[test]
    fn test_sampler_config_from_flags() {
        let args = parse(&[
            "-H",
            "db:3306",
            "-i",
            "10",
            "-c",
            "5",
            "--cycles-per-connection",
            "3",
            "--page-size-kb",
            "64",
            "--connect-retries",
            "0",
        ])
        .unwrap();

        let config = args.sampler_config();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.max_rows, Some(5));
        assert_eq!(config.cycles_per_epoch, 3);
        assert_eq!(config.delta.page_size_kb, 64);
        assert_eq!(config.reconnect.max_attempts(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_config_from_flags() {
        let args = parse(&["-H", "db:3307", "-u", "monitor", "-p", "s3cret"]).unwrap();
        let config = args.connection_config();

        assert_eq!(config.host(), "db");
        assert_eq!(config.port(), 3307);
        assert_eq!(config.user, "monitor");
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert_eq!(config.charset, "utf8mb4");
    }

    #[test]
    fn test_output_file_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let args = parse(&[
            "-H",
            "10.0.0.201:3306",
            "-o",
            "--output-dir",
            dir_arg.as_str(),
        ])
        .unwrap();

        assert_eq!(
            args.file_sink().map(|sink| sink.path().to_path_buf()),
            Some(dir.path().join("10.0.0.201_3306_mysql_stat.log"))
        );
    }

    #[test]
    fn test_extended_schema() {
        assert_eq!(parse(&["-H", "db:3306"]).unwrap().schema().column_count(), 24);
        assert_eq!(parse(&["-H", "db:3306", "-x"]).unwrap().schema().column_count(), 31);
    }

    #[test]
    fn test_verbosity_selects_filter() {
        let quiet = parse(&["-H", "db:3306"]).unwrap().logging_config();
        let chatty = parse(&["-H", "db:3306", "-vv", "--log-json"])
            .unwrap()
            .logging_config();

        assert_eq!(quiet.default_filter, "warn");
        assert!(!quiet.enable_json_logs);
        assert!(chatty.default_filter.starts_with("info"));
        assert!(chatty.default_filter.contains("mystat_monitor=debug"));
        assert!(chatty.enable_json_logs);
    }
}
