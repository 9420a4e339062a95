use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "rete-dash")]
#[command(version)]
#[command(about = "A live terminal dashboard for RETE engine telemetry", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "Monitoring server base URL (e.g. http://localhost:8080)")]
    pub url: Option<String>,

    #[arg(
        short = 'i',
        long,
        help = "Refresh interval for network/alert views (e.g. 10s, 30s)",
        value_parser = parse_duration
    )]
    pub interval: Option<Duration>,

    #[arg(
        long,
        help = "Delay before reconnecting the push channel (e.g. 5s)",
        value_parser = parse_duration
    )]
    pub reconnect_delay: Option<Duration>,

    #[arg(long, help = "Number of snapshots kept for charts")]
    pub history: Option<usize>,

    #[arg(long, help = "Run without the terminal UI and log updates instead")]
    pub headless: bool,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "RETE_DASH_CONFIG"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.server_url = url.clone();
        }
        if let Some(interval) = self.interval {
            config.poll_interval = interval;
        }
        if let Some(delay) = self.reconnect_delay {
            config.reconnect_delay = delay;
            if config.reconnect_max_delay < delay {
                config.reconnect_max_delay = delay;
            }
        }
        if let Some(history) = self.history {
            config.history_capacity = history;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "rete-dash",
            "--url",
            "http://engine:9000",
            "-i",
            "10s",
            "--reconnect-delay",
            "8s",
            "--history",
            "20",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.server_url, "http://engine:9000");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.reconnect_delay, Duration::from_secs(8));
        assert_eq!(config.reconnect_max_delay, Duration::from_secs(8));
        assert_eq!(config.history_capacity, 20);
        assert!(!cli.headless);
    }
}
