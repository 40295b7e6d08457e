//! Main CLI parser.
//!
//! Every flag can also come from the environment (or a `.env` file), which
//! is handy when the program is started from a desktop shortcut.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ytgrab_axum::ServerConfig;
use ytgrab_axum::bootstrap::{DEFAULT_HOST, DEFAULT_PORT};

/// Local web front end for youtube-dl.
#[derive(Debug, Parser)]
#[command(name = "ytgrab")]
#[command(about = "Download videos and audio through a local web page")]
#[command(version)]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "YTGRAB_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "YTGRAB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the youtube-dl executable (defaults to the one beside this program)
    #[arg(long)]
    pub downloader: Option<PathBuf>,

    /// Directory downloaded files are written to
    #[arg(short, long = "output-dir", env = "YTGRAB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Abort a download after this many minutes
    #[arg(
        long = "timeout-minutes",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_minutes: u64,

    /// Origin allowed to call the API cross-origin (repeatable, `*` for any)
    #[arg(long = "allow-origin")]
    pub allow_origins: Vec<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Server configuration described by these flags.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            downloader: self.downloader.clone(),
            output_dir: self.output_dir.clone(),
            job_timeout: Duration::from_secs(self.timeout_minutes * 60),
            ..ServerConfig::default()
        }
        .with_allowed_origins(self.allow_origins.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ytgrab_axum::CorsConfig;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["ytgrab"]);
        let config = cli.server_config();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.job_timeout, Duration::from_secs(3600));
        assert_eq!(config.cors, CorsConfig::SameOrigin);
        assert!(config.downloader.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "ytgrab",
            "-v",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--downloader",
            "/opt/yt/youtube-dl",
            "--output-dir",
            "/tmp/videos",
            "--timeout-minutes",
            "5",
            "--allow-origin",
            "http://localhost:3000",
        ]);
        let config = cli.server_config();
        assert!(cli.verbose);
        assert_eq!(config.address(), "0.0.0.0:9000");
        assert_eq!(config.downloader, Some(PathBuf::from("/opt/yt/youtube-dl")));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/videos")));
        assert_eq!(config.job_timeout, Duration::from_secs(300));
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec!["http://localhost:3000".to_string()])
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["ytgrab", "--timeout-minutes", "0"]).is_err());
    }
}
