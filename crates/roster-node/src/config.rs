//! Node configuration.
//!
//! Every setting can come from a command-line flag or an environment
//! variable; the flag wins when both are set.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::observability::LogFormat;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default limit for JSON request bodies (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Roster Node - in-memory user management API
#[derive(Parser, Debug, Clone)]
#[command(name = "roster-node")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "ROSTER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// HTTP port
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Include panic details in 500 responses (debugging only)
    #[arg(long, env = "EXPOSE_ERRORS", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub expose_errors: bool,

    /// Maximum accepted JSON body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Config {
    /// Socket address the server listens on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override() {
        let config = Config::try_parse_from([
            "roster-node",
            "--host",
            "127.0.0.1",
            "--port",
            "4000",
            "--log-format",
            "json",
            "--expose-errors",
            "--max-body-bytes",
            "2048",
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:4000".parse().unwrap());
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.expose_errors);
        assert_eq!(config.max_body_bytes, 2048);
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Config::try_parse_from(["roster-node", "--port", "70000"]).is_err());
        assert!(Config::try_parse_from(["roster-node", "--port", "http"]).is_err());
    }
}
