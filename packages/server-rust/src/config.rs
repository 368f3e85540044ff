//! Server configuration from command-line flags and environment variables.

use std::time::Duration;

use clap::Parser;

use crate::logging::{LogFormat, LoggingConfig};
use crate::network::NetworkConfig;
use crate::pipeline::identity::DEFAULT_MODULE_SEGMENT;
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "api-server", about = "Recruitly API server")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "RECRUITLY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port. 0 picks a free port.
    #[arg(long, env = "RECRUITLY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Request timeout in seconds.
    #[arg(long, env = "RECRUITLY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Log filter directives.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "RECRUITLY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Segment of a request's type path logged as its module.
    #[arg(long, env = "RECRUITLY_MODULE_SEGMENT", default_value_t = DEFAULT_MODULE_SEGMENT)]
    pub module_segment: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn network(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    #[must_use]
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            filter: self.log_filter.clone(),
            format: self.log_format,
        }
    }

    #[must_use]
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            module_segment: self.module_segment,
        }
    }
}
