//! Error handling for the network monitor

use thiserror::Error;

/// Custom error types for the network monitor
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An optional capability (e.g. the ping utility) is missing
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// A transport channel (process, socket, HTTP client) could not be opened
    #[error("Transport error: {0}")]
    TransportOpen(String),

    /// The remote side answered with a non-success status
    #[error("Remote status failure: {0}")]
    RemoteStatus(String),

    /// A bounded wait elapsed without a reply
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Name resolution failures
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Interface enumeration failures
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (addresses, counters, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new capability-unavailable error
    pub fn capability<S: Into<String>>(message: S) -> Self {
        Self::CapabilityUnavailable(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::TransportOpen(message.into())
    }

    /// Create a new remote-status error
    pub fn remote_status<S: Into<String>>(message: S) -> Self {
        Self::RemoteStatus(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new resolver error
    pub fn resolver<S: Into<String>>(message: S) -> Self {
        Self::Resolver(message.into())
    }

    /// Create a new enumeration error
    pub fn enumeration<S: Into<String>>(message: S) -> Self {
        Self::Enumeration(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::CapabilityUnavailable(_) => "CAPABILITY",
            Self::TransportOpen(_) => "TRANSPORT",
            Self::RemoteStatus(_) => "STATUS",
            Self::Timeout(_) => "TIMEOUT",
            Self::Resolver(_) => "RESOLVER",
            Self::Enumeration(_) => "ENUM",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if the error is recoverable at the tick level.
    ///
    /// Every probe failure is recoverable: the loop folds it into the
    /// snapshot and keeps running. Only configuration and internal
    /// errors terminate the process.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::CapabilityUnavailable(_)
            | Self::TransportOpen(_)
            | Self::RemoteStatus(_)
            | Self::Timeout(_)
            | Self::Resolver(_)
            | Self::Enumeration(_) => true,
            Self::Config(_) | Self::Io(_) | Self::Parse(_) | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1, // Invalid configuration/usage
            Self::TransportOpen(_) | Self::RemoteStatus(_) | Self::Resolver(_) => 2, // Network issues
            Self::Timeout(_) => 3,
            Self::CapabilityUnavailable(_) => 4,
            Self::Io(_) | Self::Enumeration(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::TransportOpen(_) | Self::RemoteStatus(_) | Self::Resolver(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::CapabilityUnavailable(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Io(_) | Self::Enumeration(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<std::net::AddrParseError> for AppError {
    fn from(error: std::net::AddrParseError) -> Self {
        Self::parse(format!("IP address parse error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_connect() || error.is_builder() {
            Self::transport(error.to_string())
        } else {
            Self::remote_status(error.to_string())
        }
    }
}

impl From<trust_dns_resolver::error::ResolveError> for AppError {
    fn from(error: trust_dns_resolver::error::ResolveError) -> Self {
        Self::resolver(error.to_string())
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;
