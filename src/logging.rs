use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the logging system
///
/// Stdout carries the relay protocol, so logs only ever go to stderr or a
/// file.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter (e.g., "debug", "info", "warn", "error")
    pub level: String,
    /// Optional log file path. If None, logs only to stderr
    pub file_path: Option<PathBuf>,
    /// Whether to use structured JSON format for logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Create LogConfig from `RUST_LOG`, `MCP_LOG_FILE`, `MCP_LOG_UNIQUE`
    /// and `MCP_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_path = env::var("MCP_LOG_FILE").ok().map(|path| {
            let path = PathBuf::from(path);
            // Add process ID if MCP_LOG_UNIQUE is set
            if env_flag("MCP_LOG_UNIQUE") {
                with_pid_suffix(&path, std::process::id())
            } else {
                path
            }
        });

        Self {
            level,
            file_path,
            json_format: env_flag("MCP_LOG_JSON"),
        }
    }

    /// Override values from CLI arguments
    pub fn with_overrides(mut self, level: Option<String>, file_path: Option<PathBuf>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(file_path) = file_path {
            self.file_path = Some(file_path);
        }
        self
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|value| value == "true")
}

/// Insert the process id before the extension: `relay.log` -> `relay.<pid>.log`
fn with_pid_suffix(path: &Path, pid: u32) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let file_name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) => format!("{}.{}.{}", stem.to_string_lossy(), pid, extension),
        None => format!("{}.{}", stem.to_string_lossy(), pid),
    };
    path.with_file_name(file_name)
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the logging system based on configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create environment filter from log level
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = tracing_subscriber::registry().with(env_filter);

    // Build the subscriber based on configuration
    match (&config.file_path, config.json_format) {
        // File + JSON format
        (Some(file_path), true) => {
            let file_layer = fmt::layer()
                .json()
                .with_writer(open_log_file(file_path)?)
                .with_ansi(false);
            subscriber.with(file_layer).init();
        }
        // File + human readable format
        (Some(file_path), false) => {
            let file_layer = fmt::layer()
                .with_writer(open_log_file(file_path)?)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            subscriber.with(file_layer).init();
        }
        // Stderr only + JSON format
        (None, true) => {
            let stderr_layer = fmt::layer().json().with_writer(io::stderr).with_ansi(false);
            subscriber.with(stderr_layer).init();
        }
        // Stderr only + human readable format (default)
        (None, false) => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(true)
                .with_line_number(true);
            subscriber.with(stderr_layer).init();
        }
    }

    Ok(())
}

/// Log one relay message (inbound line or outbound response) in one line
#[macro_export]
macro_rules! log_relay_message {
    ($level:expr, $direction:expr, $method:expr, $data:expr) => {
        tracing::event!(
            $level,
            direction = $direction,
            method = $method,
            data = ?$data,
            pid = std::process::id(),
            "Relay message"
        );
    };
}

/// Log performance timing
#[macro_export]
macro_rules! log_timing {
    ($level:expr, $operation:expr, $duration:expr) => {
        tracing::event!(
            $level,
            operation = $operation,
            duration_ms = $duration.as_millis(),
            pid = std::process::id(),
            "Performance timing"
        );
    };
}
