use std::{
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use anyhow::{Context, Result};
use chrono::Local;
use compact_str::CompactString;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tokio::fs as TokioFs;
use tracing::{Event, Level, Subscriber, field::Visit};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::MakeWriter,
    layer::{Context as TracingContext, SubscriberExt},
    util::SubscriberInitExt,
};

const LEVEL_INFO: &str = "INFO";
const LEVEL_DEBUG: &str = "DEBUG";
const LEVEL_WARN: &str = "WARN";
const LEVEL_ERROR: &str = "ERROR";
const LEVEL_TRACE: &str = "TRACE";

const SOURCE_UNKNOWN: &str = "?";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub log_file_prefix: CompactString,
    pub log_level: CompactString,
    pub max_log_files: usize,
    pub rotation: LogRotation,
    /// Mirror events to stderr as well as the log file.
    pub stderr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_file_prefix: CompactString::const_new("filer"),
            log_level: CompactString::const_new("info"),
            max_log_files: 10,
            rotation: LogRotation::Daily,
            stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_file_prefix.is_empty() {
            return Err(LoggingError::ConfigError("Log file prefix must not be empty".to_string()).into());
        }

        if self.max_log_files == 0 {
            return Err(LoggingError::ConfigError("Max log files must be greater than 0".to_string()).into());
        }

        Directive::from_str(&self.log_level)
            .map_err(|e| LoggingError::ConfigError(format!("Invalid log level {:?}: {e}", self.log_level)))?;

        validate_log_directory(&self.log_dir)
    }
}

fn default_log_dir() -> PathBuf {
    ProjectDirs::from("org", "filer", "Filer")
        .map_or_else(|| PathBuf::from("./logs"), |dirs| dirs.data_local_dir().join("logs"))
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid log directory: {0}")]
    InvalidLogDirectory(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static LOG_SEQUENCE: AtomicU64 = AtomicU64::new(1);

#[inline]
const fn get_level_string(level: Level) -> &'static str {
    match level {
        Level::INFO => LEVEL_INFO,
        Level::DEBUG => LEVEL_DEBUG,
        Level::WARN => LEVEL_WARN,
        Level::ERROR => LEVEL_ERROR,
        Level::TRACE => LEVEL_TRACE,
    }
}

// Logger builder
pub struct LoggerBuilder {
    config: LoggingConfig,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.config.log_level = CompactString::new(level);
        self
    }

    /// Install the global subscriber. Keep the returned guard alive for the
    /// lifetime of the program; dropping it flushes the file writer.
    pub async fn build(self) -> Result<WorkerGuard> {
        if INITIALIZED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LoggingError::AlreadyInitialized.into());
        }

        self.install().await.inspect_err(|_| INITIALIZED.store(false, Ordering::Release))
    }

    async fn install(self) -> Result<WorkerGuard> {
        let config = self.config;
        config.validate()?;
        setup_log_directory(&config.log_dir).await?;

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(&config.log_dir)
            .context("Failed to create file appender")?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let level_str = config.log_level.clone();
        let make_filter = || -> Result<EnvFilter> {
            Ok(EnvFilter::from_default_env()
                .add_directive(Directive::from_str(&level_str).context("Invalid log level in config")?))
        };

        let file_layer = LineLayer::new(non_blocking).with_filter(make_filter()?);

        let stderr_layer = if config.stderr {
            Some(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_filter(make_filter()?),
            )
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per event: `SEQ TIME LEVEL [file:line target] message key=value ...`
pub struct LineLayer<W> {
    make_writer: W,
}

impl<W> LineLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    pub const fn new(make_writer: W) -> Self {
        Self { make_writer }
    }
}

impl<S, W> Layer<S> for LineLayer<W>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: TracingContext<'_, S>) {
        let meta = event.metadata();

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format_line(
            LOG_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            &Local::now().format(TIMESTAMP_FORMAT).to_string(),
            *meta.level(),
            meta.file().unwrap_or(SOURCE_UNKNOWN),
            meta.line().unwrap_or(0),
            meta.target(),
            &visitor,
        );

        let mut writer = self.make_writer.make_writer();
        let _ = writer.write_all(line.as_bytes());
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: SmallVec<[(&'static str, String); 8]>,
}

impl LineVisitor {
    fn add_field(&mut self, name: &'static str, value: String) {
        if name == "message" {
            self.message = value;
        } else {
            self.fields.push((name, value));
        }
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.add_field(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.add_field(field.name(), value.to_string());
    }
}

fn format_line(
    sequence: u64,
    timestamp: &str,
    level: Level,
    file: &str,
    line: u32,
    target: &str,
    visitor: &LineVisitor,
) -> String {
    let mut out = format!(
        "{sequence:06} {timestamp} {:<5} [{file}:{line} {target}] {}",
        get_level_string(level),
        visitor.message
    );

    for (name, value) in &visitor.fields {
        out.push(' ');
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }

    out.push('\n');
    out
}

fn validate_log_directory(path: &Path) -> Result<()> {
    if path.components().count() == 0 {
        return Err(LoggingError::InvalidLogDirectory("Empty path".to_string()).into());
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(LoggingError::InvalidLogDirectory(
                "Path contains parent directory references".to_string(),
            )
            .into());
        }
    }

    Ok(())
}

async fn setup_log_directory(log_dir: &Path) -> Result<()> {
    TokioFs::create_dir_all(log_dir)
        .await
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))
}

pub async fn init_default_logging() -> Result<WorkerGuard> {
    LoggerBuilder::new().build().await
}

pub async fn init_logging_with_level(level: &str) -> Result<WorkerGuard> {
    LoggerBuilder::new().with_level(level).build().await
}

pub async fn init_logging_with_config(config: LoggingConfig) -> Result<WorkerGuard> {
    LoggerBuilder::new().with_config(config).build().await
}
